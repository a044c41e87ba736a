use crate::device_camera::impl_image_file::{is_image_path, load_frame};
use crate::device_camera::interface::DeviceCamera;
use crate::error::CaptureError;
use crate::frame::Frame;
use crate::library::logger::interface::Logger;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Image files directly inside `dir`, sorted by name.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, CaptureError> {
    let entries = std::fs::read_dir(dir).map_err(|source| CaptureError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut images = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| CaptureError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_file() && is_image_path(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Plays back a folder of images, one per tick, then runs dry.
pub struct DeviceCameraImageFolder {
    dir: PathBuf,
    queue: std::vec::IntoIter<PathBuf>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraImageFolder {
    pub fn new(dir: PathBuf, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            dir,
            queue: Vec::new().into_iter(),
            logger: logger.with_namespace("camera").with_namespace("image_folder"),
        }
    }
}

impl DeviceCamera for DeviceCameraImageFolder {
    fn start(&mut self) -> Result<(), CaptureError> {
        let images = list_images(&self.dir)?;
        self.logger.info(&format!(
            "Playing {} images from {}",
            images.len(),
            self.dir.display()
        ))?;
        self.queue = images.into_iter();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.queue = Vec::new().into_iter();
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<Frame, CaptureError> {
        let path = self
            .queue
            .next()
            .ok_or_else(|| CaptureError::Exhausted(self.dir.clone()))?;
        load_frame(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_plays_images_in_name_order_then_exhausts() {
        let dir = std::env::temp_dir().join(format!("frs-folder-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        RgbImage::from_pixel(2, 2, Rgb([2, 0, 0])).save(dir.join("b.png")).unwrap();
        RgbImage::from_pixel(2, 2, Rgb([1, 0, 0])).save(dir.join("a.png")).unwrap();
        std::fs::write(dir.join("notes.txt"), "not an image").unwrap();

        let mut camera = DeviceCameraImageFolder::new(dir.clone(), Arc::new(LoggerFake::new()));
        camera.start().unwrap();
        let first = camera.capture_frame().unwrap();
        let second = camera.capture_frame().unwrap();
        let third = camera.capture_frame();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(first.to_rgb_image().get_pixel(0, 0).0, [1, 0, 0]);
        assert_eq!(second.to_rgb_image().get_pixel(0, 0).0, [2, 0, 0]);
        assert!(matches!(third, Err(CaptureError::Exhausted(_))));
    }

    #[test]
    fn test_missing_folder() {
        let err = list_images(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, CaptureError::Io { .. }));
    }
}
