use crate::device_camera::interface::DeviceCamera;
use crate::error::CaptureError;
use crate::frame::Frame;
use crate::library::logger::interface::Logger;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "gif"];

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn load_frame(path: &Path) -> Result<Frame, CaptureError> {
    let image = image::open(path).map_err(|source| CaptureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Frame::from_rgb_image(image.to_rgb8()))
}

/// Serves the same still image on every tick.
pub struct DeviceCameraImageFile {
    path: PathBuf,
    frame: Option<Frame>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraImageFile {
    pub fn new(path: PathBuf, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            path,
            frame: None,
            logger: logger.with_namespace("camera").with_namespace("image_file"),
        }
    }
}

impl DeviceCamera for DeviceCameraImageFile {
    fn start(&mut self) -> Result<(), CaptureError> {
        let frame = load_frame(&self.path)?;
        self.logger.info(&format!(
            "Loaded {} with shape {:?}",
            self.path.display(),
            frame.shape()
        ))?;
        self.frame = Some(frame);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.frame = None;
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<Frame, CaptureError> {
        self.frame
            .clone()
            .ok_or_else(|| CaptureError::Unavailable(format!("{} not loaded", self.path.display())))
    }
}
