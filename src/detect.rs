//! Offline classification of an image file or a folder of images.

use crate::device_camera::impl_image_file::{is_image_path, load_frame};
use crate::device_camera::impl_image_folder::list_images;
use crate::device_camera::interface::DeviceCamera;
use crate::error::AppError;
use crate::frame::Frame;
use crate::image_classifier::classifier::Classifier;
use crate::image_classifier::interface::ClassificationResult;
use crate::library::logger::interface::Logger;
use ab_glyph::{FontArc, PxScale};
use eframe::egui;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "flv", "rmvb", "mov", "rm"];
pub const PREDICTIONS_FILE: &str = "predictions.txt";

const LABEL_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const LABEL_SCALE: f32 = 26.0;
const LABEL_ORIGIN: (i32, i32) = (5, 5);

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub file_name: String,
    pub result: ClassificationResult,
}

impl Prediction {
    pub fn to_line(&self) -> String {
        format!("{} {}", self.file_name, label_text(&self.result))
    }
}

fn label_text(result: &ClassificationResult) -> String {
    format!("{} {}", result.class_name, result.confidence_label())
}

/// The proportional font egui ships with, so no font file is needed on disk.
pub fn overlay_font() -> Result<FontArc, AppError> {
    let definitions = egui::FontDefinitions::default();
    let data = definitions
        .families
        .get(&egui::FontFamily::Proportional)
        .and_then(|names| names.first())
        .and_then(|name| definitions.font_data.get(name))
        .ok_or_else(|| AppError::Font("no proportional font in egui defaults".to_string()))?;

    FontArc::try_from_vec(data.font.to_vec()).map_err(|e| AppError::Font(e.to_string()))
}

/// Writes the class name and confidence in green at the top-left corner.
pub fn draw_label(image: &mut RgbImage, result: &ClassificationResult, font: &FontArc) {
    draw_text_mut(
        image,
        LABEL_COLOR,
        LABEL_ORIGIN.0,
        LABEL_ORIGIN.1,
        PxScale::from(LABEL_SCALE),
        font,
        &label_text(result),
    );
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> AppError + '_ {
    move |source| AppError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn is_video_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Classifies `source` and writes the images plus `predictions.txt` under
/// `output`. A folder source gets its own subfolder, recreated on every run.
pub fn run_detect(
    source: &Path,
    output: &Path,
    classifier: &Classifier,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<Vec<Prediction>, AppError> {
    let logger = logger.with_namespace("detect");

    if !source.is_dir() && !is_image_path(source) {
        if is_video_path(source) {
            return Err(AppError::UnsupportedSource(format!(
                "{} (video decoding is not built in)",
                source.display()
            )));
        }
        return Err(AppError::UnsupportedSource(source.display().to_string()));
    }

    let font = overlay_font()?;

    if source.is_dir() {
        let folder_name = source
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("folder"));
        let target = output.join(folder_name);
        if target.exists() {
            fs::remove_dir_all(&target).map_err(io_error(&target))?;
        }
        fs::create_dir_all(&target).map_err(io_error(&target))?;

        let mut predictions = Vec::new();
        for path in list_images(source)? {
            predictions.push(detect_one(&path, &target, classifier, &font, logger.as_ref())?);
        }
        write_predictions(&target, &predictions)?;
        return Ok(predictions);
    }

    fs::create_dir_all(output).map_err(io_error(output))?;
    let predictions = vec![detect_one(source, output, classifier, &font, logger.as_ref())?];
    write_predictions(output, &predictions)?;
    Ok(predictions)
}

/// Classifies live frames until the camera fails. Returns how many frames
/// were classified.
pub fn run_detect_live(
    camera: &mut dyn DeviceCamera,
    classifier: &Classifier,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<usize, AppError> {
    let logger = logger.with_namespace("detect");
    camera.start()?;

    let classified = classify_until_failure(camera, classifier, logger.as_ref());
    camera.stop()?;
    classified
}

fn classify_until_failure(
    camera: &mut dyn DeviceCamera,
    classifier: &Classifier,
    logger: &(dyn Logger + Send + Sync),
) -> Result<usize, AppError> {
    let mut count = 0;
    loop {
        let frame = match camera.capture_frame() {
            Ok(frame) => frame,
            Err(e) => {
                logger.error(&format!("Camera frame load failed: {}", e))?;
                return Ok(count);
            }
        };
        let result = classifier.classify(&frame)?;
        count += 1;
        logger.info(&format!("frame {} {}", count, label_text(&result)))?;
    }
}

fn detect_one(
    path: &Path,
    target: &Path,
    classifier: &Classifier,
    font: &FontArc,
    logger: &(dyn Logger + Send + Sync),
) -> Result<Prediction, AppError> {
    let frame = load_frame(path)?;
    let result = classifier.classify(&frame)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    save_annotated(&frame, &result, font, &target.join(&file_name))?;

    let prediction = Prediction { file_name, result };
    logger.info(&prediction.to_line())?;
    Ok(prediction)
}

fn save_annotated(
    frame: &Frame,
    result: &ClassificationResult,
    font: &FontArc,
    path: &Path,
) -> Result<(), AppError> {
    let mut image = frame.to_rgb_image();
    draw_label(&mut image, result, font);
    image.save(path).map_err(|source| AppError::ImageWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn write_predictions(dir: &Path, predictions: &[Prediction]) -> Result<(), AppError> {
    let path = dir.join(PREDICTIONS_FILE);
    let mut file = fs::File::create(&path).map_err(io_error(&path))?;
    for prediction in predictions {
        writeln!(file, "{}", prediction.to_line()).map_err(io_error(&path))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ClassRegistry;
    use crate::device_camera::impl_fake::DeviceCameraFake;
    use crate::image_classifier::impl_fake::ImageClassifierFake;
    use crate::image_classifier::preprocess::Normalization;
    use crate::error::{ClassifyError, ModelError};
    use crate::image_classifier::interface::ImageClassifier;
    use crate::image_classifier::preprocess::InputTensor;
    use crate::library::logger::impl_fake::LoggerFake;

    fn classifier() -> Classifier {
        let logger = Arc::new(LoggerFake::new());
        Classifier::new(
            Box::new(ImageClassifierFake::with_scores(
                vec![-3.0, -0.05, -4.0],
                logger.clone(),
            )),
            ClassRegistry::parse("rice 0\nkungpao_chicken 1\nnoodles 2\n").unwrap(),
            100,
            Normalization::Unit,
            logger,
        )
    }

    struct ImageClassifierBroken;

    impl ImageClassifier for ImageClassifierBroken {
        fn forward(&self, _input: &InputTensor) -> Result<Vec<f32>, ModelError> {
            Err(ModelError::Inference("weights corrupted".to_string()))
        }
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("frs-detect-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_folder_source_writes_one_line_per_image() {
        let root = scratch("folder");
        let source = root.join("samples");
        fs::create_dir_all(&source).unwrap();
        RgbImage::from_pixel(20, 10, Rgb([1, 2, 3])).save(source.join("a.png")).unwrap();
        RgbImage::from_pixel(10, 20, Rgb([4, 5, 6])).save(source.join("b.jpg")).unwrap();
        fs::write(source.join("readme.md"), "skip me").unwrap();

        // A stale output folder is replaced.
        let output = root.join("output");
        fs::create_dir_all(output.join("samples")).unwrap();
        fs::write(output.join("samples").join("old.png"), "stale").unwrap();

        let predictions =
            run_detect(&source, &output, &classifier(), Arc::new(LoggerFake::new())).unwrap();

        let report = fs::read_to_string(output.join("samples").join(PREDICTIONS_FILE)).unwrap();
        let saved_a = output.join("samples").join("a.png").exists();
        let stale = output.join("samples").join("old.png").exists();
        fs::remove_dir_all(&root).unwrap();

        assert_eq!(predictions.len(), 2);
        assert!(predictions.iter().all(|p| p.result.class_name == "kungpao_chicken"));
        assert_eq!(report.lines().count(), 2);
        assert!(report.starts_with("a.png kungpao_chicken "));
        assert!(saved_a);
        assert!(!stale);
    }

    #[test]
    fn test_single_image_source() {
        let root = scratch("single");
        let source = root.join("dish.png");
        RgbImage::from_pixel(8, 8, Rgb([9, 9, 9])).save(&source).unwrap();
        let output = root.join("output");

        let predictions =
            run_detect(&source, &output, &classifier(), Arc::new(LoggerFake::new())).unwrap();
        let saved = output.join("dish.png").exists();
        fs::remove_dir_all(&root).unwrap();

        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].file_name, "dish.png");
        assert!(saved);
    }

    #[test]
    fn test_live_loop_runs_until_camera_fails() {
        let logger = LoggerFake::new();
        let mut camera = DeviceCameraFake::new(32, 24, Arc::new(logger.clone())).disconnect_after(3);

        let count = run_detect_live(&mut camera, &classifier(), Arc::new(logger.clone())).unwrap();

        assert_eq!(count, 3);
        let lines = logger.lines();
        assert!(lines
            .iter()
            .any(|line| line.starts_with("INFO detect: frame 3 kungpao_chicken ")));
        assert!(lines.iter().any(|line| line.starts_with("ERROR detect: Camera frame load failed")));
    }

    #[test]
    fn test_saved_image_carries_green_label() {
        let root = scratch("label");
        let source = root.join("dish.png");
        let input = RgbImage::new(200, 100);
        input.save(&source).unwrap();
        let output = root.join("output");

        run_detect(&source, &output, &classifier(), Arc::new(LoggerFake::new())).unwrap();
        let saved = image::open(output.join("dish.png")).unwrap().to_rgb8();
        fs::remove_dir_all(&root).unwrap();

        assert_eq!(saved.dimensions(), input.dimensions());
        assert_ne!(saved, input);
        assert!(saved
            .enumerate_pixels()
            .filter(|(x, y, _)| *x < 120 && *y < 40)
            .any(|(_, _, pixel)| pixel[1] > 128 && pixel[0] == 0 && pixel[2] == 0));
        // Nothing is drawn below the label line.
        assert!(saved
            .enumerate_pixels()
            .filter(|(_, y, _)| *y > 60)
            .all(|(_, _, pixel)| pixel.0 == [0, 0, 0]));
    }

    #[test]
    fn test_live_loop_stops_camera_when_classification_fails() {
        let logger = LoggerFake::new();
        let shared = Arc::new(logger.clone());
        let broken = Classifier::new(
            Box::new(ImageClassifierBroken),
            ClassRegistry::parse("rice 0\n").unwrap(),
            100,
            Normalization::Unit,
            shared.clone(),
        );
        let mut camera = DeviceCameraFake::new(32, 24, shared.clone());

        let err = run_detect_live(&mut camera, &broken, shared).unwrap_err();

        assert!(matches!(
            err,
            AppError::Classify(ClassifyError::Model(ModelError::Inference(_)))
        ));
        assert_eq!(
            logger.lines().last().map(String::as_str),
            Some("INFO camera:fake: Camera stopped")
        );
    }

    #[test]
    fn test_video_source_is_unsupported() {
        let err = run_detect(
            Path::new("clip.mp4"),
            Path::new("output"),
            &classifier(),
            Arc::new(LoggerFake::new()),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedSource(_)));
    }
}
