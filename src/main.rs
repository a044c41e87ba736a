use clap::{Parser, Subcommand, ValueEnum};
use food_recognition_kiosk::catalog::{ClassRegistry, PriceTable};
use food_recognition_kiosk::config::Config;
use food_recognition_kiosk::detect::{run_detect, run_detect_live};
use food_recognition_kiosk::device_camera::impl_fake::DeviceCameraFake;
use food_recognition_kiosk::device_camera::impl_image_file::DeviceCameraImageFile;
use food_recognition_kiosk::device_camera::impl_image_folder::DeviceCameraImageFolder;
use food_recognition_kiosk::device_camera::interface::DeviceCamera;
use food_recognition_kiosk::device_display::impl_console::DeviceDisplayConsole;
use food_recognition_kiosk::device_display::impl_gui::run_gui;
use food_recognition_kiosk::error::AppError;
use food_recognition_kiosk::image_classifier::classifier::Classifier;
use food_recognition_kiosk::image_classifier::impl_fake::ImageClassifierFake;
use food_recognition_kiosk::image_classifier::impl_tract_onnx::{
    ImageClassifierTractOnnx, ModelConfig,
};
use food_recognition_kiosk::image_classifier::interface::ImageClassifier;
use food_recognition_kiosk::kiosk::run::{run_console, spawn_stdin_commands};
use food_recognition_kiosk::kiosk::runtime::Kiosk;
use food_recognition_kiosk::library::logger::impl_tracing::{init_logging, LoggerTracing};
use food_recognition_kiosk::library::logger::interface::Logger;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "frs", version, about = "Food recognition checkout kiosk")]
struct Cli {
    /// Key/value configuration file
    #[arg(short, long, global = true, default_value = "cfg/frs.cfg")]
    cfg: PathBuf,

    /// ONNX checkpoint of the trained network
    #[arg(short, long, global = true, default_value = "weights/frs_cnn.onnx")]
    weights: PathBuf,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer with random scores instead of loading the checkpoint
    #[arg(long, global = true)]
    fake_model: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the checkout kiosk
    Kiosk {
        #[arg(long, value_enum, default_value_t = DisplayKind::Gui)]
        display: DisplayKind,

        /// `fake`, `0` for the first webcam, an image file or a folder of images
        #[arg(long, default_value = "0")]
        source: String,
    },
    /// Classify an image, a folder of images, or webcam `0`
    Detect {
        #[arg(long)]
        source: String,

        #[arg(long, default_value = "output")]
        output: PathBuf,

        /// Overrides `input_size` from the configuration file
        #[arg(long)]
        input_size: Option<u32>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DisplayKind {
    Gui,
    Console,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerTracing::new());

    if let Err(e) = run(cli, logger.clone()) {
        let _ = logger.error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli, logger: Arc<dyn Logger + Send + Sync>) -> Result<(), AppError> {
    let mut config = Config::load(&cli.cfg)?;
    if let Command::Detect {
        input_size: Some(input_size),
        ..
    } = &cli.command
    {
        config.input_size = *input_size;
    }

    let registry = ClassRegistry::load(&config.class_map_path)?;
    logger.info(&format!(
        "Loaded {} classes from {}",
        registry.len(),
        config.class_map_path.display()
    ))?;

    let model: Box<dyn ImageClassifier> = if cli.fake_model {
        Box::new(ImageClassifierFake::new(
            config.nb_classes.unwrap_or(registry.len()),
            logger.clone(),
        ))
    } else {
        Box::new(ImageClassifierTractOnnx::new(
            ModelConfig {
                checkpoint_path: cli.weights.clone(),
                architecture: config.architecture,
                input_size: config.input_size,
                nb_classes: config.nb_classes,
            },
            logger.clone(),
        )?)
    };

    match cli.command {
        Command::Kiosk { display, source } => {
            let prices = PriceTable::load(&config.price_table_path)?;
            for name in prices.unpriced(&registry) {
                logger.error(&format!("No price for class {}", name))?;
            }

            let classifier = Classifier::new(
                model,
                registry,
                config.input_size,
                config.normalization,
                logger.clone(),
            );
            let camera = open_camera(&source, &config, logger.clone())?;
            let mut kiosk = Kiosk::new(
                camera,
                classifier,
                prices,
                config.currency.clone(),
                logger.clone(),
            );

            match display {
                DisplayKind::Gui => run_gui(
                    kiosk,
                    config.tick_rate,
                    config.camera_width,
                    config.camera_height,
                ),
                DisplayKind::Console => run_console(
                    &mut kiosk,
                    &mut DeviceDisplayConsole::new(),
                    spawn_stdin_commands(),
                    config.tick_rate,
                    logger,
                ),
            }
        }
        Command::Detect { source, output, .. } => {
            let classifier = Classifier::new(
                model,
                registry,
                config.input_size,
                config.normalization,
                logger.clone(),
            );

            if source == "0" {
                let mut camera = open_camera(&source, &config, logger.clone())?;
                run_detect_live(camera.as_mut(), &classifier, logger)?;
                return Ok(());
            }

            let predictions = run_detect(Path::new(&source), &output, &classifier, logger.clone())?;
            logger.info(&format!(
                "Wrote {} predictions under {}",
                predictions.len(),
                output.display()
            ))?;
            Ok(())
        }
    }
}

fn open_camera(
    source: &str,
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<Box<dyn DeviceCamera>, AppError> {
    if source == "fake" {
        return Ok(Box::new(DeviceCameraFake::new(
            config.camera_width,
            config.camera_height,
            logger,
        )));
    }

    if source == "0" {
        return open_webcam(config, logger);
    }

    let path = PathBuf::from(source);
    if path.is_dir() {
        Ok(Box::new(DeviceCameraImageFolder::new(path, logger)))
    } else if path.is_file() {
        Ok(Box::new(DeviceCameraImageFile::new(path, logger)))
    } else {
        Err(AppError::UnsupportedSource(source.to_string()))
    }
}

#[cfg(feature = "webcam")]
fn open_webcam(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<Box<dyn DeviceCamera>, AppError> {
    use food_recognition_kiosk::device_camera::impl_webcam::DeviceCameraWebcam;

    Ok(Box::new(DeviceCameraWebcam::new(
        0,
        config.camera_width,
        config.camera_height,
        logger,
    )))
}

#[cfg(not(feature = "webcam"))]
fn open_webcam(
    _config: &Config,
    _logger: Arc<dyn Logger + Send + Sync>,
) -> Result<Box<dyn DeviceCamera>, AppError> {
    Err(AppError::UnsupportedSource(
        "webcam 0 (rebuild with --features webcam)".to_string(),
    ))
}
