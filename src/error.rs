use std::path::PathBuf;
use thiserror::Error;

// Main application error type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config Error: {0}")]
    Config(#[from] ConfigError),
    #[error("Model Error: {0}")]
    Model(#[from] ModelError),
    #[error("Capture Error: {0}")]
    Capture(#[from] CaptureError),
    #[error("Classify Error: {0}")]
    Classify(#[from] ClassifyError),
    #[error("Display Error: {0}")]
    Display(String),
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Overlay font unavailable: {0}")]
    Font(String),
    #[error("Logger failed: {0}")]
    Log(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("missing separator {separator:?}")]
    MissingSeparator { separator: &'static str },
    #[error("empty key")]
    EmptyKey,
    #[error("invalid class index {0:?}")]
    InvalidIndex(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}:{line}: {reason} in {content:?}")]
    Parse {
        path: PathBuf,
        line: usize,
        content: String,
        reason: LineError,
    },
    #[error("Missing required key {0:?}")]
    MissingKey(&'static str),
    #[error("Invalid value {value:?} for key {key:?}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No class name registered for index {0}")]
    UnknownClassIndex(usize),
    #[error("No price registered for {0:?}")]
    UnknownPrice(String),
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Camera unavailable: {0}")]
    Unavailable(String),
    #[error("No more frames in {0}")]
    Exhausted(PathBuf),
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Frame buffer of {actual} bytes does not match {width}x{height}x3")]
    BufferSize {
        width: u32,
        height: u32,
        actual: usize,
    },
    #[error("Logger failed: {0}")]
    Log(String),
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Unknown architecture {0:?}")]
    UnknownArchitecture(String),
    #[error("Input size {configured} does not fit {architecture}, which was trained for {expected}x{expected}")]
    InputSizeMismatch {
        architecture: &'static str,
        configured: u32,
        expected: u32,
    },
    #[error("Failed to load checkpoint {path}: {message}")]
    Load { path: PathBuf, message: String },
    #[error("Forward pass failed: {0}")]
    Inference(String),
    #[error("Model produced {actual} scores, config expects {expected} classes")]
    OutputWidthMismatch { expected: usize, actual: usize },
    #[error("Model produced an empty score vector")]
    EmptyOutput,
    #[error("Logger failed: {0}")]
    Log(String),
}

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("Logger failed: {0}")]
    Log(String),
}

// Logger calls return boxed errors; these let them propagate with `?`.
macro_rules! from_log_error {
    ($($error:ident),*) => {
        $(
            impl From<Box<dyn std::error::Error + Send + Sync>> for $error {
                fn from(e: Box<dyn std::error::Error + Send + Sync>) -> Self {
                    $error::Log(e.to_string())
                }
            }
        )*
    };
}

from_log_error!(AppError, CaptureError, ModelError, ClassifyError);
