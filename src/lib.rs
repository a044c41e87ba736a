pub mod catalog;
pub mod config;
pub mod detect;
pub mod device_camera;
pub mod device_display;
pub mod error;
pub mod frame;
pub mod image_classifier;
pub mod kiosk;
pub mod library;
