pub mod impl_fake;
pub mod impl_image_file;
pub mod impl_image_folder;
#[cfg(feature = "webcam")]
pub mod impl_webcam;
pub mod interface;
