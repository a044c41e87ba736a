use crate::device_camera::interface::DeviceCamera;
use crate::error::CaptureError;
use crate::frame::{ChannelOrder, Frame};
use crate::library::logger::interface::Logger;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;
use std::sync::Arc;

fn unavailable(e: impl std::fmt::Display) -> CaptureError {
    CaptureError::Unavailable(e.to_string())
}

pub struct DeviceCameraWebcam {
    index: u32,
    width: u32,
    height: u32,
    camera: Option<Camera>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraWebcam {
    pub fn new(index: u32, width: u32, height: u32, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            index,
            width,
            height,
            camera: None,
            logger: logger.with_namespace("camera").with_namespace("webcam"),
        }
    }
}

impl DeviceCamera for DeviceCameraWebcam {
    fn start(&mut self) -> Result<(), CaptureError> {
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(Resolution::new(self.width, self.height), FrameFormat::MJPEG, 30),
        ));
        let mut camera =
            Camera::new(CameraIndex::Index(self.index), requested).map_err(unavailable)?;
        camera.open_stream().map_err(unavailable)?;

        self.logger.info(&format!(
            "Opened webcam {} at {}",
            self.index,
            camera.resolution()
        ))?;
        self.camera = Some(camera);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        if let Some(mut camera) = self.camera.take() {
            camera.stop_stream().map_err(unavailable)?;
        }
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<Frame, CaptureError> {
        let camera = self
            .camera
            .as_mut()
            .ok_or_else(|| unavailable("webcam not started"))?;
        let decoded = camera
            .frame()
            .map_err(unavailable)?
            .decode_image::<RgbFormat>()
            .map_err(unavailable)?;

        let (width, height) = (decoded.width(), decoded.height());
        Frame::from_raw(width, height, ChannelOrder::Rgb, decoded.into_raw())
    }
}
