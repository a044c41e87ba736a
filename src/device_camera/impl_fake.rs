use crate::device_camera::interface::DeviceCamera;
use crate::error::CaptureError;
use crate::frame::{ChannelOrder, Frame};
use crate::library::logger::interface::Logger;
use rand::Rng;
use std::sync::Arc;

/// Produces noise frames in camera byte order.
pub struct DeviceCameraFake {
    width: u32,
    height: u32,
    started: bool,
    frames_left: Option<usize>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraFake {
    pub fn new(width: u32, height: u32, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            width,
            height,
            started: false,
            frames_left: None,
            logger: logger.with_namespace("camera").with_namespace("fake"),
        }
    }

    /// Fails every capture after `frames` frames, like an unplugged camera.
    pub fn disconnect_after(mut self, frames: usize) -> Self {
        self.frames_left = Some(frames);
        self
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn start(&mut self) -> Result<(), CaptureError> {
        self.logger.info("Camera started")?;
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.logger.info("Camera stopped")?;
        self.started = false;
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<Frame, CaptureError> {
        if !self.started {
            return Err(CaptureError::Unavailable("fake camera not started".to_string()));
        }

        if let Some(left) = self.frames_left.as_mut() {
            if *left == 0 {
                return Err(CaptureError::Unavailable("fake camera disconnected".to_string()));
            }
            *left -= 1;
        }

        let mut rng = rand::rng();
        let data: Vec<u8> = (0..self.width as usize * self.height as usize * 3)
            .map(|_| rng.random::<u8>())
            .collect();

        Frame::from_raw(self.width, self.height, ChannelOrder::Bgr, data)
    }
}
