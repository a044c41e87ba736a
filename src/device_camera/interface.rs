use crate::error::CaptureError;
use crate::frame::Frame;

/// A blocking frame source, pulled once per tick.
pub trait DeviceCamera {
    fn start(&mut self) -> Result<(), CaptureError>;
    fn stop(&mut self) -> Result<(), CaptureError>;
    /// An error ends the capture loop. Sources are never retried.
    fn capture_frame(&mut self) -> Result<Frame, CaptureError>;
}
