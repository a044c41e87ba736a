use crate::kiosk::render::Screen;
use std::error::Error;

/// Where the kiosk screen is drawn on each tick.
pub trait DeviceDisplay {
    fn show(&mut self, screen: &Screen) -> Result<(), Box<dyn Error + Send + Sync>>;
}
