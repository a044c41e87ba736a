use crate::device_display::interface::DeviceDisplay;
use crate::kiosk::render::Screen;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Remembers every screen it was asked to show.
#[derive(Clone, Default)]
pub struct DeviceDisplayFake {
    screens: Arc<Mutex<Vec<Screen>>>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screens(&self) -> Vec<Screen> {
        self.screens
            .lock()
            .map(|screens| screens.clone())
            .unwrap_or_default()
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn show(&mut self, screen: &Screen) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.screens
            .lock()
            .map_err(|e| e.to_string())?
            .push(screen.clone());
        Ok(())
    }
}
