use crate::frame::Frame;
use crate::kiosk::core::State;
use std::sync::Arc;

pub const DISH_LABEL: &str = "Dish: ";
pub const PRICE_LABEL: &str = "Price: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Previewing,
    Frozen,
    Stopped,
}

/// Everything a display needs for one repaint.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub mode: Mode,
    pub frame: Option<Arc<Frame>>,
    /// Drawn over the top-left corner of the frame.
    pub overlay: Option<String>,
    pub dish_line: String,
    pub price_line: String,
    pub status: String,
}

pub fn render(state: &State, currency: &str) -> Screen {
    match state {
        State::Previewing { frame, notice } => Screen {
            mode: Mode::Previewing,
            frame: frame.clone(),
            overlay: None,
            dish_line: DISH_LABEL.to_string(),
            price_line: PRICE_LABEL.to_string(),
            status: match (notice, frame) {
                (Some(notice), _) => notice.clone(),
                (None, Some(frame)) => format!("frame shape: {:?}", frame.shape()),
                (None, None) => "Ready!".to_string(),
            },
        },
        State::Frozen { frame, receipt } => Screen {
            mode: Mode::Frozen,
            frame: Some(frame.clone()),
            overlay: Some(receipt.result.class_name.clone()),
            dish_line: format!("{}{}", DISH_LABEL, receipt.result.class_name),
            price_line: format!("{}{} {}", PRICE_LABEL, receipt.price, currency),
            status: format!(
                "Class name: {} Confidence: {}",
                receipt.result.class_name,
                receipt.result.confidence_label()
            ),
        },
        State::Stopped { reason } => Screen {
            mode: Mode::Stopped,
            frame: None,
            overlay: None,
            dish_line: DISH_LABEL.to_string(),
            price_line: PRICE_LABEL.to_string(),
            status: format!("Camera stopped: {}", reason),
        },
    }
}
