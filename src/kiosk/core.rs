use crate::error::ClassifyError;
use crate::frame::Frame;
use crate::image_classifier::interface::ClassificationResult;
use std::sync::Arc;

pub const NO_FRAME_NOTICE: &str = "No frame captured yet";

#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub result: ClassificationResult,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    /// Live camera preview. `notice` holds the outcome of a failed checkout.
    Previewing {
        frame: Option<Arc<Frame>>,
        notice: Option<String>,
    },
    /// Showing the checked-out frame until the cashier confirms.
    Frozen { frame: Arc<Frame>, receipt: Receipt },
    /// The camera failed. Terminal.
    Stopped { reason: String },
}

#[derive(Debug)]
pub enum Event {
    Tick,
    FrameCaptured(Arc<Frame>),
    CaptureFailed(String),
    CheckoutRequested,
    CheckoutDone {
        frame: Arc<Frame>,
        result: Result<Receipt, ClassifyError>,
    },
    ConfirmRequested,
}

impl Event {
    /// Ticks and captures fire thirty times a second.
    pub fn is_routine(&self) -> bool {
        matches!(self, Event::Tick | Event::FrameCaptured(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    CaptureFrame,
    Checkout { frame: Arc<Frame> },
    StopCamera,
}

pub fn init() -> (State, Vec<Effect>) {
    (
        State::Previewing {
            frame: None,
            notice: None,
        },
        vec![Effect::CaptureFrame],
    )
}

pub fn transition(state: State, event: Event) -> (State, Vec<Effect>) {
    match (state, event) {
        (State::Stopped { reason }, _) => (State::Stopped { reason }, vec![]),

        (_, Event::CaptureFailed(reason)) => (State::Stopped { reason }, vec![Effect::StopCamera]),

        // Preview loop
        (State::Previewing { frame, notice }, Event::Tick) => (
            State::Previewing { frame, notice },
            vec![Effect::CaptureFrame],
        ),
        (State::Previewing { notice, .. }, Event::FrameCaptured(frame)) => (
            State::Previewing {
                frame: Some(frame),
                notice,
            },
            vec![],
        ),

        // Checkout
        (State::Previewing { frame: Some(frame), .. }, Event::CheckoutRequested) => (
            State::Previewing {
                frame: Some(frame.clone()),
                notice: None,
            },
            vec![Effect::Checkout { frame }],
        ),
        (State::Previewing { frame: None, .. }, Event::CheckoutRequested) => (
            State::Previewing {
                frame: None,
                notice: Some(NO_FRAME_NOTICE.to_string()),
            },
            vec![],
        ),
        (
            State::Previewing { .. },
            Event::CheckoutDone {
                frame,
                result: Ok(receipt),
            },
        ) => (State::Frozen { frame, receipt }, vec![]),
        (
            State::Previewing { frame, .. },
            Event::CheckoutDone {
                result: Err(error), ..
            },
        ) => (
            State::Previewing {
                frame,
                notice: Some(format!("Checkout failed: {}", error)),
            },
            vec![],
        ),

        // Confirm
        (State::Frozen { frame, .. }, Event::ConfirmRequested) => (
            State::Previewing {
                frame: Some(frame),
                notice: None,
            },
            vec![],
        ),

        // Frozen ignores ticks and repeated checkouts, previewing ignores confirm.
        (state, _) => (state, vec![]),
    }
}
