use crate::catalog::PriceTable;
use crate::device_camera::interface::DeviceCamera;
use crate::error::CaptureError;
use crate::image_classifier::classifier::Classifier;
use crate::kiosk::core::{init, transition, Effect, Event, Receipt, State};
use crate::kiosk::render::{render, Screen};
use crate::library::logger::interface::Logger;
use crate::library::state_machine::StateMachine;
use std::sync::Arc;

/// The checkout counter: camera, classifier and price table driven by the
/// kiosk state machine. Effects run on the caller's thread.
pub struct Kiosk {
    machine: StateMachine<State, Event, Effect>,
    camera: Box<dyn DeviceCamera>,
    classifier: Classifier,
    prices: PriceTable,
    currency: String,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Kiosk {
    pub fn new(
        camera: Box<dyn DeviceCamera>,
        classifier: Classifier,
        prices: PriceTable,
        currency: String,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            machine: StateMachine::new(init()),
            camera,
            classifier,
            prices,
            currency,
            logger: logger.with_namespace("kiosk"),
        }
    }

    pub fn start(&mut self) -> Result<(), CaptureError> {
        self.camera.start()?;

        let Self {
            machine,
            camera,
            classifier,
            prices,
            logger,
            ..
        } = self;

        machine.start(
            |state, event| logged_transition(logger.as_ref(), state, event),
            |effect| run_effect(effect, camera.as_mut(), classifier, prices, logger.as_ref()),
        );
        Ok(())
    }

    pub fn dispatch(&mut self, event: Event) {
        let Self {
            machine,
            camera,
            classifier,
            prices,
            logger,
            ..
        } = self;

        machine.dispatch(
            event,
            |state, event| logged_transition(logger.as_ref(), state, event),
            |effect| run_effect(effect, camera.as_mut(), classifier, prices, logger.as_ref()),
        );
    }

    pub fn state(&self) -> &State {
        self.machine.state()
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.state(), State::Stopped { .. })
    }

    pub fn screen(&self) -> Screen {
        render(self.state(), &self.currency)
    }
}

fn logged_transition(
    logger: &(dyn Logger + Send + Sync),
    state: State,
    event: Event,
) -> (State, Vec<Effect>) {
    if event.is_routine() {
        return transition(state, event);
    }

    let event_name = format!("{:?}", event);
    let (new_state, effects) = transition(state, event);
    let _ = logger.info(&format!(
        "event: {} -> state: {} effects: {:?}",
        event_name,
        state_name(&new_state),
        effects
    ));
    (new_state, effects)
}

fn state_name(state: &State) -> &'static str {
    match state {
        State::Previewing { .. } => "Previewing",
        State::Frozen { .. } => "Frozen",
        State::Stopped { .. } => "Stopped",
    }
}

fn run_effect(
    effect: Effect,
    camera: &mut dyn DeviceCamera,
    classifier: &Classifier,
    prices: &PriceTable,
    logger: &(dyn Logger + Send + Sync),
) -> Vec<Event> {
    match effect {
        Effect::CaptureFrame => match camera.capture_frame() {
            Ok(frame) => vec![Event::FrameCaptured(Arc::new(frame))],
            Err(e) => {
                let _ = logger.error(&format!("Camera frame load failed: {}", e));
                vec![Event::CaptureFailed(e.to_string())]
            }
        },
        Effect::Checkout { frame } => {
            let result = classifier.classify(&frame).and_then(|result| {
                let price = prices.price_of(&result.class_name)?.to_string();
                Ok(Receipt { result, price })
            });

            match &result {
                Ok(receipt) => {
                    let _ = logger.info(&format!(
                        "Class name: {} Confidence: {} Price: {}",
                        receipt.result.class_name,
                        receipt.result.confidence_label(),
                        receipt.price
                    ));
                }
                Err(e) => {
                    let _ = logger.error(&format!("Checkout failed: {}", e));
                }
            }

            vec![Event::CheckoutDone { frame, result }]
        }
        Effect::StopCamera => {
            if let Err(e) = camera.stop() {
                let _ = logger.error(&format!("Failed to stop camera: {}", e));
            }
            vec![]
        }
    }
}
