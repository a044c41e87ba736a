use crate::device_display::interface::DeviceDisplay;
use crate::error::AppError;
use crate::kiosk::core::{Event, State};
use crate::kiosk::runtime::Kiosk;
use crate::library::logger::interface::Logger;
use std::io::BufRead;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Checkout,
    Confirm,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "c" | "check" | "checkout" => Some(Command::Checkout),
            "o" | "ok" | "confirm" => Some(Command::Confirm),
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Reads commands from stdin on a helper thread. The kiosk itself stays on
/// the caller's thread.
pub fn spawn_stdin_commands() -> Receiver<Command> {
    let (tx, rx) = channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if let Some(command) = Command::parse(&line) {
                if tx.send(command).is_err() {
                    break;
                }
            }
        }
    });
    rx
}

/// Ticks the kiosk at `tick_rate` until `Quit`, a closed command channel, or
/// a camera failure.
pub fn run_console(
    kiosk: &mut Kiosk,
    display: &mut dyn DeviceDisplay,
    commands: Receiver<Command>,
    tick_rate: Duration,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<(), AppError> {
    let logger = logger.with_namespace("console");
    let display_error = |e: Box<dyn std::error::Error + Send + Sync>| AppError::Display(e.to_string());

    kiosk.start()?;
    display.show(&kiosk.screen()).map_err(display_error)?;

    logger.info("Commands: c = checkout, o = confirm, q = quit")?;

    loop {
        loop {
            match commands.try_recv() {
                Ok(Command::Checkout) => kiosk.dispatch(Event::CheckoutRequested),
                Ok(Command::Confirm) => kiosk.dispatch(Event::ConfirmRequested),
                Ok(Command::Quit) | Err(TryRecvError::Disconnected) => {
                    display.show(&kiosk.screen()).map_err(display_error)?;
                    return Ok(());
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        kiosk.dispatch(Event::Tick);
        display.show(&kiosk.screen()).map_err(display_error)?;

        if let State::Stopped { reason } = kiosk.state() {
            logger.error(&format!("Capture loop stopped: {}", reason))?;
            return Ok(());
        }

        std::thread::sleep(tick_rate);
    }
}
