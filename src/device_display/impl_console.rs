use crate::device_display::interface::DeviceDisplay;
use crate::kiosk::render::Screen;
use std::error::Error;
use std::io::Write;

const WIDTH: usize = 40;

/// Prints the dish, price and status lines whenever they change.
pub struct DeviceDisplayConsole<W: Write> {
    out: W,
    last_lines: Option<[String; 3]>,
}

impl DeviceDisplayConsole<std::io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl<W: Write> DeviceDisplayConsole<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            last_lines: None,
        }
    }

    fn render_display(&mut self, lines: &[String; 3]) -> std::io::Result<()> {
        writeln!(self.out, "┌{}┐", "─".repeat(WIDTH))?;
        for line in lines {
            let text: String = line.chars().take(WIDTH).collect();
            let padding = WIDTH - text.chars().count();
            writeln!(self.out, "│{}{}│", text, " ".repeat(padding))?;
        }
        writeln!(self.out, "└{}┘", "─".repeat(WIDTH))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DeviceDisplay for DeviceDisplayConsole<W> {
    fn show(&mut self, screen: &Screen) -> Result<(), Box<dyn Error + Send + Sync>> {
        let lines = [
            screen.dish_line.clone(),
            screen.price_line.clone(),
            screen.status.clone(),
        ];

        if self.last_lines.as_ref() == Some(&lines) {
            return Ok(());
        }

        self.render_display(&lines)?;
        self.last_lines = Some(lines);
        Ok(())
    }
}
