use crate::error::AppError;
use crate::frame::Frame;
use crate::kiosk::core::Event;
use crate::kiosk::render::{Mode, Screen};
use crate::kiosk::runtime::Kiosk;
use eframe::egui;
use std::sync::Arc;
use std::time::{Duration, Instant};

const PANEL_HEIGHT: f32 = 150.0;

/// egui front end. Owns the kiosk and ticks it from the repaint loop, so the
/// capture, the forward pass and the drawing share one thread.
struct KioskWindow {
    kiosk: Kiosk,
    tick_rate: Duration,
    last_tick: Instant,
    texture: Option<egui::TextureHandle>,
    shown_frame: Option<Arc<Frame>>,
}

impl KioskWindow {
    fn upload_frame(&mut self, ctx: &egui::Context, screen: &Screen) {
        let Some(frame) = &screen.frame else {
            return;
        };
        if let Some(shown) = &self.shown_frame {
            if Arc::ptr_eq(shown, frame) {
                return;
            }
        }

        let rgb = frame.to_rgb_image();
        let image = egui::ColorImage::from_rgb(
            [rgb.width() as usize, rgb.height() as usize],
            rgb.as_raw(),
        );

        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("camera", image, egui::TextureOptions::LINEAR))
            }
        }
        self.shown_frame = Some(frame.clone());
    }
}

impl eframe::App for KioskWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.last_tick.elapsed() >= self.tick_rate {
            self.last_tick = Instant::now();
            self.kiosk.dispatch(Event::Tick);
        }

        let screen = self.kiosk.screen();
        self.upload_frame(ctx, &screen);

        let mut requested = Vec::new();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(screen.status.as_str());
        });

        egui::TopBottomPanel::bottom("checkout")
            .exact_height(PANEL_HEIGHT - 30.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.add_space(40.0);
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new(&screen.dish_line).size(22.0).strong());
                        ui.add_space(10.0);
                        ui.label(egui::RichText::new(&screen.price_line).size(22.0).strong());
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_space(40.0);
                        let enabled = screen.mode != Mode::Stopped;
                        let confirm = egui::Button::new(egui::RichText::new("Confirm").size(18.0))
                            .min_size(egui::vec2(130.0, 40.0));
                        if ui.add_enabled(enabled, confirm).clicked() {
                            requested.push(Event::ConfirmRequested);
                        }
                        let checkout =
                            egui::Button::new(egui::RichText::new("Checkout").size(18.0))
                                .min_size(egui::vec2(130.0, 40.0));
                        if ui.add_enabled(enabled, checkout).clicked() {
                            requested.push(Event::CheckoutRequested);
                        }
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| match (&self.texture, &screen.frame) {
            (Some(texture), Some(_)) => {
                let response = ui.add(egui::Image::new(texture).shrink_to_fit());
                if let Some(overlay) = &screen.overlay {
                    ui.painter().text(
                        response.rect.left_top() + egui::vec2(5.0, 5.0),
                        egui::Align2::LEFT_TOP,
                        overlay,
                        egui::FontId::proportional(26.0),
                        egui::Color32::from_rgb(0, 255, 0),
                    );
                }
            }
            _ => {
                ui.centered_and_justified(|ui| ui.label("Waiting for camera..."));
            }
        });

        for event in requested {
            self.kiosk.dispatch(event);
        }

        if !self.kiosk.is_stopped() {
            ctx.request_repaint_after(self.tick_rate);
        }
    }
}

pub fn run_gui(
    mut kiosk: Kiosk,
    tick_rate: Duration,
    camera_width: u32,
    camera_height: u32,
) -> Result<(), AppError> {
    kiosk.start()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Food Recognition System")
            .with_inner_size([camera_width as f32, camera_height as f32 + PANEL_HEIGHT])
            .with_resizable(false),
        ..Default::default()
    };

    let window = KioskWindow {
        kiosk,
        tick_rate,
        last_tick: Instant::now(),
        texture: None,
        shown_frame: None,
    };

    eframe::run_native(
        "Food Recognition System",
        options,
        Box::new(|_cc| Box::new(window)),
    )
    .map_err(|e| AppError::Display(e.to_string()))
}
