use crate::capture_workflow::core::Event;
use crate::device_display::interface::{AlertView, DeviceDisplay, Page, ScreenView};
use crate::library::logger::interface::Logger;
use eframe::egui;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const PREVIEW_WIDTH: f32 = 360.0;

struct CaptureWindow {
    view: Arc<Mutex<Option<ScreenView>>>,
    event_sender: Sender<Event>,
    /// Last decoded photo. `None` texture means the file could not be read.
    preview: Option<(PathBuf, Option<egui::TextureHandle>)>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl CaptureWindow {
    fn send(&self, event: Event) {
        if self.event_sender.send(event).is_err() {
            let _ = self.logger.error("Workflow is no longer listening");
        }
    }

    fn preview_texture(&mut self, ctx: &egui::Context, uri: &Path) -> Option<egui::TextureHandle> {
        if let Some((loaded, texture)) = &self.preview {
            if loaded == uri {
                return texture.clone();
            }
        }

        let texture = match image::open(uri) {
            Ok(photo) => {
                let rgba = photo.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let pixels = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                Some(ctx.load_texture("preview", pixels, egui::TextureOptions::default()))
            }
            Err(e) => {
                let _ = self
                    .logger
                    .error(&format!("Could not load {}: {}", uri.display(), e));
                None
            }
        };

        self.preview = Some((uri.to_path_buf(), texture.clone()));
        texture
    }

    fn page(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, page: &Page) {
        match page {
            Page::Home => {
                if ui.button("Take Picture").clicked() {
                    self.send(Event::StartCameraPressed);
                }
            }
            Page::Camera { ready, capturing } => {
                let status = if *capturing {
                    "Capturing..."
                } else if *ready {
                    "Camera ready"
                } else {
                    "Starting camera..."
                };
                ui.label(status);
                ui.add_space(8.0);
                let shutter = egui::Button::new(egui::RichText::new("Shutter").size(20.0));
                if ui.add_enabled(*ready && !*capturing, shutter).clicked() {
                    self.send(Event::ShutterPressed);
                }
            }
            Page::Preview {
                photo_uri,
                classifying,
                result,
            } => {
                if let Some(texture) = self.preview_texture(ctx, photo_uri) {
                    let size = texture.size_vec2();
                    let scale = (PREVIEW_WIDTH / size.x).min(1.0);
                    ui.image((texture.id(), size * scale));
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!*classifying, egui::Button::new("Classify Picture"))
                        .clicked()
                    {
                        self.send(Event::ClassifyPressed);
                    }
                    if ui.button("Take Picture").clicked() {
                        self.send(Event::StartCameraPressed);
                    }
                });
                if *classifying {
                    ui.spinner();
                }
                if let Some(result) = result {
                    ui.label(result.as_str());
                }
            }
        }
    }

    fn alert(&self, ctx: &egui::Context, alert: &AlertView) {
        egui::Window::new(alert.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(alert.message.as_str());
                if ui.button("OK").clicked() {
                    self.send(Event::AlertDismissed);
                }
            });
    }
}

impl eframe::App for CaptureWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // The workflow thread updates the view behind our back.
        ctx.request_repaint_after(Duration::from_millis(100));

        let view = self.view.lock().ok().and_then(|view| view.clone());

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                match &view {
                    Some(view) => {
                        let blocked = view.alert.is_some();
                        ui.add_enabled_ui(!blocked, |ui| self.page(ctx, ui, &view.page));
                    }
                    None => {
                        ui.spinner();
                    }
                }
            });
        });

        if let Some(alert) = view.as_ref().and_then(|view| view.alert.as_ref()) {
            self.alert(ctx, alert);
        }
    }
}

pub struct DeviceDisplayGui {
    view: Arc<Mutex<Option<ScreenView>>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceDisplayGui {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            view: Arc::new(Mutex::new(None)),
            logger: logger.with_namespace("display").with_namespace("gui"),
        }
    }

    /// A second handle onto the same window state, for the render side.
    pub fn handle(&self) -> Self {
        Self {
            view: Arc::clone(&self.view),
            logger: self.logger.clone(),
        }
    }

    /// Opens the window and blocks until it is closed. Must be called from the
    /// main thread.
    pub fn run_window(&self, event_sender: Sender<Event>) -> Result<(), Box<dyn Error + Send + Sync>> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([420.0, 520.0])
                .with_resizable(true),
            ..Default::default()
        };

        let window = CaptureWindow {
            view: Arc::clone(&self.view),
            event_sender,
            preview: None,
            logger: self.logger.clone(),
        };

        self.logger.info("Opening window")?;
        if let Err(e) = eframe::run_native("Snap Classify", options, Box::new(|_cc| Box::new(window))) {
            return Err(e.to_string().into());
        }
        self.logger.info("Window closed")?;
        Ok(())
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn show(&mut self, view: &ScreenView) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut current = self.view.lock().map_err(|_| "display lock poisoned")?;
        *current = Some(view.clone());
        Ok(())
    }
}
