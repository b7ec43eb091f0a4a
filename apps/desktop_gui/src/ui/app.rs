use std::time::Duration;

use arboard::Clipboard;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    domain::{SelectedFile, ACCEPTED_EXTENSIONS},
    protocol::ConversionResult,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{
    drag_event_for_frame, err_label, UiError, UiErrorContext, UiEvent,
};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{ConversionUiState, ResultView};

const PENDING_REPAINT_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
struct ServiceStatus {
    reachable: bool,
    message: String,
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    service_url: String,
    state: ConversionUiState,
    status: String,
    status_banner: Option<String>,
    service_status: Option<ServiceStatus>,
}

impl DesktopGuiApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        service_url: impl Into<String>,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            service_url: service_url.into(),
            state: ConversionUiState::new(),
            status: "Ready".to_string(),
            status_banner: None,
            service_status: None,
        }
    }

    /// Queues the one-off startup health check. When the queue refuses it the
    /// footer reports the service as unchecked instead of waiting forever.
    pub fn check_service_health(&mut self) {
        let mut queue_status = String::new();
        if dispatch_backend_command(&self.cmd_tx, BackendCommand::CheckHealth, &mut queue_status) {
            return;
        }
        self.service_status = Some(ServiceStatus {
            reachable: false,
            message: "Service status not checked".to_string(),
        });
        self.show_error(UiError::from_message(
            UiErrorContext::HealthCheck,
            format!("could not queue health check: {queue_status}"),
        ));
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::ServiceStatus { reachable, message } => {
                    self.service_status = Some(ServiceStatus { reachable, message });
                }
                UiEvent::ConversionFinished(result) => {
                    self.status = if result.success {
                        format!("Converted {}", result.filename)
                    } else {
                        "Conversion failed".to_string()
                    };
                    self.state.finish_conversion(result);
                }
                UiEvent::Error(err) => self.show_error(err),
            }
        }
    }

    fn show_error(&mut self, err: UiError) {
        self.status = format!("{} error: {}", err_label(err.category()), err.message());
        if err.context() == UiErrorContext::BackendStartup {
            self.status_banner = Some(self.status.clone());
        }
    }

    fn start_conversion(&mut self) {
        let Some(cmd) = self.state.begin_conversion() else {
            return;
        };
        if !dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
            self.state.finish_conversion(ConversionResult::network_error());
        }
    }

    fn pick_file(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Select a document to convert")
            .add_filter("Documents", ACCEPTED_EXTENSIONS)
            .add_filter("All files", &["*"])
            .pick_file();
        if self.state.select_file(picked.map(SelectedFile::from_path)) {
            self.announce_selection();
        }
    }

    fn copy_result_text(&mut self) {
        let Some(text) = self.state.copy_text() else {
            return;
        };
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string())) {
            Ok(()) => self.status = "Copied extracted text to clipboard".to_string(),
            Err(err) => {
                tracing::warn!("clipboard write failed: {err}");
                self.status = format!("Clipboard unavailable: {err}");
            }
        }
    }

    fn process_drag_and_drop(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.first().map(selected_from_dropped),
            )
        });
        let Some(event) = drag_event_for_frame(self.state.drag_active(), hovering, dropped) else {
            return;
        };
        let disposition = self.state.handle_drag(event);
        if disposition.suppress_default {
            ctx.input_mut(|i| i.raw.dropped_files.clear());
        }
        if disposition.file_selected {
            self.announce_selection();
        }
    }

    fn announce_selection(&mut self) {
        if let Some(file) = self.state.selected_file() {
            self.status = format!("Selected {}", file.name);
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(message) = self.status_banner.clone() else {
            return;
        };
        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(111, 53, 53))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(&message).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.status_banner = None;
                        }
                    });
                });
            });
        ui.add_space(8.0);
    }

    fn show_drop_zone(&mut self, ui: &mut egui::Ui) {
        let (headline, hint) = self.state.drop_zone_lines();
        let stroke_color = if self.state.drag_active() {
            ui.visuals().selection.stroke.color
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke.color
        };
        let fill = if self.state.drag_active() {
            ui.visuals().selection.bg_fill.gamma_multiply(0.25)
        } else {
            ui.visuals().faint_bg_color
        };

        let response = egui::Frame::NONE
            .fill(fill)
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .corner_radius(10.0)
            .inner_margin(egui::Margin::symmetric(16, 28))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(headline).strong().size(16.0));
                    ui.weak(hint);
                });
            })
            .response
            .interact(egui::Sense::click())
            .on_hover_cursor(egui::CursorIcon::PointingHand);

        if response.clicked() {
            self.pick_file();
        }
    }

    fn show_convert_control(&mut self, ui: &mut egui::Ui) {
        if !self.state.show_convert_control() {
            return;
        }
        ui.add_space(10.0);
        let button = egui::Button::new(
            egui::RichText::new(self.state.convert_button_label())
                .strong()
                .size(16.0),
        )
        .min_size(egui::vec2(ui.available_width(), 36.0));
        if ui.add_enabled(self.state.can_convert(), button).clicked() {
            self.start_conversion();
        }
    }

    fn show_result(&mut self, ui: &mut egui::Ui) {
        let mut copy_clicked = false;
        match self.state.result_view() {
            ResultView::Empty => return,
            ResultView::Success { filename, text } => {
                ui.add_space(14.0);
                ui.horizontal(|ui| {
                    ui.heading(format!("Conversion Result for: {filename}"));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        copy_clicked = ui.button("Copy Text").clicked();
                    });
                });
                let mut text = text;
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut text)
                                .desired_rows(20)
                                .desired_width(f32::INFINITY),
                        );
                    });
            }
            ResultView::Failure { message } => {
                ui.add_space(14.0);
                egui::Frame::NONE
                    .fill(ui.visuals().error_fg_color.gamma_multiply(0.15))
                    .stroke(egui::Stroke::new(1.0, ui.visuals().error_fg_color))
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(12, 10))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(
                            egui::RichText::new("Conversion Failed")
                                .strong()
                                .color(ui.visuals().error_fg_color),
                        );
                        ui.label(message);
                    });
            }
        }
        if copy_clicked {
            self.copy_result_text();
        }
    }

    fn show_footer(&self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.small("Service:");
            ui.small(egui::RichText::new(&self.service_url).monospace());
            if let Some(service_status) = &self.service_status {
                let color = if service_status.reachable {
                    egui::Color32::from_rgb(87, 171, 90)
                } else {
                    ui.visuals().error_fg_color
                };
                ui.small(egui::RichText::new(&service_status.message).color(color));
            }
        });
        ui.horizontal_wrapped(|ui| {
            ui.small("Status:");
            ui.small(egui::RichText::new(&self.status).weak());
        });
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.process_drag_and_drop(ctx);

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            self.show_footer(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("OCR Document Converter");
                ui.weak("Convert documents to text using MarkItDown");
            });
            ui.add_space(12.0);
            self.show_status_banner(ui);
            self.show_drop_zone(ui);
            self.show_convert_control(ui);
            self.show_result(ui);
        });

        // Backend events arrive off-thread; keep polling while one is pending.
        if self.state.is_loading() || self.service_status.is_none() {
            ctx.request_repaint_after(PENDING_REPAINT_INTERVAL);
        }
    }
}

fn selected_from_dropped(file: &egui::DroppedFile) -> Option<SelectedFile> {
    if let Some(path) = &file.path {
        return Some(SelectedFile::from_path(path));
    }
    file.bytes
        .as_ref()
        .map(|bytes| SelectedFile::from_bytes(file.name.clone(), bytes.clone()))
}
