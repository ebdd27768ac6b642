// LogQuery - gui.rs
//
// Top-level eframe::App implementation.
// Wires together all UI panels and pumps backend results once per frame.

use crate::app::controller::QueryController;
use crate::core::model::QueryMode;
use crate::platform::fs::reveal_in_file_manager;
use crate::ui;
use crate::util::constants::{
    EXPORT_FILE_EXTENSION, EXPORT_FILE_NAME, PENDING_REPAINT_INTERVAL_MS,
};

/// The LogQuery application.
pub struct LogQueryApp {
    pub controller: QueryController,
}

impl LogQueryApp {
    /// Create a new application around an already mounted controller.
    pub fn new(controller: QueryController) -> Self {
        Self { controller }
    }

    /// Ask for a destination and start the download.
    fn start_download(&mut self) {
        let dialog = rfd::FileDialog::new()
            .add_filter("CSV", &[EXPORT_FILE_EXTENSION])
            .set_file_name(EXPORT_FILE_NAME)
            .set_directory(&self.controller.state.export_dir);

        match dialog.save_file() {
            Some(dest) => {
                // Rejections are reported through the status bar.
                let _ = self.controller.export_to(dest);
            }
            None => tracing::debug!("Save dialog cancelled"),
        }
    }

    fn status_bar(&mut self, ui: &mut egui::Ui) {
        let state = &mut self.controller.state;

        if let Some(error) = state.last_error.as_ref() {
            let mut dismiss = false;
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!(" {error} "))
                        .color(ui::theme::ERROR_TEXT)
                        .background_color(ui::theme::ERROR_BG),
                );
                if ui.small_button("Dismiss").clicked() {
                    dismiss = true;
                }
            });
            if dismiss {
                state.last_error = None;
            }
        }

        ui.horizontal(|ui| {
            ui.label(&state.status_message);

            if let Some(outcome) = state.last_export.as_ref() {
                if ui.small_button("Show in folder").clicked() {
                    reveal_in_file_manager(&outcome.path);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let total = state.records().map(<[_]>::len);
                match (state.query.mode(), total) {
                    (QueryMode::Filtered, Some(total)) => {
                        let matched = state.query.filtered_results().len();
                        ui.label(format!("{matched}/{total} logs"));
                    }
                    (_, Some(total)) => {
                        ui.label(format!("{total} logs"));
                    }
                    _ => {}
                }
                if state.fetch.any_in_flight() {
                    ui.spinner();
                }
                if state.debug_mode {
                    ui.label(egui::RichText::new("debug").small().weak());
                }
            });
        });
    }
}

impl eframe::App for LogQueryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.pump();

        ui::theme::apply_visuals(ctx, self.controller.state.dark_mode);

        // Keep polling while requests are outstanding.
        if self.controller.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(
                PENDING_REPAINT_INTERVAL_MS,
            ));
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui
                        .add_enabled(
                            self.controller.state.can_export(),
                            egui::Button::new("Download CSV\u{2026}"),
                        )
                        .clicked()
                    {
                        ui.close_menu();
                        self.start_download();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Reload").clicked() {
                        self.controller.retry_fetch();
                        ui.close_menu();
                    }
                    let theme_label = if self.controller.state.dark_mode {
                        "Light Theme"
                    } else {
                        "Dark Theme"
                    };
                    if ui.button(theme_label).clicked() {
                        self.controller.state.dark_mode = !self.controller.state.dark_mode;
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar(ui);
        });

        // Type tabs and date filter
        egui::TopBottomPanel::top("query_bar").show(ctx, |ui| {
            ui::panels::tabs::render(ui, &mut self.controller);
            ui.separator();
            if ui::panels::filters::render(ui, &mut self.controller) {
                self.start_download();
            }
        });

        // Central panel (results)
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::table::render(ui, &mut self.controller);
        });

        ui::panels::detail::render(ctx, &mut self.controller);
    }
}
