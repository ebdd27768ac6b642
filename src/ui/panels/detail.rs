// LogQuery - ui/panels/detail.rs
//
// Record detail dialog: every field of one record in a floating window.

use crate::app::controller::QueryController;
use crate::ui::theme;

/// Render the detail window while the dialog is open.
pub fn render(ctx: &egui::Context, controller: &mut QueryController) {
    let Some(record) = controller.state.dialog.visible_record() else {
        return;
    };

    let mut open = true;
    let mut close_clicked = false;

    egui::Window::new("Log details")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(theme::DETAIL_WINDOW_WIDTH)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            egui::Grid::new("detail_grid")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    field(ui, "ID:", &record.id);
                    if let Some(log_type) = record.log_type() {
                        ui.label("Type:");
                        ui.colored_label(theme::log_type_colour(&log_type), log_type.as_ref());
                        ui.end_row();
                    }
                    field(ui, "Date:", &record.display_date());
                    if let Some(project) = record.project_id() {
                        field(ui, "Project:", &project);
                    }
                    if let Some(device) = record.device_id() {
                        field(ui, "Device:", &device);
                    }
                    for (key, value) in record.extra_fields() {
                        let text = match value {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        field(ui, &format!("{key}:"), &text);
                    }
                });

            ui.separator();
            ui.label("Info:");
            egui::ScrollArea::vertical()
                .max_height(200.0)
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(record.info().unwrap_or_default()).monospace());
                });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Copy JSON").clicked() {
                    match serde_json::to_string_pretty(record) {
                        Ok(json) => ui.ctx().copy_text(json),
                        Err(e) => tracing::warn!(error = %e, "Failed to serialise record"),
                    }
                }
                if ui.button("Close").clicked() {
                    close_clicked = true;
                }
            });
        });

    if !open || close_clicked {
        controller.close_details();
    }
}

fn field(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.label(label);
    ui.label(value);
    ui.end_row();
}
