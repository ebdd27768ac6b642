// LogQuery - ui/panels/filters.rs
//
// Date range form with the Filter, Clear and Download actions.
// Each button is enabled only when its action would be accepted.

use crate::app::controller::QueryController;
use crate::core::model::parse_date_input;
use crate::ui::theme;

/// Render the filter form. Returns true when the user asked to download;
/// the caller owns the save dialog.
pub fn render(ui: &mut egui::Ui, controller: &mut QueryController) -> bool {
    let mut download_requested = false;

    ui.horizontal(|ui| {
        let mut changed = false;

        ui.label("From:");
        changed |= date_input(ui, &mut controller.state.start_input);
        ui.label("To:");
        changed |= date_input(ui, &mut controller.state.end_input);

        if changed {
            controller.state.sync_date_inputs();
        }

        ui.separator();

        let filtering = controller.state.query.is_filter_pending();
        let can_filter = controller.state.can_apply_filter();
        let filter_button = ui
            .add_enabled(can_filter, egui::Button::new("Filter"))
            .on_disabled_hover_text(filter_hint(controller, filtering));
        if filter_button.clicked() {
            // Rejections are reported through the status bar.
            let _ = controller.apply_filter();
        }
        if filtering {
            ui.spinner();
        }

        if ui
            .add_enabled(controller.state.can_clear(), egui::Button::new("Clear"))
            .clicked()
        {
            controller.clear_filter();
        }

        ui.separator();

        let exporting = controller.state.query.is_export_pending();
        let download_button = ui
            .add_enabled(
                controller.state.can_export(),
                egui::Button::new("Download CSV\u{2026}"),
            )
            .on_disabled_hover_text(if exporting {
                "A download is already in progress."
            } else {
                "Apply a date filter with at least one match first."
            });
        if download_button.clicked() {
            download_requested = true;
        }
        if exporting {
            ui.spinner();
        }
    });

    download_requested
}

/// One date text box with an inline marker for unparseable input.
fn date_input(ui: &mut egui::Ui, text: &mut String) -> bool {
    let response = ui.add(
        egui::TextEdit::singleline(text)
            .hint_text("YYYY-MM-DD")
            .desired_width(theme::DATE_INPUT_WIDTH),
    );
    if !text.trim().is_empty() && parse_date_input(text).is_none() {
        ui.label(egui::RichText::new("\u{26a0}").color(theme::INVALID_INPUT))
            .on_hover_text("Not a valid date");
    }
    response.changed()
}

fn filter_hint(controller: &QueryController, filtering: bool) -> &'static str {
    if filtering {
        "A filter request is already in progress."
    } else if !controller.state.query.date_range().is_complete() {
        "Enter both a start and an end date."
    } else if controller.state.records().is_none() {
        "Wait for the logs to finish loading."
    } else {
        "Filtering is not available."
    }
}
