// LogQuery - ui/panels/tabs.rs
//
// Log type selector strip.

use crate::app::controller::QueryController;
use crate::ui::theme;

/// Render one tab per configured log type.
pub fn render(ui: &mut egui::Ui, controller: &mut QueryController) {
    let selected = controller.state.selected_log_type().to_string();
    let mut clicked: Option<String> = None;

    ui.horizontal_wrapped(|ui| {
        for log_type in &controller.state.log_types {
            let is_selected = *log_type == selected;
            let mut text = egui::RichText::new(log_type).color(theme::log_type_colour(log_type));
            if is_selected {
                text = text.strong();
            }
            let in_flight = controller.state.fetch.view(log_type).in_flight;
            if ui.selectable_label(is_selected, text).clicked() {
                clicked = Some(log_type.clone());
            }
            if in_flight {
                ui.spinner();
            }
        }
    });

    if let Some(log_type) = clicked {
        // Rejections are reported through the status bar.
        let _ = controller.select_log_type(&log_type);
    }
}
