// LogQuery - ui/panels/table.rs
//
// Results table. Exactly one render state is drawn per frame; the state is
// chosen by `core::render::select`.

use crate::app::controller::QueryController;
use crate::core::model::LogRecord;
use crate::core::render::RenderState;
use crate::ui::theme;
use crate::util::constants::{INFO_PREVIEW_CHARS, LOADING_PLACEHOLDER_ROWS};
use std::borrow::Cow;

const COLUMNS: [&str; 6] = ["Date", "Type", "Project", "Device", "Info", ""];

/// Fixed widths of every column but Info, which takes what is left.
const DATE_WIDTH: f32 = 150.0;
const TYPE_WIDTH: f32 = 70.0;
const ID_WIDTH: f32 = 110.0;
const VIEW_WIDTH: f32 = 50.0;
const MIN_INFO_WIDTH: f32 = 120.0;

/// Render the table for the selected log type.
pub fn render(ui: &mut egui::Ui, controller: &mut QueryController) {
    let mut view: Option<LogRecord> = None;
    let mut retry = false;

    {
        let state = &controller.state;
        let last_viewed = state.dialog.selected_record().map(|r| r.id.as_str());

        match state.render_state() {
            RenderState::Loading => loading_rows(ui),
            RenderState::FetchFailed { message } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.colored_label(theme::INVALID_INPUT, format!("Could not load logs: {message}"));
                    retry = ui.button("Retry").clicked();
                });
            }
            RenderState::UnfilteredEmpty => placeholder(ui, "No logs of this type."),
            RenderState::FilteredEmpty => {
                placeholder(ui, "No logs match the selected date range.")
            }
            RenderState::UnfilteredResults(rows) | RenderState::FilteredResults(rows) => {
                view = record_grid(ui, rows, last_viewed).clicked;
            }
        }
    }

    if retry {
        controller.retry_fetch();
    }
    if let Some(record) = view {
        controller.view_details(&record);
    }
}

fn info_width(ui: &egui::Ui) -> f32 {
    let spacing = ui.spacing().item_spacing.x * (COLUMNS.len() - 1) as f32;
    let fixed = DATE_WIDTH + TYPE_WIDTH + 2.0 * ID_WIDTH + VIEW_WIDTH + spacing;
    (ui.available_width() - fixed).max(MIN_INFO_WIDTH)
}

fn widths(info: f32) -> [f32; 6] {
    [DATE_WIDTH, TYPE_WIDTH, ID_WIDTH, ID_WIDTH, info, VIEW_WIDTH]
}

fn cell(ui: &mut egui::Ui, width: f32, text: impl Into<egui::WidgetText>) -> egui::Response {
    ui.add_sized(
        [width, theme::ROW_HEIGHT],
        egui::Label::new(text).truncate(),
    )
}

fn header(ui: &mut egui::Ui, info: f32) {
    ui.horizontal(|ui| {
        for (title, width) in COLUMNS.iter().zip(widths(info)) {
            cell(ui, width, egui::RichText::new(*title).strong());
        }
    });
    ui.separator();
}

fn loading_rows(ui: &mut egui::Ui) {
    let info = info_width(ui);
    header(ui, info);
    for _ in 0..LOADING_PLACEHOLDER_ROWS {
        ui.horizontal(|ui| {
            for width in &widths(info)[..COLUMNS.len() - 1] {
                let (rect, _) = ui.allocate_exact_size(
                    egui::vec2(width.min(theme::SKELETON_WIDTH) * 0.6, theme::ROW_HEIGHT * 0.6),
                    egui::Sense::hover(),
                );
                ui.painter().rect_filled(rect, 3.0, theme::SKELETON);
                let pad = (width - rect.width()).max(0.0);
                ui.add_space(pad);
            }
            ui.spinner();
        });
    }
}

fn placeholder(ui: &mut egui::Ui, text: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        ui.label(egui::RichText::new(text).weak());
    });
}

struct GridResponse {
    /// Record whose "View" button was clicked.
    clicked: Option<LogRecord>,
    /// Rows laid out this frame.
    drawn: usize,
}

/// Draw the records. Only the rows inside the viewport are laid out, so the
/// cost per frame does not grow with the size of the fetched set.
fn record_grid(ui: &mut egui::Ui, rows: &[LogRecord], last_viewed: Option<&str>) -> GridResponse {
    let mut clicked = None;
    let mut drawn = 0;
    let info = info_width(ui);
    let [date_w, type_w, project_w, device_w, info_w, view_w] = widths(info);
    header(ui, info);

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show_rows(ui, theme::ROW_HEIGHT, rows.len(), |ui, row_range| {
            for idx in row_range {
                let Some(record) = rows.get(idx) else {
                    continue;
                };
                drawn += 1;
                let highlighted = last_viewed == Some(record.id.as_str());
                if highlighted {
                    let rect = egui::Rect::from_min_size(
                        ui.cursor().min,
                        egui::vec2(ui.available_width(), theme::ROW_HEIGHT),
                    );
                    ui.painter()
                        .rect_filled(rect, 0.0, ui.visuals().selection.bg_fill.gamma_multiply(0.3));
                }

                ui.horizontal(|ui| {
                    let date = egui::RichText::new(record.display_date()).monospace();
                    cell(ui, date_w, if highlighted { date.strong() } else { date });

                    let log_type = record.log_type().unwrap_or_default();
                    cell(
                        ui,
                        type_w,
                        egui::RichText::new(log_type.as_ref())
                            .color(theme::log_type_colour(&log_type)),
                    );
                    cell(ui, project_w, record.project_id().unwrap_or(Cow::Borrowed("-")).as_ref());
                    cell(ui, device_w, record.device_id().unwrap_or(Cow::Borrowed("-")).as_ref());

                    let info = record.info().unwrap_or_default();
                    cell(ui, info_w, preview(&info)).on_hover_text(info.as_ref());

                    let view = ui.add_sized(
                        [view_w, theme::ROW_HEIGHT],
                        egui::Button::new("View").small(),
                    );
                    if view.clicked() {
                        clicked = Some(record.clone());
                    }
                });
            }
        });
    GridResponse { clicked, drawn }
}

/// First `INFO_PREVIEW_CHARS` characters of `text`, with an ellipsis when cut.
fn preview(text: &str) -> String {
    match text.char_indices().nth(INFO_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}\u{2026}", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let short = "Valve stuck";
        assert_eq!(preview(short), short);

        let long = "\u{e9}".repeat(INFO_PREVIEW_CHARS + 5);
        let p = preview(&long);
        assert_eq!(p.chars().count(), INFO_PREVIEW_CHARS + 1);
        assert!(p.ends_with('\u{2026}'));
    }

    #[test]
    fn test_large_result_set_lays_out_visible_rows_only() {
        let rows: Vec<LogRecord> = (0..20_000)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "_id": format!("r{i}"),
                    "type": "error",
                    "deviceId": i,
                    "info": "Valve stuck",
                    "date": "2024-01-05T10:00:00Z"
                }))
                .unwrap()
            })
            .collect();

        let ctx = egui::Context::default();
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1024.0, 768.0),
            )),
            ..Default::default()
        };
        let mut drawn = 0;
        let mut clicked = false;
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let response = record_grid(ui, &rows, Some("r3"));
                drawn = response.drawn;
                clicked = response.clicked.is_some();
            });
        });

        assert!(drawn > 0);
        assert!(drawn < 200, "laid out {drawn} rows");
        assert!(!clicked);
    }
}
