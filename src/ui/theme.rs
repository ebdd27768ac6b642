// LogQuery - ui/theme.rs
//
// Colour scheme, log type colour mapping, and layout constants.
// No dependencies on app state or business logic.

use egui::Color32;

/// Accent colour for a log type tab or table cell. Unknown types use the
/// neutral text colour.
pub fn log_type_colour(log_type: &str) -> Color32 {
    match log_type.to_ascii_lowercase().as_str() {
        "critical" | "fatal" => Color32::from_rgb(220, 38, 38), // Red 600
        "error" => Color32::from_rgb(239, 68, 68),              // Red 500
        "warning" | "warn" => Color32::from_rgb(217, 119, 6),   // Amber 600
        "info" => Color32::from_rgb(59, 130, 246),              // Blue 500
        "debug" | "trace" => Color32::from_rgb(107, 114, 128),  // Gray 500
        _ => Color32::from_rgb(156, 163, 175),                  // Gray 400
    }
}

/// Apply the dark or light base theme.
pub fn apply_visuals(ctx: &egui::Context, dark_mode: bool) {
    let visuals = if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    ctx.set_visuals(visuals);
}

/// Error banner colours.
pub const ERROR_BG: Color32 = Color32::from_rgb(127, 29, 29); // Red 900
pub const ERROR_TEXT: Color32 = Color32::from_rgb(254, 226, 226); // Red 100

/// Inline validation hint colour.
pub const INVALID_INPUT: Color32 = Color32::from_rgb(248, 113, 113); // Red 400

/// Placeholder bar colour for loading rows.
pub const SKELETON: Color32 = Color32::from_rgba_premultiplied(128, 128, 128, 40);

/// Layout constants.
pub const DATE_INPUT_WIDTH: f32 = 110.0;
pub const DETAIL_WINDOW_WIDTH: f32 = 520.0;
pub const ROW_HEIGHT: f32 = 20.0;
pub const SKELETON_WIDTH: f32 = 140.0;
