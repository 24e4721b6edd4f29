// Color palette
// Dark palette used by the chat window

use eframe::egui::{self, Color32};

/// Main window background
pub const BACKGROUND: Color32 = Color32::from_rgb(0x23, 0x27, 0x2f);
/// Sidebar background
pub const SIDEBAR: Color32 = Color32::from_rgb(0x18, 0x1a, 0x20);
/// Transcript and input background
pub const SURFACE: Color32 = Color32::from_rgb(0x28, 0x2a, 0x36);
/// Regular text
pub const FOREGROUND: Color32 = Color32::from_rgb(0xf8, 0xf8, 0xf2);
/// Secondary buttons and selection
pub const BUTTON: Color32 = Color32::from_rgb(0x44, 0x47, 0x5a);
/// Primary buttons and hover
pub const ACCENT: Color32 = Color32::from_rgb(0x62, 0x72, 0xa4);
/// User lines in the transcript
pub const USER_TEXT: Color32 = Color32::from_rgb(0x8b, 0xe9, 0xfd);
/// Error text
pub const ERROR_TEXT: Color32 = Color32::from_rgb(0xff, 0x55, 0x55);

/// Install the dark palette
pub fn apply_dark_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = SURFACE;
    visuals.extreme_bg_color = SURFACE;
    visuals.override_text_color = Some(FOREGROUND);
    visuals.selection.bg_fill = BUTTON;
    visuals.widgets.inactive.weak_bg_fill = BUTTON;
    visuals.widgets.hovered.weak_bg_fill = ACCENT;
    visuals.widgets.active.weak_bg_fill = ACCENT;
    ctx.set_visuals(visuals);
}

/// Install egui's stock light palette
pub fn apply_light_theme(ctx: &egui::Context) {
    ctx.set_visuals(egui::Visuals::light());
}
