// Reusable UI components
// Chat list rows, transcript view, buttons and notice windows

use eframe::egui;
use crate::state::{ChatSession, Notice, NoticeKind, Speaker, TranscriptLine};
use crate::ui::theme;

/// Full-width button with accent fill (New Chat)
pub fn primary_button(ui: &mut egui::Ui, text: &str) -> egui::Response {
    ui.add_sized(
        [ui.available_width(), 28.0],
        egui::Button::new(egui::RichText::new(text).strong()).fill(theme::ACCENT),
    )
}

/// Full-width secondary button, optionally disabled
pub fn sidebar_button(ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
    ui.add_enabled_ui(enabled, |ui| {
        ui.add_sized([ui.available_width(), 28.0], egui::Button::new(text))
    })
    .inner
}

/// One entry of the chat list
/// Shows a spinner while the chat has unanswered queries
pub fn chat_row(ui: &mut egui::Ui, session: &ChatSession, is_selected: bool) -> egui::Response {
    let mut frame = egui::Frame::none()
        .rounding(egui::Rounding::same(4.0))
        .inner_margin(egui::Margin::symmetric(8.0, 4.0));
    if is_selected {
        frame = frame.fill(ui.visuals().selection.bg_fill);
    }

    let row = frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(&session.name);
            if session.pending > 0 {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.spinner();
                });
            }
        });
    });

    let response = ui.interact(
        row.response.rect,
        ui.id().with(("chat_row", &session.name)),
        egui::Sense::click(),
    );
    if response.hovered() && !is_selected {
        ui.painter().rect_stroke(
            row.response.rect,
            egui::Rounding::same(4.0),
            egui::Stroke::new(1.0, ui.visuals().widgets.hovered.bg_stroke.color),
        );
    }
    response
}

fn line_text(line: &TranscriptLine, show_timestamps: bool) -> egui::RichText {
    let text = if show_timestamps {
        format!("[{}] {}", line.at.format("%H:%M:%S"), line)
    } else {
        line.to_string()
    };
    let color = match line.speaker {
        Speaker::You => theme::USER_TEXT,
        Speaker::Bot if line.text.starts_with("[Error:") => theme::ERROR_TEXT,
        Speaker::Bot => theme::FOREGROUND,
    };
    egui::RichText::new(text).color(color)
}

/// Read-only transcript that follows new lines
pub fn transcript_view(ui: &mut egui::Ui, session: &ChatSession, show_timestamps: bool) {
    egui::Frame::none()
        .fill(theme::SURFACE)
        .inner_margin(egui::Margin::same(10.0))
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_source("transcript_scroll")
                .auto_shrink([false; 2])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    if session.history.is_empty() && session.pending == 0 {
                        ui.label(egui::RichText::new("Ask a question about your documents").italics().weak());
                    }
                    for line in &session.history {
                        ui.add(egui::Label::new(line_text(line, show_timestamps)).wrap(true));
                        ui.add_space(6.0);
                    }
                    if session.pending > 0 {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(egui::RichText::new("Waiting for response...").weak());
                        });
                    }
                });
        });
}

/// Centered dialog for the oldest notice
/// Returns true when the user dismissed it
pub fn notice_window(ctx: &egui::Context, notice: &Notice) -> bool {
    let mut dismissed = false;
    egui::Window::new(&notice.title)
        .id(egui::Id::new("notice_window"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let text = egui::RichText::new(&notice.message);
            let text = match notice.kind {
                NoticeKind::Info => text,
                NoticeKind::Error => text.color(theme::ERROR_TEXT),
            };
            ui.label(text);
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });
    dismissed
}
