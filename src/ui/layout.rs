// Main application layout
// Handles menu bar, chat sidebar, transcript, input bar and notices

use eframe::egui;
use crate::app::UiAction;
use crate::state::AppState;
use crate::ui::components::*;
use crate::ui::theme;

/// Render the main application layout
/// Returns the actions the user triggered this frame
pub fn render_app_layout(
    ctx: &egui::Context,
    state: &mut AppState,
    input: &mut String,
    data_dir: &str,
) -> Vec<UiAction> {
    let mut actions = Vec::new();

    render_menu_bar(ctx, state, &mut actions);
    render_sidebar(ctx, state, data_dir, &mut actions);
    render_input_bar(ctx, input, &mut actions);
    render_transcript(ctx, state);

    if let Some(notice) = state.notices.front() {
        if notice_window(ctx, notice) {
            actions.push(UiAction::DismissNotice);
        }
    }

    actions
}

/// Render the top menu bar
fn render_menu_bar(ctx: &egui::Context, state: &mut AppState, actions: &mut Vec<UiAction>) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New Chat").clicked() {
                    actions.push(UiAction::NewChat);
                    ui.close_menu();
                }
                if ui.button("Add File...").clicked() {
                    actions.push(UiAction::PickFiles);
                    ui.close_menu();
                }
                if ui
                    .add_enabled(!state.populate_in_flight, egui::Button::new("Refresh Database"))
                    .clicked()
                {
                    actions.push(UiAction::RefreshDatabase);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let mut dark_mode = ctx.style().visuals.dark_mode;
                if ui.checkbox(&mut dark_mode, "Dark Mode").changed() {
                    if dark_mode {
                        theme::apply_dark_theme(ctx);
                    } else {
                        theme::apply_light_theme(ctx);
                    }
                }
                ui.checkbox(&mut state.ui_state.show_timestamps, "Show Timestamps");
            });
        });
    });
}

/// Render the left sidebar: New Chat, chat list, data folder actions
fn render_sidebar(ctx: &egui::Context, state: &AppState, data_dir: &str, actions: &mut Vec<UiAction>) {
    egui::SidePanel::left("chat_sidebar")
        .resizable(false)
        .exact_width(250.0)
        .frame(egui::Frame::side_top_panel(&ctx.style()).fill(theme::SIDEBAR))
        .show(ctx, |ui| {
            ui.add_space(10.0);
            if primary_button(ui, "New Chat").clicked() {
                actions.push(UiAction::NewChat);
            }
            ui.add_space(5.0);

            // Bottom actions first so the list gets the remaining height
            egui::TopBottomPanel::bottom("sidebar_actions")
                .frame(egui::Frame::none())
                .show_inside(ui, |ui| {
                    ui.add_space(5.0);
                    let refresh_label = if state.populate_in_flight {
                        "Refreshing..."
                    } else {
                        "Refresh Database"
                    };
                    if sidebar_button(ui, refresh_label, !state.populate_in_flight).clicked() {
                        actions.push(UiAction::RefreshDatabase);
                    }
                    ui.add_space(5.0);
                    if state.ingests_in_flight > 0 {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(egui::RichText::new("Adding files...").weak());
                        });
                        ui.add_space(5.0);
                    }
                    if sidebar_button(ui, "Add File", true)
                        .on_hover_text(format!("Copy files into {} (or drop them on the window)", data_dir))
                        .clicked()
                    {
                        actions.push(UiAction::PickFiles);
                    }
                    ui.add_space(10.0);
                });

            egui::ScrollArea::vertical()
                .id_source("chat_list_scroll")
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    let selected = state.selected_index();
                    for (index, session) in state.sessions().iter().enumerate() {
                        if chat_row(ui, session, selected == Some(index)).clicked() {
                            actions.push(UiAction::SelectChat(index));
                        }
                        ui.add_space(2.0);
                    }
                });
        });
}

/// Render the message input and Send button
fn render_input_bar(ctx: &egui::Context, input: &mut String, actions: &mut Vec<UiAction>) {
    egui::TopBottomPanel::bottom("input_bar")
        .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(10.0)))
        .show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Send").clicked() {
                    actions.push(UiAction::SendMessage);
                }
                let response = ui.add(
                    egui::TextEdit::singleline(input)
                        .hint_text("Type a message and press Enter")
                        .desired_width(f32::INFINITY),
                );
                // Enter sends and keeps the cursor in the box
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    actions.push(UiAction::SendMessage);
                    response.request_focus();
                }
            });
        });
}

/// Render the selected session's transcript
fn render_transcript(ctx: &egui::Context, state: &AppState) {
    egui::CentralPanel::default().show(ctx, |ui| match state.selected_session() {
        Some(session) => transcript_view(ui, session, state.ui_state.show_timestamps),
        None => {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.label(egui::RichText::new("Create a chat to get started").weak());
            });
        }
    });
}
