// Application controller
// Turns UI actions into state changes and background tasks, and applies
// finished task results back onto the state

use std::path::PathBuf;

use eframe::egui;
use rag_chat_backend::{TaskEvent, TaskRunner};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::state::{AppState, Notice, TranscriptLine};
use crate::ui::render_app_layout;

/// Something the user asked for during a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Create and select a new chat
    NewChat,
    /// Switch to the chat at this index
    SelectChat(usize),
    /// Open the native file picker
    PickFiles,
    /// Copy these files into the data folder
    AddFiles(Vec<PathBuf>),
    /// Rebuild the document database
    RefreshDatabase,
    /// Send the contents of the input box
    SendMessage,
    /// Close the oldest notice
    DismissNotice,
}

/// Main application struct
/// Owns the chat state and the channel back from the background runner
pub struct RagChatApp {
    /// Application state (sessions, selection, notices)
    pub state: AppState,
    /// Contents of the message input box
    pub input: String,
    runner: TaskRunner,
    events: UnboundedReceiver<TaskEvent>,
}

impl RagChatApp {
    /// Create the application with one empty chat selected
    pub fn new(runner: TaskRunner, events: UnboundedReceiver<TaskEvent>) -> Self {
        let mut app = Self {
            state: AppState::new(),
            input: String::new(),
            runner,
            events,
        };
        app.new_chat();
        app
    }

    /// Route a UI action to its handler
    pub fn dispatch(&mut self, action: UiAction) {
        debug!(?action, "Dispatching UI action");
        match action {
            UiAction::NewChat => self.new_chat(),
            UiAction::SelectChat(index) => self.select_chat(index),
            UiAction::PickFiles => self.pick_files(),
            UiAction::AddFiles(files) => self.add_files(files),
            UiAction::RefreshDatabase => self.refresh_database(),
            UiAction::SendMessage => self.send_message(),
            UiAction::DismissNotice => {
                self.state.dismiss_notice();
            }
        }
    }

    /// Create a new chat session and select it
    pub fn new_chat(&mut self) {
        let index = self.state.create_session();
        info!(session = index, total = self.state.session_count(), "Created chat session");
    }

    /// Switch the transcript view to another session
    pub fn select_chat(&mut self, index: usize) {
        if !self.state.select(index) {
            debug!(session = index, "Ignoring selection of unknown session");
        }
    }

    /// Ask the user for files, then add them
    pub fn pick_files(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Select files to add")
            .pick_files();
        match picked {
            Some(files) => self.add_files(files),
            None => debug!("File selection cancelled"),
        }
    }

    /// Copy files into the data folder in the background
    pub fn add_files(&mut self, files: Vec<PathBuf>) {
        if files.is_empty() {
            return;
        }
        self.state.ingests_in_flight += 1;
        self.runner.spawn_ingest(files);
    }

    /// Rebuild the document database in the background
    pub fn refresh_database(&mut self) {
        if self.state.populate_in_flight {
            debug!("Database refresh already running");
            return;
        }
        self.state.push_notice(Notice::info(
            "Populating Database",
            "Populating the Chroma database with files in the data folder...",
        ));
        self.state.populate_in_flight = true;
        self.runner.spawn_populate();
    }

    /// Send the input box contents to the query collaborator
    pub fn send_message(&mut self) {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return;
        }
        self.input.clear();

        let session = match self.state.selected_index() {
            Some(index) => index,
            None => self.state.create_session(),
        };
        self.state.append(session, TranscriptLine::from_user(text.clone()));
        self.state.begin_query(session);
        self.runner.spawn_query(session, text);
    }

    /// Apply every finished task result
    /// Returns the number of events applied
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    /// Directory files are copied into
    pub fn data_dir(&self) -> &PathBuf {
        self.runner.data_dir()
    }

    fn apply_event(&mut self, event: TaskEvent) {
        match event {
            TaskEvent::QueryCompleted {
                task,
                session,
                outcome,
            } => {
                self.state.finish_query(session);
                debug!(
                    task_id = %task,
                    session,
                    still_pending = self.state.pending_queries(session),
                    "Query completed"
                );
                let line = match outcome {
                    Ok(response) => TranscriptLine::from_bot(response.trim_end()),
                    Err(message) => TranscriptLine::bot_error(&message),
                };
                if !self.state.append(session, line) {
                    warn!(task_id = %task, session, "Response for unknown session dropped");
                }
            }
            TaskEvent::PopulateCompleted { task, outcome } => {
                self.state.populate_in_flight = false;
                match outcome {
                    Ok(()) => {
                        info!(task_id = %task, "Database populated");
                        self.state
                            .push_notice(Notice::info("Database Updated", "Chroma database populated."));
                    }
                    Err(message) => self
                        .state
                        .push_notice(Notice::error(format!("Failed to populate database: {}", message))),
                }
            }
            TaskEvent::IngestCompleted { task, outcome } => {
                self.state.ingests_in_flight = self.state.ingests_in_flight.saturating_sub(1);
                match outcome {
                    Ok(report) => {
                        for failure in &report.failed {
                            self.state.push_notice(Notice::error(format!(
                                "Failed to add file: {}\n{}",
                                failure.path.display(),
                                failure.error
                            )));
                        }
                        info!(
                            task_id = %task,
                            copied = report.copied.len(),
                            failed = report.failed.len(),
                            "Ingest finished"
                        );
                        self.state.push_notice(Notice::info(
                            "Files Added",
                            format!(
                                "{} of {} file(s) added to data folder.",
                                report.copied.len(),
                                report.total()
                            ),
                        ));
                    }
                    Err(message) => self
                        .state
                        .push_notice(Notice::error(format!("Failed to add files: {}", message))),
                }
            }
        }
    }
}

impl eframe::App for RagChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();

        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.add_files(dropped);
        }

        let data_dir = self.data_dir().display().to_string();
        let actions = render_app_layout(ctx, &mut self.state, &mut self.input, &data_dir);
        for action in actions {
            self.dispatch(action);
        }
    }
}
