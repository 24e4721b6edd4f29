// Application state management
// Contains chat sessions, the selected session, notices and UI state

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::fmt;

/// Who wrote a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The person at the keyboard
    You,
    /// The RAG collaborator
    Bot,
}

impl Speaker {
    /// Prefix shown before the line text
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::You => "You",
            Speaker::Bot => "Bot",
        }
    }
}

/// One line of a chat transcript
#[derive(Debug, Clone)]
pub struct TranscriptLine {
    /// Who wrote it
    pub speaker: Speaker,
    /// The message text
    pub text: String,
    /// When it was appended
    pub at: DateTime<Local>,
}

impl TranscriptLine {
    /// A line typed by the user
    pub fn from_user(text: impl Into<String>) -> Self {
        Self::new(Speaker::You, text)
    }

    /// A line produced by the collaborator
    pub fn from_bot(text: impl Into<String>) -> Self {
        Self::new(Speaker::Bot, text)
    }

    /// The line shown when the collaborator failed
    pub fn bot_error(message: &str) -> Self {
        Self::from_bot(format!("[Error: {}]", message))
    }

    fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            at: Local::now(),
        }
    }
}

impl fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker.label(), self.text)
    }
}

/// A named chat with its own transcript
#[derive(Debug, Clone)]
pub struct ChatSession {
    /// Display name ("Chat 1", "Chat 2", ...)
    pub name: String,
    /// Ordered transcript
    pub history: Vec<TranscriptLine>,
    /// Queries sent from this session that have not come back yet
    pub pending: usize,
}

impl ChatSession {
    /// Create an empty session
    pub fn new(name: String) -> Self {
        Self {
            name,
            history: Vec::new(),
            pending: 0,
        }
    }
}

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational
    Info,
    /// Something failed
    Error,
}

/// A dismissible dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub kind: NoticeKind,
    /// Window title
    pub title: String,
    /// Body text
    pub message: String,
}

impl Notice {
    /// Informational notice
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

/// Main application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// All sessions, in creation order
    sessions: Vec<ChatSession>,
    /// Index of the selected session; always valid when set
    selected: Option<usize>,
    /// Whether a database refresh is running
    pub populate_in_flight: bool,
    /// File copy batches that have not finished
    pub ingests_in_flight: usize,
    /// Open notices, oldest first
    pub notices: VecDeque<Notice>,
    /// UI state preferences
    pub ui_state: UiState,
}

/// UI-specific state
#[derive(Debug, Clone)]
pub struct UiState {
    /// Whether to prefix transcript lines with their time
    pub show_timestamps: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            show_timestamps: false,
        }
    }
}

impl AppState {
    /// Create a new application state with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new empty session and select it
    /// Returns the index of the new session
    pub fn create_session(&mut self) -> usize {
        let index = self.sessions.len();
        self.sessions
            .push(ChatSession::new(format!("Chat {}", index + 1)));
        self.selected = Some(index);
        index
    }

    /// Select a session by index
    /// Returns false (and changes nothing) if the index is out of range
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.sessions.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Append a line to a session's transcript
    /// Returns false if the index is out of range
    pub fn append(&mut self, index: usize, line: TranscriptLine) -> bool {
        match self.sessions.get_mut(index) {
            Some(session) => {
                session.history.push(line);
                true
            }
            None => false,
        }
    }

    /// Index of the selected session, if any
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Get a reference to the selected session, if any
    pub fn selected_session(&self) -> Option<&ChatSession> {
        self.selected.and_then(|index| self.sessions.get(index))
    }

    /// All sessions in creation order
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// Get the number of sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Record that a query was sent from `index`
    pub fn begin_query(&mut self, index: usize) {
        if let Some(session) = self.sessions.get_mut(index) {
            session.pending += 1;
        }
    }

    /// Record that a query sent from `index` came back
    pub fn finish_query(&mut self, index: usize) {
        if let Some(session) = self.sessions.get_mut(index) {
            session.pending = session.pending.saturating_sub(1);
        }
    }

    /// Number of unanswered queries for a session (0 if out of range)
    pub fn pending_queries(&self, index: usize) -> usize {
        self.sessions.get(index).map_or(0, |s| s.pending)
    }

    /// Queue a notice for display
    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    /// Close the oldest notice
    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert_eq!(state.session_count(), 0);
        assert!(state.selected_session().is_none());
        assert!(state.selected_index().is_none());
    }

    #[test]
    fn test_create_session_names_and_selects() {
        let mut state = AppState::new();

        for n in 0..4 {
            assert_eq!(state.create_session(), n);
            assert_eq!(state.selected_index(), Some(n));
        }

        let names: Vec<_> = state.sessions().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Chat 1", "Chat 2", "Chat 3", "Chat 4"]);
        assert!(state.sessions().iter().all(|s| s.history.is_empty()));
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let mut state = AppState::new();
        state.create_session();
        state.create_session();

        assert!(state.select(0));
        assert!(!state.select(2));
        assert_eq!(state.selected_index(), Some(0));
    }

    #[test]
    fn test_transcripts_are_isolated() {
        let mut state = AppState::new();
        let first = state.create_session();
        let second = state.create_session();

        assert!(state.append(first, TranscriptLine::from_user("hello")));
        assert!(state.append(second, TranscriptLine::from_user("other")));
        assert!(state.append(first, TranscriptLine::from_bot("hi there")));

        let history: Vec<String> = state.sessions()[first]
            .history
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(history, vec!["You: hello", "Bot: hi there"]);
        assert_eq!(state.sessions()[second].history.len(), 1);
    }

    #[test]
    fn test_append_survives_switching_away_and_back() {
        let mut state = AppState::new();
        let first = state.create_session();
        state.append(first, TranscriptLine::from_user("remember me"));
        state.create_session();

        assert_eq!(state.selected_session().unwrap().history.len(), 0);
        state.select(first);
        let session = state.selected_session().unwrap();
        assert_eq!(session.name, "Chat 1");
        assert_eq!(session.history[0].to_string(), "You: remember me");
    }

    #[test]
    fn test_append_out_of_range_is_ignored() {
        let mut state = AppState::new();
        assert!(!state.append(0, TranscriptLine::from_user("nobody home")));
    }

    #[test]
    fn test_bot_error_line_shape() {
        let line = TranscriptLine::bot_error("connection refused");
        assert_eq!(line.speaker, Speaker::Bot);
        assert_eq!(line.to_string(), "Bot: [Error: connection refused]");
    }

    #[test]
    fn test_pending_queries_never_underflow() {
        let mut state = AppState::new();
        let index = state.create_session();

        state.begin_query(index);
        state.begin_query(index);
        assert_eq!(state.pending_queries(index), 2);
        state.finish_query(index);
        state.finish_query(index);
        state.finish_query(index);
        assert_eq!(state.pending_queries(index), 0);
        assert_eq!(state.pending_queries(99), 0);
    }

    #[test]
    fn test_notices_are_fifo() {
        let mut state = AppState::new();
        state.push_notice(Notice::info("Files Added", "1 file(s) added to data folder."));
        state.push_notice(Notice::error("Failed to populate database: boom"));

        assert_eq!(state.dismiss_notice().unwrap().title, "Files Added");
        let next = state.dismiss_notice().unwrap();
        assert_eq!(next.kind, NoticeKind::Error);
        assert!(state.dismiss_notice().is_none());
    }
}
