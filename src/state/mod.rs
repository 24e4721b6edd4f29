// State management module
// Handles chat sessions, selection, notices and UI state

pub mod app_state;

pub use app_state::{AppState, ChatSession, Notice, NoticeKind, Speaker, TranscriptLine};
