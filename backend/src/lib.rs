//! RAG Chat Backend Library
//!
//! Everything the chat window needs that is not drawing: configuration,
//! collaborator commands, file ingestion and the background task runner.
//! The GUI binary lives in the root package.

pub mod config;
pub mod error;
pub mod executor;
pub mod rag;
pub mod services;
pub mod tasks;

pub use config::Config;
pub use error::AppError;
pub use rag::{RagBackend, ScriptBackend};
pub use tasks::{TaskEvent, TaskId, TaskRunner};
