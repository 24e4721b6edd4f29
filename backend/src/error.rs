//! Error types and error handling for the application
//!
//! Every failure the GUI can surface is represented here. Nothing in this
//! crate escalates an error past the task runner; callers turn these into
//! notices or `[Error: ...]` transcript lines.

use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// A configured value cannot be used (e.g. a blank command line)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error occurred while running an external command
    #[error("Execution error: {0}")]
    Execution(#[from] crate::executor::ExecutionError),

    /// Error occurred while copying files into the data directory
    #[error("Ingest error: {0}")]
    Ingest(#[from] crate::services::IngestError),

    /// A collaborator failed for a reason not covered by the other variants
    #[error("{0}")]
    Collaborator(String),
}
