//! Collaborator command errors
//!
//! Ways a query or populate command can fail before it produces an answer.

use thiserror::Error;

/// Failure of one collaborator command run
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// Command ran but exited unsuccessfully; carries exit code and stderr
    #[error("Process execution failed: {0}")]
    ProcessFailed(String),

    /// Command was still running when the configured timeout (seconds) ran out
    #[error("Command execution timed out after {0} seconds")]
    Timeout(u64),

    /// Command could not be started, e.g. the interpreter is not on PATH
    #[error("Failed to spawn process: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// Command answered with bytes that are not UTF-8
    #[error("Invalid output encoding: {0}")]
    InvalidEncoding(String),
}
