//! Command execution module
//!
//! Runs the external collaborator commands: process spawning, output
//! capture, timeout management and error mapping.

pub mod cli;
pub mod error;

pub use cli::CliExecutor;
pub use error::ExecutionError;
