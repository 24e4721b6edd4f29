//! CLI executor implementation
//!
//! Executes collaborator commands by spawning processes and capturing their
//! output.

use crate::config::CommandSpec;
use crate::executor::error::ExecutionError;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info};

/// CLI executor for running collaborator processes
#[derive(Debug, Clone, Default)]
pub struct CliExecutor {
    /// Upper bound on a single execution (None = no limit)
    timeout: Option<Duration>,
    /// Working directory for spawned processes (None = current directory)
    working_dir: Option<PathBuf>,
}

impl CliExecutor {
    /// Create a new CLI executor with an optional timeout
    pub fn new(timeout_secs: Option<u64>) -> Self {
        Self {
            timeout: timeout_secs.map(Duration::from_secs),
            working_dir: None,
        }
    }

    /// Run every command from the given directory
    pub fn with_working_dir(mut self, working_dir: Option<PathBuf>) -> Self {
        self.working_dir = working_dir;
        self
    }

    /// Get the timeout duration
    #[cfg(test)]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Execute a command, optionally appending one trailing argument
    ///
    /// # Arguments
    /// * `command` - Program and leading arguments
    /// * `input` - Extra positional argument (the user query, for example)
    ///
    /// # Returns
    /// * `Ok(String)` - The stdout output from the process
    /// * `Err(ExecutionError)` - If execution failed
    pub async fn execute(
        &self,
        command: &CommandSpec,
        input: Option<&str>,
    ) -> Result<String, ExecutionError> {
        info!(
            program = %command.program,
            input_len = input.map_or(0, str::len),
            "Executing collaborator command"
        );

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(input) = input {
            cmd.arg(input);
        }
        if let Some(work_dir) = &self.working_dir {
            cmd.current_dir(work_dir);
        }
        // Dropping the output future on timeout must not leave the child behind
        cmd.kill_on_drop(true);

        debug!(
            program = %command.program,
            args = ?command.args,
            working_dir = ?self.working_dir,
            "Spawning process"
        );

        let output = match self.timeout {
            Some(limit) => timeout(limit, cmd.output()).await.map_err(|_| {
                error!(
                    program = %command.program,
                    timeout_secs = limit.as_secs(),
                    "Process execution timed out"
                );
                ExecutionError::Timeout(limit.as_secs())
            })?,
            None => cmd.output().await,
        };

        let output = output.map_err(|e| {
            error!(
                program = %command.program,
                error = %e,
                "Failed to spawn or execute process"
            );
            ExecutionError::SpawnFailed(e)
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);

            error!(
                program = %command.program,
                exit_code = exit_code,
                stderr = %stderr,
                "Process execution failed"
            );

            return Err(ExecutionError::ProcessFailed(format!(
                "Process exited with code {}: {}",
                exit_code,
                stderr.trim()
            )));
        }

        let response = String::from_utf8(output.stdout).map_err(|e| {
            ExecutionError::InvalidEncoding(format!("Failed to decode stdout: {}", e))
        })?;

        info!(
            program = %command.program,
            response_len = response.len(),
            "Command executed successfully"
        );

        Ok(response)
    }
}
