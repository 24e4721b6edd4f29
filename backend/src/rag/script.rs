//! Script-backed collaborators
//!
//! Both collaborators are external programs: the query command gets the user
//! text as its last argument and answers on stdout, the populate command is
//! run as-is and only its exit status matters.

use crate::config::{CollaboratorConfig, CommandSpec};
use crate::error::AppError;
use crate::executor::CliExecutor;
use crate::rag::RagBackend;
use async_trait::async_trait;
use tracing::{debug, info};

/// [`RagBackend`] that shells out to the query and populate commands
#[derive(Debug, Clone)]
pub struct ScriptBackend {
    query: CommandSpec,
    populate: CommandSpec,
    executor: CliExecutor,
}

impl ScriptBackend {
    /// Build a backend from explicit commands
    pub fn new(query: CommandSpec, populate: CommandSpec, executor: CliExecutor) -> Self {
        Self {
            query,
            populate,
            executor,
        }
    }

    /// Build a backend from configuration
    ///
    /// Fails if either command line is blank.
    pub fn from_config(config: &CollaboratorConfig) -> Result<Self, AppError> {
        let query = CommandSpec::parse(&config.query_command).ok_or_else(|| {
            AppError::InvalidConfig("query command must not be empty".to_string())
        })?;
        let populate = CommandSpec::parse(&config.populate_command).ok_or_else(|| {
            AppError::InvalidConfig("populate command must not be empty".to_string())
        })?;
        let executor =
            CliExecutor::new(config.timeout_secs).with_working_dir(config.working_dir.clone());

        info!(
            query = %config.query_command,
            populate = %config.populate_command,
            "Script backend configured"
        );

        Ok(Self::new(query, populate, executor))
    }
}

#[async_trait]
impl RagBackend for ScriptBackend {
    async fn query_rag(&self, text: &str) -> Result<String, AppError> {
        let stdout = self.executor.execute(&self.query, Some(text)).await?;
        Ok(stdout.trim_end().to_string())
    }

    async fn populate_database(&self) -> Result<(), AppError> {
        let stdout = self.executor.execute(&self.populate, None).await?;
        debug!(output_len = stdout.len(), "Populate command finished");
        Ok(())
    }
}
