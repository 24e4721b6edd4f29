//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;

/// Default directory that receives ingested files
pub const DEFAULT_DATA_DIR: &str = "data";
/// Default command used to answer a query
pub const DEFAULT_QUERY_COMMAND: &str = "python3 query_data.py";
/// Default command used to (re)build the document database
pub const DEFAULT_POPULATE_COMMAND: &str = "python3 populate_database.py";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory configuration
    pub data: DataConfig,
    /// External collaborator configuration
    pub collaborators: CollaboratorConfig,
}

/// Data directory configuration
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Directory user files are copied into before the database is populated
    pub data_dir: PathBuf,
}

/// External collaborator configuration
#[derive(Debug, Clone)]
pub struct CollaboratorConfig {
    /// Raw command line for the RAG query collaborator
    pub query_command: String,
    /// Raw command line for the database population collaborator
    pub populate_command: String,
    /// Working directory for both commands (None = current directory)
    pub working_dir: Option<PathBuf>,
    /// Per-command timeout in seconds (None = wait forever)
    pub timeout_secs: Option<u64>,
}

/// A program plus its leading arguments, parsed from a raw command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path
    pub program: String,
    /// Arguments passed before any per-call argument
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Split a command line on whitespace
    ///
    /// Returns `None` for a blank command line.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            },
            collaborators: CollaboratorConfig {
                query_command: DEFAULT_QUERY_COMMAND.to_string(),
                populate_command: DEFAULT_POPULATE_COMMAND.to_string(),
                working_dir: None,
                timeout_secs: None,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            data: DataConfig {
                data_dir: env::var_os("RAG_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            },
            collaborators: CollaboratorConfig {
                query_command: env::var("RAG_QUERY_COMMAND")
                    .unwrap_or_else(|_| DEFAULT_QUERY_COMMAND.to_string()),
                populate_command: env::var("RAG_POPULATE_COMMAND")
                    .unwrap_or_else(|_| DEFAULT_POPULATE_COMMAND.to_string()),
                working_dir: env::var_os("RAG_WORKING_DIR").map(PathBuf::from),
                timeout_secs: env::var("RAG_COMMAND_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .filter(|secs: &u64| *secs > 0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "RAG_DATA_DIR",
        "RAG_QUERY_COMMAND",
        "RAG_POPULATE_COMMAND",
        "RAG_WORKING_DIR",
        "RAG_COMMAND_TIMEOUT_SECS",
    ];

    fn clear_vars() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_parse_command_spec() {
        let spec = CommandSpec::parse("python3  query_data.py --quiet").unwrap();
        assert_eq!(spec.program, "python3");
        assert_eq!(spec.args, vec!["query_data.py", "--quiet"]);
    }

    #[test]
    fn test_parse_blank_command_spec() {
        assert!(CommandSpec::parse("").is_none());
        assert!(CommandSpec::parse("   \t ").is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_vars();
        let config = Config::from_env();
        assert_eq!(config.data.data_dir, PathBuf::from("data"));
        assert_eq!(config.collaborators.query_command, DEFAULT_QUERY_COMMAND);
        assert_eq!(
            config.collaborators.populate_command,
            DEFAULT_POPULATE_COMMAND
        );
        assert!(config.collaborators.working_dir.is_none());
        assert!(config.collaborators.timeout_secs.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_vars();
        env::set_var("RAG_DATA_DIR", "/tmp/rag-data");
        env::set_var("RAG_QUERY_COMMAND", "./ask.sh");
        env::set_var("RAG_COMMAND_TIMEOUT_SECS", "45");
        let config = Config::from_env();
        clear_vars();

        assert_eq!(config.data.data_dir, PathBuf::from("/tmp/rag-data"));
        assert_eq!(config.collaborators.query_command, "./ask.sh");
        assert_eq!(config.collaborators.timeout_secs, Some(45));
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_timeout_falls_back() {
        clear_vars();
        env::set_var("RAG_COMMAND_TIMEOUT_SECS", "soon");
        assert!(Config::from_env().collaborators.timeout_secs.is_none());
        env::set_var("RAG_COMMAND_TIMEOUT_SECS", "0");
        assert!(Config::from_env().collaborators.timeout_secs.is_none());
        clear_vars();
    }
}
