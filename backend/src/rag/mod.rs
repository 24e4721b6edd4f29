//! RAG collaborator module
//!
//! The chat window never answers questions itself. It hands the text to a
//! [`RagBackend`] and shows whatever comes back.

pub mod script;

pub use script::ScriptBackend;

use crate::error::AppError;
use async_trait::async_trait;

/// The two external operations the GUI drives
#[async_trait]
pub trait RagBackend: Send + Sync {
    /// Answer a user query against the document index
    async fn query_rag(&self, text: &str) -> Result<String, AppError>;

    /// Rebuild the document index from the data directory
    async fn populate_database(&self) -> Result<(), AppError>;
}
