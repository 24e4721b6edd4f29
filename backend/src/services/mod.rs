//! Services module
//!
//! Filesystem work that runs behind the GUI.

pub mod ingest;

pub use ingest::{IngestError, IngestFailure, IngestReport, IngestService};
