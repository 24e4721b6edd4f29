//! Background task module
//!
//! Runs collaborator calls and file copies off the UI thread and reports
//! back through a channel the GUI drains every frame.

pub mod runner;

pub use runner::{TaskEvent, TaskId, TaskRunner, Waker};
