//! Background task runner
//!
//! Every user action that may block (a query, a database refresh, a batch of
//! file copies) becomes one task on the tokio runtime. There is no queue, no
//! join and no cancellation: the task runs, sends exactly one [`TaskEvent`]
//! and wakes the GUI.

use crate::error::AppError;
use crate::rag::RagBackend;
use crate::services::{IngestReport, IngestService};
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Callback invoked after an event has been sent (the GUI requests a repaint)
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Identifier attached to each background task, used for log correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Uuid);

impl TaskId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Result of a finished background task
///
/// Failures are carried as display strings; by the time an event reaches the
/// GUI the only thing left to do with an error is show it.
#[derive(Debug)]
pub enum TaskEvent {
    /// A RAG query finished
    QueryCompleted {
        /// Task that produced the event
        task: TaskId,
        /// Index of the session the query was sent from
        session: usize,
        /// The response text, or why there is none
        outcome: Result<String, String>,
    },
    /// A database refresh finished
    PopulateCompleted {
        /// Task that produced the event
        task: TaskId,
        /// Success, or why the refresh failed
        outcome: Result<(), String>,
    },
    /// A batch of file copies finished
    IngestCompleted {
        /// Task that produced the event
        task: TaskId,
        /// Per-file report, or why the batch could not start
        outcome: Result<IngestReport, String>,
    },
}

/// Launches collaborator calls off the interactive thread
pub struct TaskRunner {
    handle: Handle,
    backend: Arc<dyn RagBackend>,
    data_dir: PathBuf,
    events: UnboundedSender<TaskEvent>,
    wake: Waker,
}

impl TaskRunner {
    /// Create a runner and the receiving end of its event channel
    pub fn new(
        handle: Handle,
        backend: Arc<dyn RagBackend>,
        data_dir: PathBuf,
        wake: Waker,
    ) -> (Self, UnboundedReceiver<TaskEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let runner = Self {
            handle,
            backend,
            data_dir,
            events,
            wake,
        };
        (runner, rx)
    }

    /// Directory ingested files are copied into
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Send `text` to the query collaborator on behalf of `session`
    pub fn spawn_query(&self, session: usize, text: String) -> TaskId {
        let task = TaskId::new();
        let backend = Arc::clone(&self.backend);
        info!(task_id = %task, session, query_len = text.len(), "Spawning query");

        self.spawn_guarded(
            task,
            "query",
            async move { backend.query_rag(&text).await.map_err(|e| e.to_string()) },
            move |outcome| TaskEvent::QueryCompleted {
                task,
                session,
                outcome,
            },
        );
        task
    }

    /// Run the populate collaborator
    pub fn spawn_populate(&self) -> TaskId {
        let task = TaskId::new();
        let backend = Arc::clone(&self.backend);
        info!(task_id = %task, "Spawning database population");

        self.spawn_guarded(
            task,
            "populate",
            async move { backend.populate_database().await.map_err(|e| e.to_string()) },
            move |outcome| TaskEvent::PopulateCompleted { task, outcome },
        );
        task
    }

    /// Copy `files` into the data directory
    pub fn spawn_ingest(&self, files: Vec<PathBuf>) -> TaskId {
        let task = TaskId::new();
        let data_dir = self.data_dir.clone();
        info!(task_id = %task, files = files.len(), data_dir = %data_dir.display(), "Spawning ingest");

        self.spawn_guarded(
            task,
            "ingest",
            async move {
                IngestService::copy_into(&data_dir, &files)
                    .await
                    .map_err(|e| AppError::from(e).to_string())
            },
            move |outcome| TaskEvent::IngestCompleted { task, outcome },
        );
        task
    }

    /// Spawn `work`, then report its outcome even if it panicked
    fn spawn_guarded<T, F, E>(&self, task: TaskId, kind: &'static str, work: F, into_event: E)
    where
        T: Send + 'static,
        F: Future<Output = Result<T, String>> + Send + 'static,
        E: FnOnce(Result<T, String>) -> TaskEvent + Send + 'static,
    {
        let span = info_span!("task", task_id = %task, kind = kind);
        let worker = self.handle.spawn(work.instrument(span.clone()));
        let events = self.events.clone();
        let wake = Arc::clone(&self.wake);

        self.handle.spawn(
            async move {
                let outcome = match worker.await {
                    Ok(outcome) => outcome,
                    Err(join_error) => {
                        error!(error = %join_error, "Background task aborted");
                        Err(format!("background task aborted: {}", join_error))
                    }
                };

                match &outcome {
                    Ok(_) => debug!("Background task finished"),
                    Err(e) => warn!(error = %e, "Background task failed"),
                }

                if events.send(into_event(outcome)).is_err() {
                    debug!("Event receiver dropped, discarding result");
                }
                wake();
            }
            .instrument(span),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::timeout;

    struct EchoBackend;

    #[async_trait]
    impl RagBackend for EchoBackend {
        async fn query_rag(&self, text: &str) -> Result<String, AppError> {
            if text == "fail" {
                return Err(AppError::Collaborator("index unavailable".to_string()));
            }
            if text == "panic" {
                panic!("collaborator blew up");
            }
            Ok(format!("echo: {}", text))
        }

        async fn populate_database(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn runner(wakes: Arc<AtomicUsize>) -> (TaskRunner, UnboundedReceiver<TaskEvent>) {
        TaskRunner::new(
            Handle::current(),
            Arc::new(EchoBackend),
            PathBuf::from("data"),
            Arc::new(move || {
                wakes.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    async fn next_event(rx: &mut UnboundedReceiver<TaskEvent>) -> TaskEvent {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for task event")
            .expect("channel closed")
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_query_result_is_delivered_with_session() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let (runner, mut rx) = runner(Arc::clone(&wakes));

        let task = runner.spawn_query(3, "hello".to_string());

        match next_event(&mut rx).await {
            TaskEvent::QueryCompleted {
                task: got,
                session,
                outcome,
            } => {
                assert_eq!(got, task);
                assert_eq!(session, 3);
                assert_eq!(outcome.unwrap(), "echo: hello");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        // The waker runs right after the send, possibly after recv returned
        for _ in 0..100 {
            if wakes.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_query_failure_becomes_error_outcome() {
        let (runner, mut rx) = runner(Arc::new(AtomicUsize::new(0)));

        runner.spawn_query(0, "fail".to_string());

        match next_event(&mut rx).await {
            TaskEvent::QueryCompleted { outcome, .. } => {
                assert_eq!(outcome.unwrap_err(), "index unavailable");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_panicking_collaborator_still_reports() {
        let (runner, mut rx) = runner(Arc::new(AtomicUsize::new(0)));

        runner.spawn_query(1, "panic".to_string());

        match next_event(&mut rx).await {
            TaskEvent::QueryCompleted { session, outcome, .. } => {
                assert_eq!(session, 1);
                assert!(outcome.unwrap_err().contains("aborted"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_populate_reports_completion() {
        let (runner, mut rx) = runner(Arc::new(AtomicUsize::new(0)));

        let task = runner.spawn_populate();

        match next_event(&mut rx).await {
            TaskEvent::PopulateCompleted { task: got, outcome } => {
                assert_eq!(got, task);
                assert!(outcome.is_ok());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_ingest_reports_per_file_results() {
        let source = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        let file = source.path().join("doc.txt");
        std::fs::write(&file, "text").unwrap();

        let (runner, mut rx) = TaskRunner::new(
            Handle::current(),
            Arc::new(EchoBackend),
            data.path().to_path_buf(),
            Arc::new(|| {}),
        );
        runner.spawn_ingest(vec![file, source.path().join("nope.txt")]);

        match next_event(&mut rx).await {
            TaskEvent::IngestCompleted { outcome, .. } => {
                let report = outcome.unwrap();
                assert_eq!(report.copied.len(), 1);
                assert_eq!(report.failed.len(), 1);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(data.path().join("doc.txt").exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_ingest_batch_failure_is_reported_as_ingest_error() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("data");
        std::fs::write(&blocker, "not a directory").unwrap();

        let (runner, mut rx) = TaskRunner::new(
            Handle::current(),
            Arc::new(EchoBackend),
            blocker,
            Arc::new(|| {}),
        );
        runner.spawn_ingest(vec![root.path().join("doc.txt")]);

        match next_event(&mut rx).await {
            TaskEvent::IngestCompleted { outcome, .. } => {
                let error = outcome.unwrap_err();
                assert!(error.starts_with("Ingest error: Failed to create data directory"), "got: {error}");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_queries_all_complete() {
        let (runner, mut rx) = runner(Arc::new(AtomicUsize::new(0)));

        for i in 0..5 {
            runner.spawn_query(i % 2, format!("q{}", i));
        }

        let mut answers = Vec::new();
        for _ in 0..5 {
            if let TaskEvent::QueryCompleted { outcome, .. } = next_event(&mut rx).await {
                answers.push(outcome.unwrap());
            }
        }
        answers.sort();
        assert_eq!(
            answers,
            vec!["echo: q0", "echo: q1", "echo: q2", "echo: q3", "echo: q4"]
        );
    }
}
