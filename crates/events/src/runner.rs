//! Bounded background runner for fire-and-forget work.
//!
//! [`BackgroundRunner::run`] hands a future to a bounded queue and returns
//! immediately. A supervisor task drains the queue and executes at most
//! `workers` futures at a time. Each future runs inside the tracing span
//! that was current when it was scheduled, so log lines emitted by a send
//! still carry the ticket and event fields of the request that caused it.
//!
//! Failures never reach the scheduler: a panic inside a task is caught and
//! logged, and a full queue drops the task with a warning. There is no
//! retry and no timeout at this layer.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use serde::Serialize;
use tracing::{Instrument, Span};

/// Default number of sends allowed to run concurrently.
const DEFAULT_WORKERS: usize = 8;

/// Default number of sends that may wait for a free worker.
const DEFAULT_QUEUE_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Sizing of the runner's worker pool and queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Maximum number of tasks executing at once.
    pub workers: usize,
    /// Maximum number of tasks waiting for a worker.
    pub queue_capacity: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl RunnerConfig {
    /// Load sizing from environment variables.
    ///
    /// | Variable                | Default |
    /// |-------------------------|---------|
    /// | `NOTIFY_WORKERS`        | `8`     |
    /// | `NOTIFY_QUEUE_CAPACITY` | `256`   |
    ///
    /// Zero or unparseable values fall back to the default.
    pub fn from_env() -> Self {
        fn read(var: &str, default: usize) -> usize {
            std::env::var(var)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(default)
        }
        Self {
            workers: read("NOTIFY_WORKERS", DEFAULT_WORKERS),
            queue_capacity: read("NOTIFY_QUEUE_CAPACITY", DEFAULT_QUEUE_CAPACITY),
        }
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// Point-in-time view of the runner queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunnerStatus {
    /// False once shutdown has begun.
    pub accepting: bool,
    /// Tasks waiting for the supervisor.
    pub queued: usize,
    pub queue_capacity: usize,
}

type BoxTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

struct Task {
    label: &'static str,
    span: Span,
    future: BoxTask,
}

// ---------------------------------------------------------------------------
// BackgroundRunner
// ---------------------------------------------------------------------------

/// Cheaply cloneable scheduling handle.
#[derive(Clone)]
pub struct BackgroundRunner {
    queue: mpsc::Sender<Task>,
}

/// Owns the supervisor task; used to stop the runner.
pub struct RunnerHandle {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl BackgroundRunner {
    /// Start the supervisor on the current Tokio runtime.
    pub fn start(config: RunnerConfig) -> (Self, RunnerHandle) {
        let workers = config.workers.max(1);
        let (queue, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let cancel = CancellationToken::new();

        let join = tokio::spawn(supervise(receiver, workers, cancel.clone()));
        tracing::info!(
            workers,
            queue_capacity = config.queue_capacity,
            "Background runner started"
        );

        (Self { queue }, RunnerHandle { cancel, join })
    }

    /// Schedule `work` and return immediately.
    ///
    /// The caller gets no handle and never observes the outcome. If the
    /// queue is full or the runner has stopped, the work is dropped and a
    /// warning is logged.
    pub fn run<F>(&self, label: &'static str, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task = Task {
            label,
            span: Span::current(),
            future: Box::pin(work),
        };

        match self.queue.try_send(task) {
            Ok(()) => tracing::debug!(task = label, "Background task queued"),
            Err(TrySendError::Full(task)) => {
                tracing::warn!(task = task.label, "Background queue full, dropping task");
            }
            Err(TrySendError::Closed(task)) => {
                tracing::warn!(task = task.label, "Background runner stopped, dropping task");
            }
        }
    }
}

impl BackgroundRunner {
    pub fn status(&self) -> RunnerStatus {
        let queue_capacity = self.queue.max_capacity();
        RunnerStatus {
            accepting: !self.queue.is_closed(),
            queued: queue_capacity - self.queue.capacity(),
            queue_capacity,
        }
    }
}

impl RunnerHandle {
    /// Stop accepting work, finish everything already queued or running,
    /// and wait up to `timeout` for that to complete.
    pub async fn shutdown(self, timeout: Duration) {
        self.cancel.cancel();
        match tokio::time::timeout(timeout, self.join).await {
            Ok(Ok(())) => tracing::info!("Background runner drained"),
            Ok(Err(e)) => tracing::error!(error = %e, "Background runner supervisor failed"),
            Err(_) => tracing::warn!(
                timeout_secs = timeout.as_secs(),
                "Background runner did not drain before timeout"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Supervisor
// ---------------------------------------------------------------------------

async fn supervise(mut receiver: mpsc::Receiver<Task>, workers: usize, cancel: CancellationToken) {
    let slots = Arc::new(Semaphore::new(workers));
    let tracker = TaskTracker::new();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            task = receiver.recv() => match task {
                Some(task) => launch(&tracker, &slots, task).await,
                None => break,
            },
        }
    }

    // Refuse new work but finish what is already buffered.
    receiver.close();
    while let Some(task) = receiver.recv().await {
        launch(&tracker, &slots, task).await;
    }

    tracker.close();
    tracker.wait().await;
}

/// Wait for a free slot, then run `task` on its own Tokio task.
async fn launch(tracker: &TaskTracker, slots: &Arc<Semaphore>, task: Task) {
    let Ok(permit) = Arc::clone(slots).acquire_owned().await else {
        return;
    };
    let Task {
        label,
        span,
        future,
    } = task;

    tracker.spawn(async move {
        let _permit = permit;
        // Panics surface here through the inner JoinHandle.
        let outcome = tokio::spawn(future.instrument(span.clone())).await;
        span.in_scope(|| match outcome {
            Ok(()) => tracing::debug!(task = label, "Background task finished"),
            Err(e) if e.is_panic() => tracing::error!(
                task = label,
                panic = %panic_message(e.into_panic().as_ref()),
                "Background task panicked"
            ),
            Err(e) => tracing::error!(task = label, error = %e, "Background task aborted"),
        });
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
