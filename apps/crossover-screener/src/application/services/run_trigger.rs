//! Run Trigger Service
//!
//! Entry point for starting screener runs in the background. Each trigger
//! spawns the run on the runtime and hands back a [`RunHandle`] so the caller
//! can await completion. At most one run is in flight per trigger; a second
//! trigger while one is running is rejected rather than queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::application::dto::{RunRequest, RunSummary};
use crate::application::ports::{PriceSourcePort, SnapshotStorePort, TickerUniversePort};
use crate::application::use_cases::{RunBacktestUseCase, RunError};

/// Run trigger errors.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// A run is already in progress.
    #[error("a screener run is already in progress")]
    AlreadyRunning,

    /// The run task panicked or was cancelled.
    #[error("screener run task failed: {message}")]
    Join {
        /// Join error details.
        message: String,
    },

    /// The run itself failed.
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Clears the in-flight flag when the run task ends, however it ends.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Handle to a background run.
#[derive(Debug)]
pub struct RunHandle {
    task: JoinHandle<Result<RunSummary, RunError>>,
}

impl RunHandle {
    /// Wait for the run to finish.
    pub async fn wait(self) -> Result<RunSummary, TriggerError> {
        match self.task.await {
            Ok(result) => Ok(result?),
            Err(e) => Err(TriggerError::Join {
                message: e.to_string(),
            }),
        }
    }

    /// Whether the run has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the run at its next suspension point.
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Single-flight trigger for screener runs.
pub struct RunTrigger<P, S, U>
where
    P: PriceSourcePort + 'static,
    S: SnapshotStorePort + 'static,
    U: TickerUniversePort + 'static,
{
    use_case: Arc<RunBacktestUseCase<P, S, U>>,
    running: Arc<AtomicBool>,
}

impl<P, S, U> RunTrigger<P, S, U>
where
    P: PriceSourcePort + 'static,
    S: SnapshotStorePort + 'static,
    U: TickerUniversePort + 'static,
{
    /// Create a new trigger over the scheduler.
    pub fn new(use_case: Arc<RunBacktestUseCase<P, S, U>>) -> Self {
        Self {
            use_case,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start a run in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn trigger(&self, request: RunRequest) -> Result<RunHandle, TriggerError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Run requested while another is in progress");
            return Err(TriggerError::AlreadyRunning);
        }

        let guard = InFlightGuard(Arc::clone(&self.running));
        let use_case = Arc::clone(&self.use_case);

        let task = tokio::spawn(async move {
            let _guard = guard;
            use_case.execute(request).await
        });

        Ok(RunHandle { task })
    }

    /// Whether a run is in progress.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
