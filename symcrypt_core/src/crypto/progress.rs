//! Progress tracking and the handle returned by asynchronous transforms.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;

use crate::crypto::errors::{CryptoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TransformState {
    Running = 0,
    Completed = 1,
    Cancelled = 2,
    Failed = 3,
}

impl TransformState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => TransformState::Completed,
            2 => TransformState::Cancelled,
            3 => TransformState::Failed,
            _ => TransformState::Running,
        }
    }
}

/// How a transform ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome<T> {
    Completed(T),
    Cancelled,
}

impl<T> TransformOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            TransformOutcome::Completed(value) => Some(value),
            TransformOutcome::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransformOutcome::Cancelled)
    }
}

/// Counters shared between the workers of one transform and whoever observes it.
#[derive(Debug, Default)]
pub(crate) struct Progress {
    completed: AtomicU64,
    total: AtomicU64,
    cancel_requested: AtomicBool,
    state: AtomicU8,
}

impl Progress {
    pub(crate) fn set_total(&self, blocks: u64) {
        self.total.store(blocks, Ordering::Relaxed);
    }

    pub(crate) fn advance(&self, blocks: u64) {
        self.completed.fetch_add(blocks, Ordering::Relaxed);
    }

    pub(crate) fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub(crate) fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub(crate) fn request_cancel(&self) {
        self.cancel_requested.store(true, Ordering::Release);
    }

    pub(crate) fn is_cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }

    pub(crate) fn state(&self) -> TransformState {
        TransformState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Moves out of `Running`. Later calls lose.
    pub(crate) fn finish(&self, state: TransformState) -> bool {
        self.state
            .compare_exchange(
                TransformState::Running as u8,
                state as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause");
    format!("transform panicked: {detail}")
}

/// A transform running on tokio's blocking pool.
///
/// Cancellation is cooperative: workers stop before their next block once it
/// is requested, and the transform then resolves to
/// [`TransformOutcome::Cancelled`].
pub struct TransformHandle<T> {
    progress: Arc<Progress>,
    task: Option<JoinHandle<Result<TransformOutcome<T>>>>,
}

impl<T: Send + 'static> TransformHandle<T> {
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn<F>(progress: Arc<Progress>, job: F) -> Self
    where
        F: FnOnce(&Progress) -> Result<TransformOutcome<T>> + Send + 'static,
    {
        let shared = Arc::clone(&progress);
        let task = tokio::task::spawn_blocking(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| job(&shared)))
                .unwrap_or_else(|payload| Err(CryptoError::Task(panic_message(payload.as_ref()))));
            let state = match &result {
                Ok(TransformOutcome::Completed(_)) => TransformState::Completed,
                Ok(TransformOutcome::Cancelled) => TransformState::Cancelled,
                Err(_) => TransformState::Failed,
            };
            shared.finish(state);
            result
        });

        TransformHandle {
            progress,
            task: Some(task),
        }
    }

    pub fn state(&self) -> TransformState {
        self.progress.state()
    }

    pub fn is_done(&self) -> bool {
        self.state() != TransformState::Running
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == TransformState::Cancelled
    }

    pub fn is_failed(&self) -> bool {
        self.state() == TransformState::Failed
    }

    pub fn cancel(&self) {
        debug!("cancellation requested");
        self.progress.request_cancel();
    }

    pub fn completed_blocks(&self) -> u64 {
        self.progress.completed()
    }

    pub fn total_blocks(&self) -> u64 {
        self.progress.total()
    }

    /// Fraction of blocks processed, `1.0` for an empty transform that has finished.
    pub fn progress(&self) -> f64 {
        let total = self.total_blocks();
        if total == 0 {
            return if self.is_done() { 1.0 } else { 0.0 };
        }
        self.completed_blocks() as f64 / total as f64
    }

    fn settle(
        &self,
        joined: std::result::Result<Result<TransformOutcome<T>>, tokio::task::JoinError>,
    ) -> Result<TransformOutcome<T>> {
        joined.map_err(|e| {
            self.progress.finish(TransformState::Failed);
            CryptoError::Task(e.to_string())
        })?
    }

    fn taken() -> CryptoError {
        CryptoError::Task("transform result was already collected".to_string())
    }

    pub async fn wait(mut self) -> Result<TransformOutcome<T>> {
        let task = self.task.take().ok_or_else(Self::taken)?;
        let joined = task.await;
        self.settle(joined)
    }

    /// `Ok(None)` if the transform is still running after `timeout`.
    pub async fn wait_timeout(&mut self, timeout: Duration) -> Result<Option<TransformOutcome<T>>> {
        let task = self.task.as_mut().ok_or_else(Self::taken)?;
        match tokio::time::timeout(timeout, task).await {
            Err(_) => Ok(None),
            Ok(joined) => {
                self.task = None;
                self.settle(joined).map(Some)
            }
        }
    }

    /// Blocks the current thread. Do not call from inside an async task.
    pub fn wait_blocking(mut self) -> Result<TransformOutcome<T>> {
        let task = self.task.take().ok_or_else(Self::taken)?;
        let joined = futures::executor::block_on(task);
        self.settle(joined)
    }
}
