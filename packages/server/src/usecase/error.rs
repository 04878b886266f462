//! UseCase layer error types.

use thiserror::Error;

use crate::domain::{StoreError, UnexpectedTimerStatus};

/// Errors from timer control operations and the countdown task.
#[derive(Debug, Error)]
pub enum TimerError {
    /// The shared store failed; the current operation or task is aborted.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored status was neither `running` nor `paused`. Fatal for the
    /// observing timer task only.
    #[error(transparent)]
    UnexpectedStatus(#[from] UnexpectedTimerStatus),
}
