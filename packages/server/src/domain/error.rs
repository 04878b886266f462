//! Domain layer error types.

use thiserror::Error;

/// Validation errors for value objects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("username must not be empty")]
    UsernameEmpty,

    #[error("username too long: max {max} chars, got {actual}")]
    UsernameTooLong { max: usize, actual: usize },

    #[error("room name must not be empty")]
    RoomNameEmpty,

    #[error("timer id must not be empty")]
    TimerIdEmpty,
}

/// Errors from the shared state store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store failed or became unreachable.
    #[error("shared store backend error: {0}")]
    Backend(String),
}

/// Errors from pushing messages to sessions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("session '{0}' not found")]
    SessionNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// A timer status value in the shared store that is neither `running` nor
/// `paused`. Invariant violation, fatal for the observing timer task.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unexpected timer status: {0}")]
pub struct UnexpectedTimerStatus(pub String);
