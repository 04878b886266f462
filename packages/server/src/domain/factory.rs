//! Domain factories for generating identifiers.

use super::{
    error::ValueObjectError,
    value_object::{SessionId, TimerId},
};

/// Factory for generating SessionId instances.
pub struct SessionIdFactory;

impl SessionIdFactory {
    /// Generate a new SessionId with a random UUID v4.
    pub fn generate() -> SessionId {
        SessionId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for generating TimerId instances.
///
/// A UUID v4 carries 122 random bits, far more than enough for timer
/// instances of one room to never collide in practice.
pub struct TimerIdFactory;

impl TimerIdFactory {
    /// Generate a new TimerId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for
    /// consistency with the domain error handling pattern.
    pub fn generate() -> Result<TimerId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        TimerId::new(uuid.to_string())
    }
}
