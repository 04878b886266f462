//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Usernames allowed to control the room timer.
const PRIVILEGED_USERNAMES: [&str; 2] = ["admin", "root"];

/// Username assigned to connections that do not supply one.
pub const ANONYMOUS_USERNAME: &str = "Anon";

/// Username value object.
///
/// Derived from the connection's query parameters. Sessions without a usable
/// username fall back to [`Username::anon`]; usernames are display names, not
/// identities, so several sessions may share one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create a new Username.
    ///
    /// # Returns
    ///
    /// A Result containing the Username or an error if validation fails
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::UsernameEmpty);
        }
        let len = name.len();
        if len > 100 {
            return Err(ValueObjectError::UsernameTooLong {
                max: 100,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// The anonymous fallback username.
    pub fn anon() -> Self {
        Self(ANONYMOUS_USERNAME.to_string())
    }

    /// Whether this username may control the room timer.
    pub fn is_privileged(&self) -> bool {
        PRIVILEGED_USERNAMES.contains(&self.0.as_str())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for Username {
    fn default() -> Self {
        Self::anon()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room name value object.
///
/// Rooms exist implicitly; the name is never validated against a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomName(String);

impl RoomName {
    /// Create a new RoomName.
    ///
    /// # Returns
    ///
    /// A Result containing the RoomName or an error if validation fails
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::RoomNameEmpty);
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Prefix that maps a room name onto its broadcast group.
const GROUP_PREFIX: &str = "chat_";

/// Broadcast group name value object.
///
/// The grouping key shared by the Broadcast Bus and the timer keys in the
/// shared store. Always derived from a room name as `"chat_" + room_name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupName(String);

impl GroupName {
    /// Derive the broadcast group name for a room.
    pub fn for_room(room: &RoomName) -> Self {
        Self(format!("{}{}", GROUP_PREFIX, room.as_str()))
    }

    /// The room name this group was derived from.
    pub fn room_name(&self) -> &str {
        self.0.strip_prefix(GROUP_PREFIX).unwrap_or(&self.0)
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session identifier value object.
///
/// Generated server-side per connection, so sessions sharing a username stay
/// distinguishable on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a SessionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timer instance identifier value object.
///
/// The opaque token stored under `chat-timer:<group>:id`. A timer task whose
/// id no longer matches the stored one has been stopped or superseded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerId(String);

impl TimerId {
    /// Create a new TimerId.
    ///
    /// # Returns
    ///
    /// A Result containing the TimerId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::TimerIdEmpty);
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The byte representation written to the shared store.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
