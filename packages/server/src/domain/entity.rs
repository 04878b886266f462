//! Core domain models for the chat room server.

use super::value_object::{GroupName, RoomName, SessionId, Username};

/// Represents one live client connection and its derived identity.
///
/// Sessions are ephemeral: created on connect, destroyed on disconnect. All
/// durable state lives in the shared store, never on the session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Session identifier, generated per connection
    pub id: SessionId,
    /// Display name derived from the connection query parameters
    pub username: Username,
    /// Room this session joined
    pub room: RoomName,
}

impl Session {
    /// Create a new session
    pub fn new(id: SessionId, username: Username, room: RoomName) -> Self {
        Self { id, username, room }
    }

    /// The broadcast group this session belongs to
    pub fn group(&self) -> GroupName {
        GroupName::for_room(&self.room)
    }
}

/// Event fanned out to every member of a broadcast group.
///
/// Carries a discriminant plus the message text delivered verbatim to each
/// member's connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A line of chat, shown to members as-is
    Message { text: String },
}

impl ChatEvent {
    /// Chat line echoed for an inbound message: `"<username>: <text>"`.
    pub fn chat_line(username: &Username, text: &str) -> Self {
        Self::Message {
            text: format!("{}: {}", username.as_str(), text),
        }
    }

    /// Countdown tick line: `"time left: <remaining>"`.
    pub fn countdown_tick(remaining: u64) -> Self {
        Self::Message {
            text: format!("time left: {}", remaining),
        }
    }

    /// The message text delivered to members.
    pub fn text(&self) -> &str {
        match self {
            Self::Message { text } => text,
        }
    }
}
