//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Summary of an active room for the rooms list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    /// Room name (without the internal group prefix)
    pub name: String,
    /// Members currently connected to the room
    pub participants: Vec<ParticipantDto>,
}

/// One connected session within a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDto {
    /// Display name of the session
    pub username: String,
    /// Join time in RFC 3339 format
    pub joined_at: String,
}
