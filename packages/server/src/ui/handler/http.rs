//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::infrastructure::dto::http::{ParticipantDto, RoomSummaryDto};
use irori_shared::time::timestamp_to_rfc3339;

use super::super::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of active rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let room_summaries: Vec<RoomSummaryDto> = rooms
        .into_iter()
        .map(|room| RoomSummaryDto {
            name: room.name,
            participants: room
                .members
                .iter()
                .map(|member| ParticipantDto {
                    username: member.username.as_str().to_string(),
                    joined_at: timestamp_to_rfc3339(member.joined_at),
                })
                .collect(),
        })
        .collect();

    Json(room_summaries)
}
