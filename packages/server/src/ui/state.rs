//! Server state and connection management.

use std::sync::Arc;

use serde::Deserialize;

use crate::usecase::{
    ConnectSessionUseCase, DisconnectSessionUseCase, GetRoomsUseCase, SendMessageUseCase,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Optional display name; sessions without one become "Anon"
    pub username: Option<String>,
}

/// Shared application state
pub struct AppState {
    /// ConnectSessionUseCase（セッション接続のユースケース）
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    /// DisconnectSessionUseCase（セッション切断のユースケース）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// SendMessageUseCase（受信メッセージ処理のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
}
