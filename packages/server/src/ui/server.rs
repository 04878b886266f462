//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    ConnectSessionUseCase, DisconnectSessionUseCase, GetRoomsUseCase, SendMessageUseCase,
};

use super::{
    handler::{get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat room server
///
/// This struct encapsulates the server configuration and provides methods to
/// run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_session_usecase,
///     disconnect_session_usecase,
///     send_message_usecase,
///     get_rooms_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// ConnectSessionUseCase（セッション接続のユースケース）
    connect_session_usecase: Arc<ConnectSessionUseCase>,
    /// DisconnectSessionUseCase（セッション切断のユースケース）
    disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// SendMessageUseCase（受信メッセージ処理のユースケース）
    send_message_usecase: Arc<SendMessageUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_session_usecase: Arc<ConnectSessionUseCase>,
        disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
    ) -> Self {
        Self {
            connect_session_usecase,
            disconnect_session_usecase,
            send_message_usecase,
            get_rooms_usecase,
        }
    }

    /// Build the router backing this server.
    ///
    /// Exposed so integration tests can serve the real routes on an
    /// ephemeral port.
    pub fn into_router(self) -> Router {
        let app_state = Arc::new(AppState {
            connect_session_usecase: self.connect_session_usecase,
            disconnect_session_usecase: self.disconnect_session_usecase,
            send_message_usecase: self.send_message_usecase,
            get_rooms_usecase: self.get_rooms_usecase,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws/{room_name}", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the WebSocket chat server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.into_router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "WebSocket chat room server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws/{{room_name}}", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
