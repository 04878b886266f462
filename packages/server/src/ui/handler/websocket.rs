//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::{RoomName, Session, SessionIdFactory, Username};

use super::super::state::{AppState, ConnectQuery};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_name): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // ユーザー名は任意のクエリパラメータ。欠落・空・不正な値はエラーに
    // せず "Anon" に defaulting する
    let username = query
        .username
        .and_then(|name| Username::new(name).ok())
        .unwrap_or_default();

    // ルーム名は存在チェックをしない（ルームは参加した瞬間に暗黙に生まれる）
    let room = match RoomName::new(room_name) {
        Ok(room) => room,
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };

    let session = Session::new(SessionIdFactory::generate(), username, room);

    // Create a channel for this session to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Use ConnectSessionUseCase to join the broadcast group
    state.connect_session_usecase.execute(&session, tx).await;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, session, rx)))
}

/// Spawns a task that receives messages from the rx channel and pushes them to
/// the WebSocket sender.
///
/// This function handles the outbound message flow: broadcasts addressed to
/// this session (via the rx channel) are delivered verbatim as text frames.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this session
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    session: Session,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    // Spawn a task to push broadcasts to this session
    let mut send_task = pusher_loop(rx, sender);

    let session_recv = session.clone();
    let state_recv = state.clone();

    // Spawn a task to receive messages from this session
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::info!(
                        "Received text from '{}' in '{}': {}",
                        session_recv.username,
                        session_recv.room,
                        text
                    );

                    // エコーとタイマーコマンドの両方を UseCase に委譲する
                    if let Err(e) = state_recv
                        .send_message_usecase
                        .execute(&session_recv, text.as_str())
                        .await
                    {
                        tracing::warn!(
                            "Failed to handle message from session '{}': {}",
                            session_recv.id,
                            e
                        );
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Session '{}' requested close", session_recv.id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Leave the broadcast group. Safe even if the join never fully completed
    state.disconnect_session_usecase.execute(&session).await;
}
