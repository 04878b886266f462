//! WebSocket chat room server with a shared, cross-process room timer.
//!
//! Clients join a room over WebSocket and every message is broadcast to the
//! room. Privileged users (admin / root) can drive a per-room countdown timer
//! whose state lives in Redis, so the timer survives its starting session and
//! can be controlled from any server process.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-server
//! cargo run --bin irori-server -- --host 0.0.0.0 --port 3000
//! cargo run --bin irori-server -- --redis-url redis://10.0.0.5:6379
//! ```

use std::sync::Arc;

use clap::Parser;
use irori_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, store::RedisSharedStore},
    ui::Server,
    usecase::{
        ConnectSessionUseCase, ControlTimerUseCase, DisconnectSessionUseCase, GetRoomsUseCase,
        SendMessageUseCase,
    },
};
use irori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "irori-server")]
#[command(about = "WebSocket chat room server with shared room timers", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Redis URL for the shared timer state store
    #[arg(long, default_value = "redis://127.0.0.1:6379")]
    redis_url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. SharedStore
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create SharedStore (Redis-backed, shared across server processes)
    let store = match RedisSharedStore::connect(&args.redis_url).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Failed to connect to Redis at '{}': {}", args.redis_url, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Connected to shared store at {}", args.redis_url);

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let control_timer_usecase = Arc::new(ControlTimerUseCase::new(
        store.clone(),
        message_pusher.clone(),
    ));
    let connect_session_usecase = Arc::new(ConnectSessionUseCase::new(message_pusher.clone()));
    let disconnect_session_usecase =
        Arc::new(DisconnectSessionUseCase::new(message_pusher.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        message_pusher.clone(),
        control_timer_usecase,
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(message_pusher.clone()));

    // 4. Create and run the server
    let server = Server::new(
        connect_session_usecase,
        disconnect_session_usecase,
        send_message_usecase,
        get_rooms_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
