//! UseCase layer for the chat room server.
//!
//! Each usecase depends only on the domain traits (`SharedStore`,
//! `MessagePusher`); concrete implementations are injected by the binary.

mod connect_session;
mod disconnect_session;
mod error;
mod get_rooms;
mod send_message;
mod timer;

pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::TimerError;
pub use get_rooms::{GetRoomsUseCase, RoomSummary};
pub use send_message::SendMessageUseCase;
pub use timer::{ControlTimerUseCase, START_TIMER_SECONDS};
