//! WebSocket chat room server library.
//!
//! Rooms are broadcast groups over WebSocket; privileged users control a
//! per-room countdown timer whose state lives in a shared external store so
//! that any server process can observe or cancel it.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
