//! Data Transfer Objects (DTOs) for the chat room server.
//!
//! The chat protocol itself is plain text frames, so only the HTTP
//! observation API carries structured DTOs:
//! - `http`: HTTP API response DTOs

pub mod http;
