//! WebSocket client library
//!
//! Provides a reusable WebSocket client with automatic reconnection,
//! ping/pong handling, and configurable backoff. A normal server close is
//! terminal; abnormal closes and transport errors reconnect with bounded
//! exponential delays.

mod client;
mod types;

pub use client::WsClient;
pub use types::{WsConfig, WsError, WsMessage};
