//! Price feed wire types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Snapshot quote payload from the REST endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    /// Current price
    #[serde(rename = "c")]
    pub current: Option<Decimal>,
    /// Previous session's closing price
    #[serde(rename = "pc")]
    pub previous_close: Option<Decimal>,
    /// Absolute change as reported by the provider; we derive our own
    #[serde(rename = "d", default)]
    pub change: Option<Decimal>,
}

/// Control message sent to the streaming endpoint
#[derive(Debug, Serialize)]
pub struct StreamRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub symbol: &'a str,
}

impl<'a> StreamRequest<'a> {
    /// Subscribe to trade events for one symbol
    pub fn subscribe(symbol: &'a str) -> Self {
        Self {
            kind: "subscribe",
            symbol,
        }
    }

    /// Unsubscribe from trade events for one symbol
    pub fn unsubscribe(symbol: &'a str) -> Self {
        Self {
            kind: "unsubscribe",
            symbol,
        }
    }
}

/// A single trade tick within a trade message
#[derive(Debug, Clone, Deserialize)]
pub struct TradeTick {
    /// Symbol
    #[serde(rename = "s")]
    pub symbol: String,
    /// Trade price
    #[serde(rename = "p")]
    pub price: Decimal,
    /// Trade time (milliseconds)
    #[serde(rename = "t", default)]
    pub trade_time: Option<i64>,
    /// Volume
    #[serde(rename = "v", default)]
    pub volume: Option<Decimal>,
}

/// A parsed message from the streaming endpoint
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// Trade ticks; malformed array elements are already dropped
    Trades(Vec<TradeTick>),
    /// Server heartbeat
    Ping,
    /// Any other message type; tolerated and ignored
    Other(String),
}

/// Parse one text frame from the stream.
///
/// Trade payloads are parsed element by element so one malformed entry
/// never drops its siblings. Returns `None` for frames that are not JSON
/// objects with a `type` field.
pub fn parse_stream_message(text: &str) -> Option<StreamEvent> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;

    match value.get("type").and_then(|t| t.as_str()) {
        Some("trade") => {
            let mut ticks = Vec::new();
            if let Some(items) = value.get("data").and_then(|d| d.as_array()) {
                for item in items {
                    match serde_json::from_value::<TradeTick>(item.clone()) {
                        Ok(tick) => ticks.push(tick),
                        Err(e) => {
                            tracing::warn!(error = %e, "Dropping malformed trade item");
                        }
                    }
                }
            }
            Some(StreamEvent::Trades(ticks))
        }
        Some("ping") => Some(StreamEvent::Ping),
        Some(other) => Some(StreamEvent::Other(other.to_string())),
        None => None,
    }
}
