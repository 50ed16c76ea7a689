//! Live price state shared between the feed tasks and consumers

use super::types::Quote;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Connection lifecycle as observed by consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No transport; terminal after a normal close
    #[default]
    Disconnected,
    /// Transport handshake in progress
    Connecting,
    /// Transport open
    Connected,
    /// Waiting out a backoff delay before the next attempt
    Reconnecting,
    /// Reconnection attempts exhausted; terminal
    Failed,
}

/// Live quote data for one symbol.
///
/// Mutated only by the feed client; consumers see cloned snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceState {
    /// Latest known price (snapshot or trade)
    pub current_price: Option<Decimal>,
    /// Previous session's closing price, baseline for `change`
    pub previous_close: Option<Decimal>,
    /// Absolute change vs previous close; zero until derivable
    pub change: Decimal,
    /// When this symbol last received data
    pub last_update: Option<DateTime<Utc>>,
}

/// Aggregate feed view: per-symbol quotes plus connection health
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    quotes: HashMap<String, PriceState>,
    connection: ConnectionState,
    connection_error: Option<String>,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quote state for one symbol, if any data has arrived for it
    pub fn quote(&self, symbol: &str) -> Option<&PriceState> {
        self.quotes.get(symbol)
    }

    /// All per-symbol quote states
    pub fn quotes(&self) -> &HashMap<String, PriceState> {
        &self.quotes
    }

    /// Latest price for one symbol
    pub fn price(&self, symbol: &str) -> Option<Decimal> {
        self.quotes.get(symbol).and_then(|q| q.current_price)
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    pub fn is_reconnecting(&self) -> bool {
        self.connection == ConnectionState::Reconnecting
    }

    /// Human-readable description of the last connection problem
    pub fn connection_error(&self) -> Option<&str> {
        self.connection_error.as_deref()
    }

    /// Commit a snapshot quote for `symbol`.
    ///
    /// Rejects payloads without a usable current price (missing or
    /// negative); the entry is left untouched in that case. With a valid
    /// previous close the change is derived from it, otherwise it resets
    /// to zero. Returns whether the quote was committed.
    pub fn apply_snapshot(&mut self, symbol: &str, quote: &Quote, now: DateTime<Utc>) -> bool {
        let Some(current) = quote.current else {
            tracing::warn!(symbol = %symbol, "Snapshot quote has no current price");
            return false;
        };
        if current < Decimal::ZERO {
            tracing::warn!(symbol = %symbol, price = %current, "Rejecting negative snapshot price");
            return false;
        }

        let entry = self.quotes.entry(symbol.to_string()).or_default();
        entry.current_price = Some(current);
        entry.last_update = Some(now);
        match quote.previous_close {
            Some(pc) => {
                entry.previous_close = Some(pc);
                entry.change = current - pc;
            }
            None => entry.change = Decimal::ZERO,
        }
        true
    }

    /// Commit a trade tick for `symbol`.
    ///
    /// Non-positive prices are dropped. The change is recomputed against
    /// the previous close held at this moment, in the same critical
    /// section that commits the price. Returns whether the tick was
    /// committed.
    pub fn apply_trade(&mut self, symbol: &str, price: Decimal, now: DateTime<Utc>) -> bool {
        if price <= Decimal::ZERO {
            tracing::warn!(symbol = %symbol, price = %price, "Dropping trade with non-positive price");
            return false;
        }

        let entry = self.quotes.entry(symbol.to_string()).or_default();
        entry.current_price = Some(price);
        if let Some(pc) = entry.previous_close {
            entry.change = price - pc;
        }
        entry.last_update = Some(now);
        true
    }

    pub fn mark_connecting(&mut self) {
        self.connection = ConnectionState::Connecting;
    }

    /// Successful open: also clears any prior connection error
    pub fn mark_connected(&mut self) {
        self.connection = ConnectionState::Connected;
        self.connection_error = None;
    }

    pub fn mark_reconnecting(&mut self, reason: impl Into<String>) {
        self.connection = ConnectionState::Reconnecting;
        self.connection_error = Some(reason.into());
    }

    pub fn mark_disconnected(&mut self) {
        self.connection = ConnectionState::Disconnected;
    }

    /// Terminal: reconnection attempts exhausted
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.connection = ConnectionState::Failed;
        self.connection_error = Some(reason.into());
    }
}
