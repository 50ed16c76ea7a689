//! Live price feed
//!
//! Loads a snapshot quote per symbol, then keeps prices current from the
//! Finnhub trade stream, reconnecting with bounded backoff when the
//! connection drops.

mod client;
mod snapshot;
mod state;
mod types;

pub use client::{FeedHandle, PriceFeedClient};
pub use snapshot::{load_quotes_once, FinnhubClient, QuoteFetcher, FINNHUB_REST_URL};
pub use state::{ConnectionState, FeedState, PriceState};
pub use types::{Quote, TradeTick};
