//! Portfolio backend client and analysis
//!
//! Talks to the CRUD backend for account data, holdings, and buy/sell
//! orders, and derives profit/loss views by joining holdings with live
//! feed prices.

mod analysis;
mod client;
mod types;

pub use analysis::{movers, summarize, Mover, PortfolioSummary, PositionView};
pub use client::{PortfolioClient, PortfolioConfig};
pub use types::{ExecutedTrade, Holding, TradeOrder, TradeReceipt, TradeSide, Transaction, User};
