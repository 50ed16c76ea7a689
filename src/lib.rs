//! foliowatch: personal stock portfolio tracker with live prices
//!
//! This library provides the core components for:
//! - Real-time price feed from the Finnhub streaming API, with snapshot
//!   quote loading and automatic reconnection
//! - Portfolio backend client (holdings, buy/sell, transactions)
//! - Profit/loss and movers analysis over live prices
//! - CLI frontend and structured logging

pub mod cli;
pub mod config;
pub mod feed;
pub mod portfolio;
pub mod telemetry;
pub mod ws;
