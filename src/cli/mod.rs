//! CLI interface for foliowatch
//!
//! Provides subcommands for:
//! - `watch`: Stream live prices for the configured symbols
//! - `portfolio`: Show holdings with live profit/loss
//! - `buy` / `sell`: Submit a trade to the backend
//! - `transactions`: List the account's trade history
//! - `config`: Show the effective configuration

mod portfolio;
mod trade;
mod watch;

pub use portfolio::{PortfolioArgs, TransactionsArgs};
pub use trade::TradeArgs;
pub use watch::WatchArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "foliowatch")]
#[command(about = "Personal stock portfolio tracker with a live Finnhub price feed")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream live prices for the configured symbols
    Watch(WatchArgs),
    /// Show holdings with live profit/loss
    Portfolio(PortfolioArgs),
    /// Buy shares
    Buy(TradeArgs),
    /// Sell shares
    Sell(TradeArgs),
    /// List the account's trade history
    Transactions(TransactionsArgs),
    /// Show the effective configuration
    Config,
}
