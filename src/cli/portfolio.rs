//! Portfolio and transactions command implementations

use crate::config::Config;
use crate::feed::{load_quotes_once, FinnhubClient};
use crate::portfolio::{summarize, PortfolioClient};
use clap::Args;

#[derive(Args, Debug)]
pub struct PortfolioArgs {
    /// Skip live quotes and value positions at cost
    #[arg(long)]
    pub offline: bool,
}

impl PortfolioArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = PortfolioClient::new(&config.backend.base_url);
        let user_id = config.backend.user_id;

        let user = client.get_user(user_id).await?;
        let holdings = client.get_holdings(user_id).await?;

        let feed_state = if self.offline || holdings.is_empty() {
            crate::feed::FeedState::new()
        } else {
            let fetcher =
                FinnhubClient::with_base_url(&config.feed.rest_url, &config.feed.api_key);
            let symbols: Vec<String> = holdings.iter().map(|h| h.stock_id.clone()).collect();
            load_quotes_once(&fetcher, &symbols, config.feed.snapshot_delay_ms).await
        };

        let summary = summarize(&holdings, &feed_state);

        println!("Portfolio for {} <{}>", user.user_name, user.email);
        println!("  Cash balance: {}", user.balance);
        if let Some(investment) = user.investment {
            println!("  Invested: {}", investment);
        }
        if let Some(pnl) = user.profit_loss {
            println!("  Realized P/L: {}", pnl);
        }
        println!();
        println!(
            "{:<8} {:>8} {:>12} {:>12} {:>12} {:>12}",
            "SYMBOL", "QTY", "AVG COST", "LAST", "VALUE", "P/L"
        );

        for position in &summary.positions {
            let last = position
                .last_price
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());
            let pnl = position
                .unrealized_pnl
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());

            println!(
                "{:<8} {:>8} {:>12} {:>12} {:>12} {:>12}",
                position.symbol, position.quantity, position.avg_cost, last,
                position.market_value, pnl
            );
        }

        println!();
        println!(
            "  Total value: {}  (cost {}, unrealized P/L {})",
            summary.total_value, summary.total_cost, summary.unrealized_pnl
        );

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct TransactionsArgs {
    /// Show at most this many rows
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl TransactionsArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = PortfolioClient::new(&config.backend.base_url);
        let transactions = client.get_transactions(config.backend.user_id).await?;

        let shown = match self.limit {
            Some(limit) => &transactions[..limit.min(transactions.len())],
            None => &transactions[..],
        };

        println!(
            "{:<6} {:<8} {:<6} {:>8} {:>12} {:<20}",
            "ID", "SYMBOL", "SIDE", "QTY", "PRICE", "DATE"
        );
        for row in shown {
            let date = row
                .transaction_date
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string());

            println!(
                "{:<6} {:<8} {:<6} {:>8} {:>12} {:<20}",
                row.transaction_id,
                row.stock_id,
                row.transaction_type.to_string(),
                row.transaction_quantity,
                row.transaction_per_stock,
                date
            );
        }

        Ok(())
    }
}
