//! Buy/sell command implementation

use crate::config::Config;
use crate::feed::{FinnhubClient, QuoteFetcher};
use crate::portfolio::{PortfolioClient, TradeOrder, TradeSide};
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct TradeArgs {
    /// Ticker symbol to trade
    #[arg(short, long)]
    pub symbol: String,

    /// Number of shares
    #[arg(short, long)]
    pub quantity: i64,

    /// Price per share; defaults to the live quote
    #[arg(short, long)]
    pub price: Option<Decimal>,
}

impl TradeArgs {
    pub async fn execute(&self, side: TradeSide, config: &Config) -> anyhow::Result<()> {
        if self.quantity <= 0 {
            anyhow::bail!("Quantity must be positive");
        }

        let symbol = self.symbol.to_uppercase();

        let price = match self.price {
            Some(price) => price,
            None => {
                let fetcher =
                    FinnhubClient::with_base_url(&config.feed.rest_url, &config.feed.api_key);
                let quote = fetcher.fetch_quote(&symbol).await?;
                quote
                    .current
                    .filter(|p| *p > Decimal::ZERO)
                    .ok_or_else(|| anyhow::anyhow!("No live quote for {symbol}; pass --price"))?
            }
        };

        let order = TradeOrder {
            stock_id: None,
            symbol,
            quantity: self.quantity,
            price,
            user_id: config.backend.user_id,
        };

        let client = PortfolioClient::new(&config.backend.base_url);
        let receipt = match side {
            TradeSide::Buy => client.buy(&order).await?,
            TradeSide::Sell => client.sell(&order).await?,
        };

        let executed = &receipt.transaction;
        let total = executed
            .total_cost
            .or(executed.total_value)
            .unwrap_or_else(|| executed.price * Decimal::from(executed.quantity));

        println!("{}", receipt.message);
        println!(
            "  {} {} {} @ {} (total {}, balance {})",
            executed.side, executed.quantity, executed.symbol, executed.price, total,
            executed.new_balance
        );

        Ok(())
    }
}
