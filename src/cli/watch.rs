//! Watch command implementation

use crate::config::Config;
use crate::feed::PriceFeedClient;
use crate::portfolio::movers;
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Symbols to watch (comma-separated); defaults to the configured set
    #[arg(short, long, value_delimiter = ',')]
    pub symbols: Option<Vec<String>>,

    /// Seconds between screen refreshes
    #[arg(short, long, default_value_t = 2)]
    pub interval: u64,
}

impl WatchArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut feed_config = config.feed.clone();
        if let Some(symbols) = &self.symbols {
            feed_config.symbols = symbols.clone();
        }

        let client = PriceFeedClient::new(feed_config);
        let handle = client.subscribe()?;

        tracing::info!("Watching live prices; press ctrl-c to stop");

        let mut refresh = tokio::time::interval(Duration::from_secs(self.interval.max(1)));
        loop {
            tokio::select! {
                _ = refresh.tick() => {
                    render(&handle.state().await);
                }
                _ = tokio::signal::ctrl_c() => {
                    break;
                }
            }
        }

        handle.shutdown().await;
        Ok(())
    }
}

fn render(state: &crate::feed::FeedState) {
    let status = if state.is_connected() {
        "live".to_string()
    } else if state.is_reconnecting() {
        "reconnecting".to_string()
    } else {
        match state.connection_error() {
            Some(err) => format!("down: {err}"),
            None => "connecting".to_string(),
        }
    };

    println!();
    println!("── prices [{status}] ──");
    println!("{:<8} {:>12} {:>10} {:>8}", "SYMBOL", "PRICE", "CHANGE", "PCT");

    let ranked = movers(state);
    if ranked.is_empty() {
        // Nothing rankable yet; show whatever raw prices exist
        for (symbol, quote) in state.quotes() {
            if let Some(price) = quote.current_price {
                println!("{:<8} {:>12} {:>10} {:>8}", symbol, price, quote.change, "-");
            }
        }
        return;
    }

    for mover in ranked {
        println!(
            "{:<8} {:>12} {:>10} {:>7.2}%",
            mover.symbol,
            mover.price,
            mover.change,
            mover.percent_change
        );
    }
}
