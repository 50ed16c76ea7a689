//! Snapshot quote loading
//!
//! One REST call per configured symbol, serialized with a small pause
//! between calls to respect the provider rate limit. A failing symbol is
//! logged and skipped; it never aborts the batch.

use super::state::FeedState;
use super::types::Quote;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Finnhub REST base URL
pub const FINNHUB_REST_URL: &str = "https://finnhub.io/api/v1";

/// Source of snapshot quotes
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    /// Fetch the current quote for one symbol
    async fn fetch_quote(&self, symbol: &str) -> anyhow::Result<Quote>;
}

/// Quote client for the Finnhub REST API
pub struct FinnhubClient {
    base_url: String,
    token: String,
    client: Client,
}

impl FinnhubClient {
    /// Create a client against the public Finnhub endpoint
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(FINNHUB_REST_URL, token)
    }

    /// Create a client against a custom endpoint
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            token: token.into(),
            client,
        }
    }
}

#[async_trait]
impl QuoteFetcher for FinnhubClient {
    async fn fetch_quote(&self, symbol: &str) -> anyhow::Result<Quote> {
        let url = format!("{}/quote", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("token", self.token.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Quote endpoint error: {} - {}", status, body);
        }

        Ok(response.json().await?)
    }
}

/// Load snapshot quotes for every symbol, one request at a time.
///
/// State populates progressively as each symbol resolves, so consumers
/// see partial data while later symbols are still loading. Once `active`
/// goes false the remaining work is abandoned and any in-flight result is
/// discarded without touching state.
pub async fn load_snapshots<F: QuoteFetcher + ?Sized>(
    fetcher: &F,
    symbols: &[String],
    state: &RwLock<FeedState>,
    active: &AtomicBool,
    delay: Duration,
) {
    for (i, symbol) in symbols.iter().enumerate() {
        if !active.load(Ordering::SeqCst) {
            tracing::debug!("Feed torn down, abandoning snapshot load");
            return;
        }

        match fetcher.fetch_quote(symbol).await {
            Ok(quote) => {
                if !active.load(Ordering::SeqCst) {
                    return;
                }
                let mut state = state.write().await;
                if state.apply_snapshot(symbol, &quote, Utc::now()) {
                    tracing::info!(symbol = %symbol, price = ?quote.current, "Snapshot quote loaded");
                }
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Snapshot fetch failed, skipping symbol");
            }
        }

        if i + 1 < symbols.len() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// One-shot convenience: load snapshots for `symbols` into a fresh state
/// and hand it back. Used where a live stream is not wanted, such as a
/// single portfolio valuation.
pub async fn load_quotes_once<F: QuoteFetcher + ?Sized>(
    fetcher: &F,
    symbols: &[String],
    delay_ms: u64,
) -> FeedState {
    let state = RwLock::new(FeedState::new());
    let active = AtomicBool::new(true);
    load_snapshots(
        fetcher,
        symbols,
        &state,
        &active,
        Duration::from_millis(delay_ms),
    )
    .await;
    state.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::AtomicUsize;

    struct FakeFetcher {
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl QuoteFetcher for FakeFetcher {
        async fn fetch_quote(&self, symbol: &str) -> anyhow::Result<Quote> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match symbol {
                "AAPL" => Ok(Quote {
                    current: Some(dec!(150)),
                    previous_close: Some(dec!(145)),
                    change: None,
                }),
                "DOWN" => anyhow::bail!("HTTP 502"),
                "BAD" => Ok(Quote {
                    current: Some(dec!(-3)),
                    previous_close: None,
                    change: None,
                }),
                _ => Ok(Quote {
                    current: Some(dec!(10)),
                    previous_close: None,
                    change: None,
                }),
            }
        }
    }

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_load_snapshots_commits_valid_quotes() {
        let fetcher = FakeFetcher::new();
        let state = RwLock::new(FeedState::new());
        let active = AtomicBool::new(true);

        load_snapshots(
            &fetcher,
            &symbols(&["AAPL"]),
            &state,
            &active,
            Duration::from_millis(1),
        )
        .await;

        let state = state.read().await;
        let q = state.quote("AAPL").unwrap();
        assert_eq!(q.current_price, Some(dec!(150)));
        assert_eq!(q.previous_close, Some(dec!(145)));
        assert_eq!(q.change, dec!(5));
    }

    #[tokio::test]
    async fn test_one_failure_never_blocks_other_symbols() {
        let fetcher = FakeFetcher::new();
        let state = RwLock::new(FeedState::new());
        let active = AtomicBool::new(true);

        load_snapshots(
            &fetcher,
            &symbols(&["DOWN", "AAPL", "BAD", "NVDA"]),
            &state,
            &active,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 4);

        let state = state.read().await;
        assert!(state.quote("DOWN").is_none());
        assert!(state.quote("BAD").is_none());
        assert_eq!(state.price("AAPL"), Some(dec!(150)));
        assert_eq!(state.price("NVDA"), Some(dec!(10)));
    }

    #[tokio::test]
    async fn test_loaded_prices_are_non_negative() {
        let fetcher = FakeFetcher::new();
        let state = RwLock::new(FeedState::new());
        let active = AtomicBool::new(true);

        load_snapshots(
            &fetcher,
            &symbols(&["AAPL", "BAD", "NVDA"]),
            &state,
            &active,
            Duration::from_millis(1),
        )
        .await;

        let state = state.read().await;
        for (_, q) in state.quotes() {
            assert!(q.current_price.unwrap() >= Decimal::ZERO);
        }
    }

    #[tokio::test]
    async fn test_teardown_abandons_remaining_symbols() {
        let fetcher = FakeFetcher::new();
        let state = RwLock::new(FeedState::new());
        let active = AtomicBool::new(false);

        load_snapshots(
            &fetcher,
            &symbols(&["AAPL", "NVDA"]),
            &state,
            &active,
            Duration::from_millis(1),
        )
        .await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert!(state.read().await.quote("AAPL").is_none());
    }
}
