//! REST client for the portfolio backend
//!
//! Straight-line CRUD over the backend's user, holdings, trade, and
//! transaction endpoints.

use super::types::{DataEnvelope, Holding, TradeOrder, TradeReceipt, Transaction, User};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Configuration for the portfolio client
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    /// Base URL for the backend
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client for the portfolio CRUD backend
pub struct PortfolioClient {
    config: PortfolioConfig,
    client: Client,
}

impl PortfolioClient {
    /// Create a client for the given backend base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(PortfolioConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    /// Create a client with custom configuration
    pub fn with_config(config: PortfolioConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Fetch the account summary for one user
    pub async fn get_user(&self, user_id: u64) -> anyhow::Result<User> {
        let url = format!("{}/users/{}", self.config.base_url, user_id);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("User lookup failed: {} - {}", status, body);
        }

        let envelope: DataEnvelope<User> = response.json().await?;
        Ok(envelope.data)
    }

    /// Fetch the user's stock holdings.
    ///
    /// The backend answers 404 for a user with no holdings; that is a
    /// normal empty portfolio here, not an error.
    pub async fn get_holdings(&self, user_id: u64) -> anyhow::Result<Vec<Holding>> {
        let url = format!("{}/users/{}/stocks", self.config.base_url, user_id);

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Holdings lookup failed: {} - {}", status, body);
        }

        let envelope: DataEnvelope<Vec<Holding>> = response.json().await?;
        tracing::debug!(
            user_id,
            count = envelope.count.unwrap_or(envelope.data.len() as u64),
            "Fetched holdings"
        );
        Ok(envelope.data)
    }

    /// Submit a buy order
    pub async fn buy(&self, order: &TradeOrder) -> anyhow::Result<TradeReceipt> {
        self.submit_trade("buy", order).await
    }

    /// Submit a sell order
    pub async fn sell(&self, order: &TradeOrder) -> anyhow::Result<TradeReceipt> {
        self.submit_trade("sell", order).await
    }

    async fn submit_trade(&self, action: &str, order: &TradeOrder) -> anyhow::Result<TradeReceipt> {
        let url = format!("{}/stocks/{}", self.config.base_url, action);

        tracing::info!(
            action = %action,
            symbol = %order.symbol,
            quantity = order.quantity,
            price = %order.price,
            "Submitting trade"
        );

        let response = self.client.post(&url).json(order).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Trade rejected: {} - {}", status, body);
        }

        Ok(response.json().await?)
    }

    /// Fetch the user's transaction history, newest first
    pub async fn get_transactions(&self, user_id: u64) -> anyhow::Result<Vec<Transaction>> {
        let url = format!("{}/stocks/transactions/{}", self.config.base_url, user_id);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Transactions lookup failed: {} - {}", status, body);
        }

        let envelope: DataEnvelope<Vec<Transaction>> = response.json().await?;
        Ok(envelope.data)
    }
}
