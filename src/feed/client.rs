//! Live price feed client
//!
//! Owns the streaming subscription for a fixed symbol set: loads snapshot
//! quotes, subscribes for trade events, keeps per-symbol prices current,
//! and rides out connection drops through the ws layer's reconnection.
//! Consumers observe cloned state snapshots through a [`FeedHandle`] and
//! stop the feed with [`FeedHandle::shutdown`].

use super::snapshot::{load_snapshots, FinnhubClient};
use super::state::FeedState;
use super::types::{parse_stream_message, StreamEvent, StreamRequest};
use crate::config::FeedConfig;
use crate::ws::{WsClient, WsConfig, WsMessage};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;

/// Streaming price feed for a fixed set of symbols.
///
/// The symbol set is fixed for the life of a subscription; to track a
/// different set, shut the handle down and subscribe again.
pub struct PriceFeedClient {
    config: FeedConfig,
}

impl PriceFeedClient {
    /// Create a new feed client from configuration
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }

    /// Start the feed: snapshot loading plus the streaming subscription.
    ///
    /// Both run in background tasks; the returned handle observes their
    /// shared state. Refuses an empty symbol set.
    pub fn subscribe(&self) -> anyhow::Result<FeedHandle> {
        if self.config.symbols.is_empty() {
            anyhow::bail!("Cannot subscribe to an empty symbol set");
        }

        let state = Arc::new(RwLock::new(FeedState::new()));
        let active = Arc::new(AtomicBool::new(true));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tracing::info!(
            symbols = self.config.symbols.len(),
            "Starting price feed"
        );

        // Snapshot loader: populates progressively, independent of the stream
        let fetcher = FinnhubClient::with_base_url(&self.config.rest_url, &self.config.api_key);
        let snapshot_state = state.clone();
        let snapshot_active = active.clone();
        let symbols = self.config.symbols.clone();
        let delay = Duration::from_millis(self.config.snapshot_delay_ms);
        tokio::spawn(async move {
            load_snapshots(&fetcher, &symbols, &snapshot_state, &snapshot_active, delay).await;
        });

        // Streaming subscriber
        let ws_config = WsConfig::new(stream_url(&self.config.ws_url, &self.config.api_key))
            .max_reconnects(self.config.max_reconnect_attempts)
            .initial_delay(Duration::from_millis(self.config.initial_reconnect_delay_ms))
            .max_delay(Duration::from_millis(self.config.max_reconnect_delay_ms))
            .ping_interval(Duration::from_secs(self.config.ping_interval_secs));

        let task = tokio::spawn(run_stream_loop(
            ws_config,
            self.config.symbols.clone(),
            state.clone(),
            active.clone(),
            shutdown_rx,
        ));

        Ok(FeedHandle {
            state,
            active,
            shutdown_tx,
            task: Mutex::new(Some(task)),
        })
    }
}

/// Consumer handle onto a running price feed
pub struct FeedHandle {
    state: Arc<RwLock<FeedState>>,
    active: Arc<AtomicBool>,
    shutdown_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl FeedHandle {
    /// Cloned snapshot of the current feed state
    pub async fn state(&self) -> FeedState {
        self.state.read().await.clone()
    }

    /// Whether the feed has not been torn down yet
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Stop the feed.
    ///
    /// Cancels any pending reconnect, best-effort unsubscribes every
    /// symbol if the connection is open, then closes the transport.
    /// Safe to call more than once; later calls do nothing.
    pub async fn shutdown(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            let _ = self.shutdown_tx.send(true);
        }

        let task = self.task.lock().await.take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Feed task ended abnormally");
            }
        }
    }
}

/// Streaming endpoint URL with the credential attached
fn stream_url(ws_url: &str, token: &str) -> String {
    format!("{}?token={}", ws_url, token)
}

/// Drive the stream: subscribe on every (re)connect, apply trade events,
/// mirror connection health into the shared state, and unwind cleanly on
/// shutdown.
async fn run_stream_loop(
    ws_config: WsConfig,
    symbols: Vec<String>,
    state: Arc<RwLock<FeedState>>,
    active: Arc<AtomicBool>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let symbol_set: HashSet<String> = symbols.iter().cloned().collect();

    state.write().await.mark_connecting();

    let client = WsClient::new(ws_config);
    let (mut ws_rx, ws_tx) = client.connect();

    let mut connected = false;

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                if connected {
                    for symbol in &symbols {
                        let request = StreamRequest::unsubscribe(symbol);
                        match serde_json::to_string(&request) {
                            Ok(json) => {
                                if let Err(e) = ws_tx.send(json).await {
                                    tracing::warn!(symbol = %symbol, error = %e, "Unsubscribe send failed");
                                }
                            }
                            Err(e) => {
                                tracing::warn!(symbol = %symbol, error = %e, "Unsubscribe encode failed");
                            }
                        }
                    }
                }
                state.write().await.mark_disconnected();
                tracing::info!("Price feed torn down");
                break;
            }

            msg = ws_rx.recv() => {
                if !active.load(Ordering::SeqCst) {
                    // Teardown has begun; discard whatever was in flight
                    continue;
                }
                match msg {
                    Some(WsMessage::Connected) => {
                        connected = true;
                        state.write().await.mark_connected();

                        for symbol in &symbols {
                            let request = StreamRequest::subscribe(symbol);
                            match serde_json::to_string(&request) {
                                Ok(json) => {
                                    if ws_tx.send(json).await.is_err() {
                                        tracing::error!("Failed to send subscribe message");
                                        break;
                                    }
                                }
                                Err(e) => {
                                    tracing::error!(symbol = %symbol, error = %e, "Subscribe encode failed");
                                }
                            }
                        }
                        tracing::info!(symbols = symbols.len(), "Subscribed to trade events");
                    }
                    Some(WsMessage::Text(text)) => {
                        handle_stream_text(&text, &symbol_set, &state).await;
                    }
                    Some(WsMessage::Reconnecting { attempt, delay }) => {
                        connected = false;
                        tracing::warn!(
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Feed connection lost, reconnect scheduled"
                        );
                        state.write().await.mark_reconnecting(format!(
                            "Connection lost, retrying (attempt {attempt})"
                        ));
                    }
                    Some(WsMessage::Disconnected) => {
                        connected = false;
                        tracing::info!("Feed connection closed");
                        state.write().await.mark_disconnected();
                    }
                    Some(WsMessage::Failed { attempts }) => {
                        connected = false;
                        state.write().await.mark_failed(format!(
                            "Maximum reconnection attempts ({attempts}) reached; recreate the feed to retry"
                        ));
                    }
                    None => {
                        // Transport task is gone; nothing further will arrive
                        break;
                    }
                }
            }
        }
    }
}

/// Apply one inbound text frame to the shared state
async fn handle_stream_text(text: &str, symbols: &HashSet<String>, state: &RwLock<FeedState>) {
    match parse_stream_message(text) {
        Some(StreamEvent::Trades(ticks)) => {
            for tick in ticks {
                if !symbols.contains(&tick.symbol) {
                    tracing::warn!(symbol = %tick.symbol, "Dropping trade for unconfigured symbol");
                    continue;
                }
                let mut state = state.write().await;
                if state.apply_trade(&tick.symbol, tick.price, Utc::now()) {
                    tracing::debug!(symbol = %tick.symbol, price = %tick.price, "Trade update");
                }
            }
        }
        Some(StreamEvent::Ping) => {
            tracing::debug!("Heartbeat received");
        }
        Some(StreamEvent::Other(kind)) => {
            tracing::debug!(kind = %kind, "Ignoring unrecognized message type");
        }
        None => {
            tracing::warn!(
                preview = %text.chars().take(100).collect::<String>(),
                "Unparseable stream message"
            );
        }
    }
}
