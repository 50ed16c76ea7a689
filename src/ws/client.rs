//! WebSocket client with automatic reconnection

use super::types::{WsConfig, WsError, WsMessage};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Reusable WebSocket client with automatic reconnection and ping/pong
/// handling.
///
/// A close with a normal status code ends the connection for good; any
/// transport error or abnormal close schedules a bounded, exponentially
/// backed-off reconnect. The attempt counter resets to zero every time a
/// connection is successfully established.
pub struct WsClient {
    config: WsConfig,
}

impl WsClient {
    /// Create a new WebSocket client with the given configuration
    pub fn new(config: WsConfig) -> Self {
        Self { config }
    }

    /// Get the configured URL
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Connect and return a receiver for messages plus a sender for
    /// outbound text frames.
    ///
    /// This spawns a background task that handles connection management,
    /// automatic reconnection with exponential backoff, and keepalive.
    /// The receiver carries inbound text plus connection status events
    /// (Connected, Reconnecting, Disconnected, Failed). Dropping both ends
    /// tears the connection down; a pending reconnect sleep is abandoned as
    /// soon as the receiver is gone.
    pub fn connect(&self) -> (mpsc::Receiver<WsMessage>, mpsc::Sender<String>) {
        let (msg_tx, msg_rx) = mpsc::channel(1024);
        let (send_tx, send_rx) = mpsc::channel(256);
        let config = self.config.clone();

        tokio::spawn(async move {
            if let Err(e) = Self::run_connection_loop(config, msg_tx, send_rx).await {
                tracing::error!(error = %e, "WebSocket connection loop failed");
            }
        });

        (msg_rx, send_tx)
    }

    /// Run the connection loop with automatic reconnection
    async fn run_connection_loop(
        config: WsConfig,
        tx: mpsc::Sender<WsMessage>,
        mut send_rx: mpsc::Receiver<String>,
    ) -> Result<(), WsError> {
        let mut attempts: u32 = 0;

        loop {
            match Self::connect_and_stream(&config, &tx, &mut send_rx, &mut attempts).await {
                Ok(()) => {
                    tracing::info!("WebSocket connection closed cleanly");
                    let _ = tx.send(WsMessage::Disconnected).await;
                    break;
                }
                Err(e) => {
                    attempts += 1;
                    tracing::warn!(
                        error = %e,
                        attempt = attempts,
                        "WebSocket connection error"
                    );

                    if attempts >= config.max_reconnect_attempts {
                        tracing::error!(attempts, "Max reconnection attempts reached");
                        let _ = tx.send(WsMessage::Failed { attempts }).await;
                        return Err(WsError::MaxReconnectsExceeded);
                    }

                    if tx.is_closed() {
                        tracing::debug!("Receiver dropped, stopping reconnection");
                        break;
                    }

                    let delay = config.reconnect_delay(attempts);
                    let _ = tx
                        .send(WsMessage::Reconnecting {
                            attempt: attempts,
                            delay,
                        })
                        .await;

                    tokio::select! {
                        _ = sleep(delay) => {}
                        _ = tx.closed() => {
                            tracing::debug!("Receiver dropped during backoff, cancelling reconnect");
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Connect to the WebSocket and stream messages until the connection
    /// ends.
    ///
    /// Returns `Ok(())` only for terminal endings (normal close from the
    /// server, or the consumer hanging up); any other ending is an error
    /// the caller may reconnect from. `attempts` is zeroed once the
    /// handshake succeeds, so backoff always measures consecutive failures
    /// since the last live connection.
    async fn connect_and_stream(
        config: &WsConfig,
        tx: &mpsc::Sender<WsMessage>,
        send_rx: &mut mpsc::Receiver<String>,
        attempts: &mut u32,
    ) -> Result<(), WsError> {
        tracing::info!(url = %config.url, "Connecting to WebSocket");

        let (ws_stream, _response) = connect_async(&config.url)
            .await
            .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;

        let (mut write, mut read) = ws_stream.split();

        *attempts = 0;
        tracing::info!("WebSocket connected");

        if tx.send(WsMessage::Connected).await.is_err() {
            let _ = write.send(Message::Close(None)).await;
            return Ok(());
        }

        let mut ping_interval = tokio::time::interval(config.ping_interval);
        ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick of a fresh interval is immediate; push it out one
        // full period so we do not ping during the handshake.
        ping_interval.reset();

        let mut waiting_for_pong = false;

        loop {
            tokio::select! {
                // Inbound frames
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if tx.send(WsMessage::Text(text)).await.is_err() {
                                tracing::debug!("Receiver dropped, closing connection");
                                let _ = write.send(Message::Close(None)).await;
                                return Ok(());
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            write.send(Message::Pong(data)).await
                                .map_err(|e| WsError::SendFailed(e.to_string()))?;
                        }
                        Some(Ok(Message::Pong(_))) => {
                            waiting_for_pong = false;
                        }
                        Some(Ok(Message::Close(frame))) => {
                            return match frame {
                                Some(f) if f.code != CloseCode::Normal => {
                                    Err(WsError::ConnectionFailed(format!(
                                        "abnormal close: code {}",
                                        u16::from(f.code)
                                    )))
                                }
                                _ => {
                                    tracing::info!("Received normal close frame");
                                    Ok(())
                                }
                            };
                        }
                        Some(Err(e)) => {
                            return Err(WsError::ConnectionFailed(e.to_string()));
                        }
                        None => {
                            return Err(WsError::ConnectionFailed("Stream ended unexpectedly".into()));
                        }
                        _ => {}
                    }
                }

                // Outbound application messages
                msg = send_rx.recv() => {
                    match msg {
                        Some(text) => {
                            write.send(Message::Text(text)).await
                                .map_err(|e| WsError::SendFailed(e.to_string()))?;
                        }
                        None => {
                            // Sender dropped: the consumer is done with us
                            tracing::debug!("Sender dropped, closing connection");
                            let _ = write.send(Message::Close(None)).await;
                            return Ok(());
                        }
                    }
                }

                // Keepalive
                _ = ping_interval.tick() => {
                    if waiting_for_pong {
                        return Err(WsError::ConnectionFailed("Pong timeout".into()));
                    }
                    write.send(Message::Ping(vec![])).await
                        .map_err(|e| WsError::SendFailed(e.to_string()))?;
                    waiting_for_pong = true;
                }
            }
        }
    }
}
