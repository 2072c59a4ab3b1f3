//! WebSocket feed client
//!
//! Connects lazily, reads text frames and turns each into an `OrderBook`.
//! A close frame or a transport error drops the connection; the following
//! call reconnects after `reconnect_interval`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use costsim_core::OrderBook;
use costsim_ports::{FeedError, FeedResult, MarketDataSource, Telemetry};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};

use crate::error::GatewayError;
use crate::processor::OrderBookProcessor;

const COMPONENT: &str = "feed.websocket";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, PartialEq)]
pub struct WsFeedConfig {
    pub url: String,
    /// Wait before reconnecting after a drop or a failed connect
    pub reconnect_interval: Duration,
    /// Sent as a text frame after every connect
    pub subscribe_message: Option<String>,
}

impl WsFeedConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect_interval: Duration::from_secs(5),
            subscribe_message: None,
        }
    }
}

struct FeedState {
    stream: Option<WsStream>,
    processor: OrderBookProcessor,
    /// Set after a drop so the next connect waits first
    backoff: bool,
    connects: u64,
}

/// Live order-book feed over WebSocket
pub struct WsFeedClient {
    config: WsFeedConfig,
    telemetry: Arc<dyn Telemetry>,
    state: Mutex<FeedState>,
}

impl WsFeedClient {
    pub fn new(config: WsFeedConfig, telemetry: Arc<dyn Telemetry>) -> Self {
        Self {
            config,
            telemetry,
            state: Mutex::new(FeedState {
                stream: None,
                processor: OrderBookProcessor::new(),
                backoff: false,
                connects: 0,
            }),
        }
    }

    pub fn config(&self) -> &WsFeedConfig {
        &self.config
    }

    /// Number of successful connects so far
    pub async fn connects(&self) -> u64 {
        self.state.lock().await.connects
    }

    /// Drop the current connection, if any
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if let Some(mut stream) = state.stream.take() {
            if let Err(e) = stream.close(None).await {
                log::debug!("close handshake failed: {e}");
            }
            self.telemetry.info(COMPONENT, "connection closed");
        }
    }

    async fn connect(&self) -> Result<WsStream, GatewayError> {
        let (mut stream, _) = connect_async(self.config.url.as_str()).await?;
        if let Some(payload) = &self.config.subscribe_message {
            stream.send(Message::Text(payload.clone().into())).await?;
        }
        Ok(stream)
    }
}

#[async_trait]
impl MarketDataSource for WsFeedClient {
    async fn next_book(&self) -> FeedResult<OrderBook> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if state.stream.is_none() {
            if state.backoff {
                tokio::time::sleep(self.config.reconnect_interval).await;
            }
            match self.connect().await {
                Ok(stream) => {
                    state.stream = Some(stream);
                    state.backoff = false;
                    state.connects += 1;
                    self.telemetry
                        .info(COMPONENT, &format!("connected to {}", self.config.url));
                }
                Err(e) => {
                    state.backoff = true;
                    self.telemetry
                        .error(COMPONENT, &format!("failed to connect: {e}"));
                    return Err(e.into());
                }
            }
        }

        let FeedState {
            stream: slot,
            processor,
            backoff,
            ..
        } = state;

        loop {
            let Some(stream) = slot.as_mut() else {
                return Err(FeedError::Closed);
            };
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return match processor.process_message(text.as_str()) {
                        Ok(book) => Ok(book.clone()),
                        Err(e) => {
                            self.telemetry
                                .warn(COMPONENT, &format!("dropping frame: {e}"));
                            Err(e.into())
                        }
                    };
                }
                Some(Ok(Message::Close(_))) | None => {
                    *slot = None;
                    *backoff = true;
                    self.telemetry.warn(COMPONENT, "connection closed by peer");
                    return Err(FeedError::Closed);
                }
                // Ping, pong, binary and raw frames carry no book
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    *slot = None;
                    *backoff = true;
                    self.telemetry
                        .error(COMPONENT, &format!("connection error: {e}"));
                    return Err(FeedError::Connection(e.to_string()));
                }
            }
        }
    }

    fn name(&self) -> &str {
        "WsFeedClient"
    }
}
