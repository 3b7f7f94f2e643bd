// In crates/stream-client/src/connector.rs

use crate::backoff::{Backoff, BackoffPolicy};
use crate::sse::SseParser;
use async_stream::stream;
use events::StreamMessage;
use futures::Stream;
use futures_util::StreamExt;
use std::fmt;
use tokio::sync::watch;

/// Where the client currently stands with the event stream. Fed to the
/// dashboard's status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Retrying,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Retrying => "disconnected (retrying)",
        };
        f.write_str(text)
    }
}

/// A connector for receiving the live signal stream from the server.
#[derive(Clone)]
pub struct StreamConnector {
    http: reqwest::Client,
    events_url: String,
    policy: BackoffPolicy,
}

impl StreamConnector {
    pub fn new(base_url: &str, policy: BackoffPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            events_url: format!("{}/events", base_url.trim_end_matches('/')),
            policy,
        }
    }

    /// Opens the one live event connection and returns the decoded message
    /// stream.
    ///
    /// The connection is held for the life of the returned stream; there is
    /// no explicit close. Transport failures and server-side closes
    /// reconnect under the configured backoff policy and are surfaced on
    /// `status`. Malformed event bodies are logged and dropped without
    /// touching the connection.
    pub fn subscribe(
        &self,
        status: watch::Sender<ConnectionStatus>,
    ) -> impl Stream<Item = StreamMessage> + use<> {
        let http = self.http.clone();
        let url = self.events_url.clone();
        let mut backoff = Backoff::new(self.policy.clone());

        stream! {
            loop {
                let _ = status.send(ConnectionStatus::Connecting);
                tracing::info!(url = %url, "Connecting to event stream...");

                let response = match http
                    .get(&url)
                    .header(reqwest::header::ACCEPT, "text/event-stream")
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                {
                    Ok(r) => r,
                    Err(e) => {
                        let delay = backoff.next_delay();
                        tracing::error!(error = %e, ?delay, "Event stream connection failed. Retrying...");
                        let _ = status.send(ConnectionStatus::Retrying);
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                };

                tracing::info!("Event stream connected.");
                let _ = status.send(ConnectionStatus::Connected);
                backoff.reset();

                let mut body = response.bytes_stream();
                let mut parser = SseParser::new();

                while let Some(chunk) = body.next().await {
                    match chunk {
                        Ok(bytes) => {
                            for data in parser.feed(&bytes) {
                                match StreamMessage::decode(&data) {
                                    Ok(message) => yield message,
                                    Err(e) => {
                                        // Malformed payloads are dropped; the connection stays up.
                                        tracing::warn!(error = %e, raw = %data, "Dropping malformed stream message");
                                    }
                                }
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Error reading from event stream. Reconnecting...");
                            break;
                        }
                    }
                }

                // The server closed the stream or the transport failed mid-read.
                let delay = backoff.next_delay();
                let _ = status.send(ConnectionStatus::Retrying);
                tokio::time::sleep(delay).await;
            }
        }
    }
}
