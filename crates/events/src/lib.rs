// --- Stream message structures for the server's /events channel ---

use core_types::Signal;
use serde::{Deserialize, Serialize};

/// The top-level stream message union.
/// `type` is the serde tag; signal payloads ride under `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamMessage {
    /// Liveness tick. Carries no payload of interest; `ts` is opaque.
    Heartbeat { ts: Option<String> },
    /// A single signal to upsert.
    Signal { data: Signal },
    /// An ordered batch of signals, applied oldest-first. Later entries in
    /// the same batch may overwrite earlier ones sharing a key.
    Signals { data: Vec<Signal> },
    /// A server-side failure note. Logged, never rendered.
    Error { payload: Option<ErrorDetail> },
    /// Any kind this client does not recognize. Ignored for forward
    /// compatibility.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: Option<String>,
}

impl StreamMessage {
    /// Parses one event body off the wire.
    pub fn decode(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
