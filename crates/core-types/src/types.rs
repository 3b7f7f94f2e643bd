// In crates/core-types/src/types.rs

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A computed trading recommendation as emitted by the signals server.
///
/// All numeric fields beyond the identity are optional on the wire; the
/// rendering layer decides how absences are displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub action: Action,
    pub entry_price: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub position_percent: Option<Decimal>,
    pub take_profit_price: Option<Decimal>,
    pub stop_loss_price: Option<Decimal>,
    pub confidence: Option<u8>,
    /// Per-strategy vote breakdown, e.g. `{"rsi": "BUY", "macd": "HOLD"}`.
    /// Insertion order of the wire mapping is preserved.
    #[serde(default)]
    pub strategy_votes: IndexMap<String, String>,
}

impl Signal {
    /// The identity of the displayed row this signal maps to. A later signal
    /// with the same key replaces the row in place.
    pub fn key(&self) -> SignalKey {
        SignalKey {
            timestamp: self.timestamp,
            symbol: self.symbol.clone(),
        }
    }
}

/// Row identity: `(timestamp, symbol)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignalKey {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
}

/// The recommended action carried by a signal.
///
/// The wire value is kept verbatim: anything other than the three known
/// labels is preserved as `Other` so the original text can still be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
    Hold,
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
            Action::Other(s) => s,
        }
    }

    /// The styling bucket for this action. Only "BUY" and "SELL" have their
    /// own class; everything else falls into the hold class.
    pub fn class(&self) -> ActionClass {
        match self {
            Action::Buy => ActionClass::Buy,
            Action::Sell => ActionClass::Sell,
            _ => ActionClass::Hold,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        match s {
            "BUY" => Action::Buy,
            "SELL" => Action::Sell,
            "HOLD" => Action::Hold,
            other => Action::Other(other.to_string()),
        }
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Action::from(s.as_str()))
    }
}

/// One of the three mutually exclusive visual classes an action renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionClass {
    Buy,
    Sell,
    Hold,
}

impl ActionClass {
    pub fn label(&self) -> &'static str {
        match self {
            ActionClass::Buy => "buy",
            ActionClass::Sell => "sell",
            ActionClass::Hold => "hold",
        }
    }
}

/// The credential issued by the push platform, mirrored to the server so it
/// can address deliveries at us. Opaque to everything but the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: SubscriptionKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// The body of a push delivery. Every field is optional; unknown fields are
/// carried along so the full payload can be attached to the notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
