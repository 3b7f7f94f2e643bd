// In crates/notify/src/relay.rs

use crate::{Notifier, Result};
use core_types::NotificationPayload;
use serde_json::Value;

/// Title used when the payload does not carry one.
pub const DEFAULT_TITLE: &str = "Trading Signal";
/// Body used when the payload carries neither a body nor an action/symbol pair.
pub const DEFAULT_BODY: &str = "New signal";

/// A fully derived notification, ready for display. `data` carries the
/// complete payload for whatever later handles interaction with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub data: Value,
}

/// The notification relay: a stateless per-delivery handler.
///
/// It keeps no memory between deliveries; everything a delivery needs
/// arrives with its payload or was fixed at construction. That matches a
/// platform that activates the handler on demand and suspends it after.
pub struct Relay {
    notifier: Box<dyn Notifier>,
    icon: String,
    badge: String,
}

impl Relay {
    pub fn new(notifier: Box<dyn Notifier>, icon: impl Into<String>, badge: impl Into<String>) -> Self {
        Self {
            notifier,
            icon: icon.into(),
            badge: badge.into(),
        }
    }

    /// Handles one push delivery end to end. The display is awaited to
    /// completion before the delivery counts as handled.
    pub async fn handle_delivery(&self, raw: &[u8]) -> Result<()> {
        let notification = self.build(raw);
        tracing::info!(title = %notification.title, body = %notification.body, "Displaying notification.");
        self.notifier.display(notification).await
    }

    /// Derives the notification for one delivery body.
    pub fn build(&self, raw: &[u8]) -> Notification {
        let payload = parse_payload(raw);

        let title = payload
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let body = match (&payload.body, &payload.action, &payload.symbol) {
            (Some(body), _, _) => body.clone(),
            (None, Some(action), Some(symbol)) => format!("{action} {symbol}"),
            _ => DEFAULT_BODY.to_string(),
        };
        let icon = payload.icon.clone().unwrap_or_else(|| self.icon.clone());
        let badge = payload.badge.clone().unwrap_or_else(|| self.badge.clone());
        let data = serde_json::to_value(&payload).unwrap_or_default();

        Notification {
            title,
            body,
            icon,
            badge,
            data,
        }
    }
}

/// Malformed bodies degrade to an empty payload so the delivery still
/// produces a notification instead of failing the event.
fn parse_payload(raw: &[u8]) -> NotificationPayload {
    match serde_json::from_slice(raw) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed push payload; falling back to defaults.");
            NotificationPayload::default()
        }
    }
}
