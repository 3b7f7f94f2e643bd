// In crates/app-config/src/types.rs

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Where the signals server lives.
    pub server: ServerSettings,
    /// Event-stream reconnect behavior.
    #[serde(default)]
    pub stream: StreamSettings,
    /// The local push receiver's bind address.
    #[serde(default)]
    pub receiver: ReceiverSettings,
    /// Notification display defaults.
    #[serde(default)]
    pub notify: NotifySettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    /// Base URL of the signals server, e.g. "http://127.0.0.1:8000".
    /// `/events`, `/vapid` and `/subscribe` are resolved against it, and `/`
    /// is what a notification click opens.
    pub base_url: String,
}

/// Reconnect policy for the event stream. There is no platform-provided
/// retry here, so backoff is explicit and configurable.
#[derive(Deserialize, Debug, Clone)]
pub struct StreamSettings {
    #[serde(default = "default_backoff_initial_ms")]
    pub backoff_initial_ms: u64,
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ReceiverSettings {
    #[serde(default = "default_receiver_host")]
    pub host: String,
    /// Port 0 asks the OS for an ephemeral port.
    #[serde(default)]
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NotifySettings {
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_badge")]
    pub badge: String,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            backoff_initial_ms: default_backoff_initial_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

impl Default for ReceiverSettings {
    fn default() -> Self {
        Self {
            host: default_receiver_host(),
            port: 0,
        }
    }
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            icon: default_icon(),
            badge: default_badge(),
        }
    }
}

/// Helper functions for serde defaults
fn default_backoff_initial_ms() -> u64 {
    1_000
}
fn default_backoff_max_ms() -> u64 {
    30_000
}
fn default_backoff_factor() -> f64 {
    2.0
}
fn default_receiver_host() -> String {
    "127.0.0.1".to_string()
}
fn default_icon() -> String {
    "assets/icon.png".to_string()
}
fn default_badge() -> String {
    "assets/badge.png".to_string()
}
