// In crates/notify/src/lib.rs

use async_trait::async_trait;

pub mod desktop;
pub mod error;
pub mod relay;

// Re-export public types
pub use desktop::DesktopNotifier;
pub use error::{Error, Result};
pub use relay::{DEFAULT_BODY, DEFAULT_TITLE, Notification, Relay};

/// The universal interface for putting a notification in front of the user.
///
/// `display` must resolve only once the notification is actually visible:
/// the push receiver acknowledges a delivery only after it returns.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// The name of the notifier (e.g., "DesktopNotifier").
    fn name(&self) -> &'static str;

    async fn display(&self, notification: Notification) -> Result<()>;
}
