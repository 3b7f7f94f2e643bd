// In crates/push/src/platform.rs

use crate::error::Result;
use async_trait::async_trait;
use core_types::PushSubscription;

/// The seam between the enrollment flow and whatever issues push
/// credentials. The local [`crate::PushReceiver`] is the production
/// implementation; tests substitute their own.
#[async_trait]
pub trait PushPlatform: Send + Sync {
    /// Whether this platform can register a relay and issue subscriptions
    /// at all. When false, enrollment aborts before doing anything else.
    fn is_supported(&self) -> bool;

    /// Registers the notification relay that future deliveries will invoke.
    /// Must precede [`PushPlatform::subscribe`].
    async fn register_relay(&self) -> Result<()>;

    /// Issues a user-visible-only subscription bound to the given server
    /// identity key.
    async fn subscribe(&self, server_key: &[u8]) -> Result<PushSubscription>;
}
