// In crates/notify/src/desktop.rs

use crate::relay::Notification;
use crate::{Notifier, Result};
use async_trait::async_trait;

/// Displays notifications through the operating system's notification
/// service. Clicking one opens the dashboard root.
pub struct DesktopNotifier {
    dashboard_url: String,
}

impl DesktopNotifier {
    pub fn new(dashboard_url: impl Into<String>) -> Self {
        Self {
            dashboard_url: dashboard_url.into(),
        }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    fn name(&self) -> &'static str {
        "DesktopNotifier"
    }

    async fn display(&self, notification: Notification) -> Result<()> {
        let url = self.dashboard_url.clone();
        // The OS notification API is blocking.
        tokio::task::spawn_blocking(move || show(notification, url)).await?
    }
}

fn show(notification: Notification, dashboard_url: String) -> Result<()> {
    let mut builder = notify_rust::Notification::new();
    builder
        .summary(&notification.title)
        .body(&notification.body)
        .icon(&notification.icon);

    let handle = builder.show()?;

    // Click handling runs on its own thread so the delivery acknowledgment
    // never waits on the user. Activation also dismisses the notification.
    #[cfg(all(unix, not(target_os = "macos")))]
    std::thread::spawn(move || {
        handle.wait_for_action(|action| {
            if action == "default" {
                if let Err(e) = open::that(&dashboard_url) {
                    tracing::warn!(error = %e, "Could not open the dashboard.");
                }
            }
        });
    });
    #[cfg(not(all(unix, not(target_os = "macos"))))]
    {
        let _ = handle;
        let _ = dashboard_url;
    }

    Ok(())
}
