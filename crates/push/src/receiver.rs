// In crates/push/src/receiver.rs

use crate::error::{Error, Result};
use crate::platform::PushPlatform;
use crate::urlsafe;
use app_config::types::ReceiverSettings;
use async_trait::async_trait;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use core_types::{PushSubscription, SubscriptionKeys};
use notify::Relay;
use rand::RngCore;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// The shared state available to the receiver's route handlers.
#[derive(Clone)]
struct ReceiverState {
    relay: Arc<Relay>,
    tokens: Arc<Mutex<HashSet<String>>>,
}

/// The native push platform: a local HTTP listener standing in for a push
/// service plus the dormant context it wakes.
///
/// Subscriptions issued here point at `/push/{token}` on this listener.
/// Each delivery POSTed to such an endpoint invokes the relay and is
/// acknowledged only once the notification is displayed. The relay itself
/// holds no state between deliveries; this type only tracks which tokens
/// are live.
pub struct PushReceiver {
    addr: SocketAddr,
    state: ReceiverState,
    relay_registered: AtomicBool,
    listener: Mutex<Option<TcpListener>>,
}

impl PushReceiver {
    /// Binds the receiver's listener. Port 0 selects an ephemeral port.
    pub async fn bind(settings: &ReceiverSettings, relay: Arc<Relay>) -> Result<Self> {
        let listener = TcpListener::bind((settings.host.as_str(), settings.port)).await?;
        let addr = listener.local_addr()?;

        Ok(Self {
            addr,
            state: ReceiverState {
                relay,
                tokens: Arc::new(Mutex::new(HashSet::new())),
            },
            relay_registered: AtomicBool::new(false),
            listener: Mutex::new(Some(listener)),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serves deliveries until the process is terminated.
    pub async fn serve(&self) -> Result<()> {
        let listener = self
            .listener
            .lock()
            .unwrap()
            .take()
            .ok_or(Error::AlreadyServing)?;
        let app = create_router(self.state.clone());

        tracing::info!(addr = %self.addr, "Push receiver listening.");
        axum::serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

fn create_router(state: ReceiverState) -> Router {
    Router::new()
        .route("/push/{token}", post(deliver_handler))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// The handler for `POST /push/{token}`: one push delivery.
/// Responds 200 only after the notification is displayed; deliveries for
/// tokens this receiver never issued get a 404.
async fn deliver_handler(
    State(state): State<ReceiverState>,
    Path(token): Path<String>,
    body: Bytes,
) -> StatusCode {
    let known = state.tokens.lock().unwrap().contains(&token);
    if !known {
        tracing::warn!(%token, "Delivery for an unknown subscription token.");
        return StatusCode::NOT_FOUND;
    }

    match state.relay.handle_delivery(&body).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::error!(error = %e, "Notification display failed.");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[async_trait]
impl PushPlatform for PushReceiver {
    fn is_supported(&self) -> bool {
        true
    }

    async fn register_relay(&self) -> Result<()> {
        self.relay_registered.store(true, Ordering::SeqCst);
        tracing::info!("Notification relay registered.");
        Ok(())
    }

    async fn subscribe(&self, server_key: &[u8]) -> Result<PushSubscription> {
        if !self.relay_registered.load(Ordering::SeqCst) {
            return Err(Error::RelayNotRegistered);
        }
        if server_key.is_empty() {
            return Err(Error::EmptyServerKey);
        }

        let token = random_material(16);
        self.state.tokens.lock().unwrap().insert(token.clone());

        // The key material is opaque to everyone but the platform; the
        // server stores it alongside the endpoint for its own bookkeeping.
        let subscription = PushSubscription {
            endpoint: format!("http://{}/push/{}", self.addr, token),
            keys: SubscriptionKeys {
                p256dh: random_material(65),
                auth: random_material(16),
            },
        };
        tracing::info!(endpoint = %subscription.endpoint, "Issued push subscription.");
        Ok(subscription)
    }
}

fn random_material(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    urlsafe::encode(&bytes)
}
