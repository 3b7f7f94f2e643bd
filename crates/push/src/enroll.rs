// In crates/push/src/enroll.rs

use crate::error::{Error, Result};
use crate::platform::PushPlatform;
use crate::urlsafe;
use core_types::PushSubscription;
use serde::Deserialize;

#[derive(Deserialize)]
struct VapidResponse {
    #[serde(rename = "publicKey")]
    public_key: Option<String>,
}

/// Drives the one-shot push enrollment sequence against the server.
///
/// Enrollment is a one-way transition per run: once it succeeds, further
/// attempts are refused. The flag is deliberately not persisted, so a fresh
/// run starts un-enrolled again. A failed attempt leaves the state
/// untouched and the user free to retry.
pub struct Enroller {
    http: reqwest::Client,
    base_url: String,
    enrolled: bool,
}

impl Enroller {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            enrolled: false,
        }
    }

    pub fn is_enrolled(&self) -> bool {
        self.enrolled
    }

    /// Runs the full sequence: support check, relay registration, server
    /// key fetch and decode, subscription, submission. The first failing
    /// step aborts the remainder.
    pub async fn enroll(&mut self, platform: &dyn PushPlatform) -> Result<PushSubscription> {
        if self.enrolled {
            return Err(Error::AlreadyEnrolled);
        }
        if !platform.is_supported() {
            return Err(Error::Unsupported);
        }

        platform.register_relay().await?;

        let key = self.fetch_server_key().await?;
        let key = urlsafe::decode(&key)?;
        if key.is_empty() {
            return Err(Error::EmptyServerKey);
        }

        let subscription = platform.subscribe(&key).await?;
        self.submit(&subscription).await?;

        self.enrolled = true;
        tracing::info!(endpoint = %subscription.endpoint, "Push enrollment complete.");
        Ok(subscription)
    }

    /// `GET /vapid`, yielding the server's URL-safe base64 public key.
    async fn fetch_server_key(&self) -> Result<String> {
        let url = format!("{}/vapid", self.base_url);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let vapid: VapidResponse = response.json().await?;
        vapid
            .public_key
            .filter(|key| !key.is_empty())
            .ok_or(Error::ServerKeyMissing)
    }

    /// `POST /subscribe` with the subscription object as JSON. Only the
    /// status matters; the response body carries no contract.
    async fn submit(&self, subscription: &PushSubscription) -> Result<()> {
        let url = format!("{}/subscribe", self.base_url);
        let response = self.http.post(&url).json(subscription).send().await?;
        if !response.status().is_success() {
            return Err(Error::SubmitRejected(response.status().as_u16()));
        }
        Ok(())
    }
}
