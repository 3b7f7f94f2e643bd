// In crates/push/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Push is not supported on this platform")]
    Unsupported,
    #[error("Push enrollment already completed for this run")]
    AlreadyEnrolled,
    #[error("The notification relay is not registered")]
    RelayNotRegistered,
    #[error("The server's /vapid response carries no public key")]
    ServerKeyMissing,
    #[error("The server's public key decoded to nothing")]
    EmptyServerKey,
    #[error("The server's public key is not valid URL-safe base64: {0}")]
    KeyDecodeFailed(#[from] base64::DecodeError),
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Subscription submission was rejected: HTTP {0}")]
    SubmitRejected(u16),
    #[error("Push receiver I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Push receiver is already serving")]
    AlreadyServing,
}

pub type Result<T> = std::result::Result<T, Error>;
