// In crates/notify/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Notification display failed: {0}")]
    Display(#[from] notify_rust::error::Error),
    #[error("Notification task failed: {0}")]
    Background(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
