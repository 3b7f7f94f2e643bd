// In crates/app-config/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
