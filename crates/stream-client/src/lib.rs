// In crates/stream-client/src/lib.rs

pub mod backoff;
pub mod connector;
pub mod sse;

// Re-export public types
pub use backoff::{Backoff, BackoffPolicy};
pub use connector::{ConnectionStatus, StreamConnector};
pub use sse::SseParser;
