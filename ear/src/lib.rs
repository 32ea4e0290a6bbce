//! User input: spoken or typed commands arriving one utterance at a time.

use async_trait::async_trait;
use thiserror::Error;

mod console;
mod http;

pub use console::ConsoleEar;
pub use http::HttpEar;

#[derive(Debug, Error)]
pub enum EarError {
    /// Audio was heard but nothing intelligible came out of it.
    #[error("could not understand the input")]
    Unrecognized,
    #[error("speech input service failed: {0}")]
    Service(String),
    /// The input source is gone for good (e.g. stdin closed).
    #[error("input stream closed")]
    Closed,
}

/// Delivers the user's next utterance as text.
#[async_trait]
pub trait Ear: Send + Sync {
    /// Wait for and return the next utterance.
    async fn listen(&self) -> Result<String, EarError>;
}
