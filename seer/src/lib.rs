//! Scene description: frames plus a question in, navigational guidance out.

use async_trait::async_trait;
use eye::Frame;
use std::time::Duration;
use thiserror::Error;

mod gemini;
mod prompt;

pub use gemini::GeminiSeer;
pub use prompt::guidance_prompt;

#[derive(Debug, Error)]
pub enum SeerError {
    #[error("describe request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("describe request timed out after {0:?}")]
    Timeout(Duration),
    #[error("model returned no description")]
    Empty,
    #[error("model rejected the request: {0}")]
    Rejected(String),
}

/// Converts captured frames and a prompt into a natural-language description.
#[async_trait]
pub trait Seer: Send + Sync {
    async fn describe(&self, frames: &[Frame], prompt: &str) -> Result<String, SeerError>;
}
