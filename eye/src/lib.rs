//! Frame capture: the camera collaborator the session pulls still images from.

use async_trait::async_trait;
use thiserror::Error;

mod http;

pub use http::HttpEye;

/// A single captured still image, kept in its encoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl Frame {
    /// Frame holding JPEG-encoded bytes.
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: "image/jpeg".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EyeError {
    #[error("camera unavailable: {0}")]
    Unavailable(String),
    #[error("frame capture failed: {0}")]
    Capture(String),
}

/// Produces frames on demand.
#[async_trait]
pub trait Eye: Send + Sync {
    /// Capture the next frame.
    async fn next_frame(&self) -> Result<Frame, EyeError>;
}
