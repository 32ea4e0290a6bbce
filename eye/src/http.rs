use crate::{Eye, EyeError, Frame};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

/// [`Eye`] that captures frames from an HTTP snapshot endpoint, the kind an
/// IP webcam exposes as `/shot.jpg`.
#[derive(Clone)]
pub struct HttpEye {
    url: String,
    client: Client,
}

impl HttpEye {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }

    /// Capture one frame and discard it, so startup can fail fast when the
    /// camera is unreachable.
    pub async fn probe(&self) -> Result<(), EyeError> {
        let frame = self.next_frame().await?;
        info!(bytes = frame.bytes.len(), url = %self.url, "camera probe ok");
        Ok(())
    }
}

#[async_trait]
impl Eye for HttpEye {
    async fn next_frame(&self) -> Result<Frame, EyeError> {
        let resp = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_connect() {
                EyeError::Unavailable(e.to_string())
            } else {
                EyeError::Capture(e.to_string())
            }
        })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(EyeError::Capture(format!("camera answered {status}")));
        }
        let mime = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| EyeError::Capture(e.to_string()))?;
        if bytes.is_empty() {
            return Err(EyeError::Capture("camera returned an empty frame".into()));
        }
        debug!(bytes = bytes.len(), %mime, "frame captured");
        Ok(Frame {
            bytes: bytes.to_vec(),
            mime,
        })
    }
}
