use crate::{Ear, EarError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// How long one listen request may wait for an utterance before the attempt
/// counts as unrecognized.
const DEFAULT_LISTEN_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Deserialize)]
struct Transcript {
    transcript: String,
}

/// [`Ear`] backed by a speech-to-text service.
///
/// Long-polls `GET {base}/listen`; the service blocks until it has recognized
/// an utterance and answers `{"transcript": "..."}`.
#[derive(Clone)]
pub struct HttpEar {
    base: String,
    client: Client,
}

impl HttpEar {
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_timeout(base, DEFAULT_LISTEN_TIMEOUT)
    }

    pub fn with_timeout(base: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client");
        Self {
            base: base.into(),
            client,
        }
    }
}

#[async_trait]
impl Ear for HttpEar {
    async fn listen(&self) -> Result<String, EarError> {
        let url = format!("{}/listen", self.base.trim_end_matches('/'));
        debug!(%url, "listening for a command");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EarError::Unrecognized
                } else {
                    EarError::Service(e.to_string())
                }
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(EarError::Service(format!(
                "speech service answered {status}"
            )));
        }
        let body: Transcript = resp
            .json()
            .await
            .map_err(|e| EarError::Service(e.to_string()))?;
        let heard = body.transcript.trim().to_string();
        if heard.is_empty() {
            return Err(EarError::Unrecognized);
        }
        info!(%heard, "heard spoken input");
        Ok(heard)
    }
}
