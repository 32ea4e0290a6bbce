use crate::{Seer, SeerError};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use eye::Frame;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Seer`] backed by the Google Generative Language REST API.
#[derive(Clone)]
pub struct GeminiSeer {
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl GeminiSeer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: Client::new(),
        }
    }

    /// Point the client at a different API host. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Bound each describe call; elapsing counts as a describe failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn request_body(frames: &[Frame], prompt: &str) -> Value {
        let mut parts: Vec<Value> = frames
            .iter()
            .map(|frame| {
                json!({
                    "inline_data": {
                        "mime_type": frame.mime,
                        "data": general_purpose::STANDARD.encode(&frame.bytes),
                    }
                })
            })
            .collect();
        parts.push(json!({ "text": prompt }));
        json!({ "contents": [{ "parts": parts }] })
    }
}

#[async_trait]
impl Seer for GeminiSeer {
    async fn describe(&self, frames: &[Frame], prompt: &str) -> Result<String, SeerError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = Self::request_body(frames, prompt);
        debug!(frames = frames.len(), model = %self.model, "describing scene");

        let call = async {
            let resp = self
                .client
                .post(&url)
                .query(&[("key", self.api_key.as_str())])
                .json(&body)
                .send()
                .await?;
            let status = resp.status();
            if !status.is_success() {
                let detail = resp.text().await.unwrap_or_default();
                return Err(SeerError::Rejected(format!("{status}: {detail}")));
            }
            let answer: Value = resp.json().await?;
            Ok(answer)
        };
        let answer = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| SeerError::Timeout(self.timeout))??;

        let text = answer
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if text.is_empty() {
            return Err(SeerError::Empty);
        }
        info!(%text, "guidance received");
        Ok(text.to_string())
    }
}
