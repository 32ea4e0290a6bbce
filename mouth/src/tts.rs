use crate::{AudioSink, Mouth, MouthError};
use anyhow::Result;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::{Client, Url};
use std::pin::Pin;
use std::sync::Arc;
use tracing::{info, warn};

/// Stream of raw WAV data chunks.
pub type TtsStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>>> + Send>>;

/// Text-to-speech engine interface.
#[async_trait]
pub trait Tts: Send + Sync {
    /// Return a stream of WAV bytes for `text`.
    async fn stream_wav(&self, text: &str) -> Result<TtsStream>;
}

/// Client for a Coqui-style TTS server.
#[derive(Clone)]
pub struct CoquiTts {
    url: String,
    client: Client,
    speaker_id: Option<String>,
    language_id: Option<String>,
}

impl CoquiTts {
    /// Create a new client targeting `url` (e.g. `http://localhost:5002/api/tts`).
    ///
    /// `speaker_id` selects the voice and `language_id` the output language;
    /// both fall back to the server defaults when unset.
    pub fn new(
        url: impl Into<String>,
        speaker_id: Option<String>,
        language_id: Option<String>,
    ) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
            speaker_id,
            language_id,
        }
    }
}

#[async_trait]
impl Tts for CoquiTts {
    async fn stream_wav(&self, text: &str) -> Result<TtsStream> {
        let mut url = Url::parse(&self.url)?;
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("text", text);
            qp.append_pair("speaker_id", self.speaker_id.as_deref().unwrap_or("p123"));
            qp.append_pair("style_wav", "");
            qp.append_pair("language_id", self.language_id.as_deref().unwrap_or(""));
        }
        info!(%url, "requesting speech synthesis");
        let resp = self.client.get(url).send().await?.error_for_status()?;
        let stream = resp
            .bytes_stream()
            .map(|b| b.map(|bytes| bytes.to_vec()).map_err(|e| e.into()));
        Ok(Box::pin(stream))
    }
}

/// [`Mouth`] that synthesizes audio via [`Tts`] and plays it through an
/// [`AudioSink`], returning once playback has finished.
#[derive(Clone)]
pub struct TtsMouth {
    tts: Arc<dyn Tts>,
    sink: Arc<dyn AudioSink>,
}

impl TtsMouth {
    pub fn new(tts: Arc<dyn Tts>, sink: Arc<dyn AudioSink>) -> Self {
        Self { tts, sink }
    }
}

#[async_trait]
impl Mouth for TtsMouth {
    async fn speak(&self, text: &str) -> Result<(), MouthError> {
        let mut stream = self
            .tts
            .stream_wav(text)
            .await
            .map_err(|e| MouthError::Synthesis(e.to_string()))?;
        let mut wav = Vec::new();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(bytes) => wav.extend(bytes),
                Err(e) => return Err(MouthError::Synthesis(e.to_string())),
            }
        }
        if wav.is_empty() {
            warn!(%text, "synthesis returned no audio, skipping playback");
            return Ok(());
        }
        self.sink.play(&wav).await
    }
}
