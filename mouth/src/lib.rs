//! Spoken output: the narration queue and the speech collaborators behind it.

use async_trait::async_trait;
use thiserror::Error;

mod narrator;
mod sink;
mod tts;

pub use narrator::Narrator;
pub use sink::{AudioSink, ProcessSink};
pub use tts::{CoquiTts, Tts, TtsMouth, TtsStream};

#[derive(Debug, Error)]
pub enum MouthError {
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
    #[error("audio playback failed: {0}")]
    Playback(String),
    #[error("no audio player found on PATH")]
    NoPlayer,
}

/// Turns text into audible speech.
///
/// `speak` resolves once playback has completed, so callers can rely on it as
/// the pacing point of the narration loop. Implementations must be `Send` and
/// `Sync`; the narration worker calls them sequentially.
#[async_trait]
pub trait Mouth: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), MouthError>;
}

/// [`Mouth`] that writes the text to stdout instead of playing audio.
///
/// Used by `--mute` mode and in tests.
#[derive(Clone, Copy, Default)]
pub struct PrintMouth;

#[async_trait]
impl Mouth for PrintMouth {
    async fn speak(&self, text: &str) -> Result<(), MouthError> {
        println!("🗣️  {text}");
        Ok(())
    }
}
