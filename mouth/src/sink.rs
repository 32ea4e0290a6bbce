use crate::MouthError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Plays a complete WAV clip, returning once playback has finished.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, wav: &[u8]) -> Result<(), MouthError>;
}

/// [`AudioSink`] that pipes WAV bytes into a command line audio player.
#[derive(Debug)]
pub struct ProcessSink {
    argv: Vec<String>,
}

/// Players tried by [`ProcessSink::detect`], in order of preference.
const PLAYERS: &[&[&str]] = &[
    &["aplay", "-q"],
    &["paplay"],
    &["ffplay", "-nodisp", "-autoexit", "-loglevel", "quiet", "-"],
];

impl ProcessSink {
    /// Use an explicit player command line, e.g. `"aplay -q"`.
    pub fn from_command(command: &str) -> Result<Self, MouthError> {
        let argv: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        if argv.is_empty() {
            return Err(MouthError::NoPlayer);
        }
        Ok(Self { argv })
    }

    /// Find the first known player available on PATH.
    pub fn detect() -> Option<Self> {
        for argv in PLAYERS {
            if on_path(argv[0]) {
                debug!(player = argv[0], "audio player selected");
                return Some(Self {
                    argv: argv.iter().map(|s| s.to_string()).collect(),
                });
            }
        }
        None
    }

    /// Name of the player binary in use.
    pub fn player(&self) -> &str {
        &self.argv[0]
    }
}

fn on_path(binary: &str) -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path)
        .map(|dir| dir.join(binary))
        .any(|candidate: PathBuf| candidate.is_file())
}

#[async_trait]
impl AudioSink for ProcessSink {
    async fn play(&self, wav: &[u8]) -> Result<(), MouthError> {
        let mut child = Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MouthError::Playback(format!("failed to start {}: {e}", self.argv[0])))?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| MouthError::Playback("player stdin unavailable".into()))?;
        stdin
            .write_all(wav)
            .await
            .map_err(|e| MouthError::Playback(format!("writing to {}: {e}", self.argv[0])))?;
        drop(stdin);
        let status = child
            .wait()
            .await
            .map_err(|e| MouthError::Playback(format!("waiting for {}: {e}", self.argv[0])))?;
        if !status.success() {
            return Err(MouthError::Playback(format!(
                "{} exited with {status}",
                self.argv[0]
            )));
        }
        Ok(())
    }
}
