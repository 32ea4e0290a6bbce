use crate::{Ear, EarError};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::debug;

/// [`Ear`] that reads typed commands from stdin, one line per utterance.
pub struct ConsoleEar {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleEar {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for ConsoleEar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ear for ConsoleEar {
    async fn listen(&self) -> Result<String, EarError> {
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    return Err(EarError::Unrecognized);
                }
                debug!(%line, "heard typed input");
                Ok(line)
            }
            Ok(None) => Err(EarError::Closed),
            Err(e) => Err(EarError::Service(e.to_string())),
        }
    }
}
