use crate::command::{Command, parse_command};
use ear::{Ear, EarError};
use eye::{Eye, Frame};
use mouth::Narrator;
use seer::{Seer, SeerError, guidance_prompt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Spoken status messages.
pub mod messages {
    pub const WELCOME: &str = "Welcome to Wayfinder. I will assist you with navigation. \
         Please keep the camera still. Say stop when you are done.";
    pub const FAREWELL: &str = "Thank you for using Wayfinder. Goodbye.";
    pub const SCANNING_STARTED: &str = "Scanning your surroundings now.";
    pub const CAPTURE_FAILED: &str =
        "I could not capture a picture of your surroundings. Ask me again when you are ready.";
    pub const DESCRIBE_FAILED: &str =
        "I was unable to understand your surroundings. Please try again.";
    pub const NO_DESCRIPTION: &str = "No description available.";
    pub const INVALID_COMMAND: &str =
        "I did not catch that. Say rescan to look again, or stop to finish.";
    pub const LISTEN_FAILED: &str = "Sorry, I did not hear you. Please say that again.";
}

use messages::*;

/// Where the session currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Scanning,
    Describing,
    AwaitingCommand,
    Closed,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Frames captured per scan.
    pub frames_per_scan: usize,
    /// Pause between captures within one scan.
    pub frame_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frames_per_scan: 5,
            frame_interval: Duration::from_millis(200),
        }
    }
}

/// Drives the scan, describe, narrate, command cycle.
///
/// All collaborators are injected; the session owns the only mutable state
/// and the narrator decouples it from speech playback.
pub struct Session {
    eye: Arc<dyn Eye>,
    ear: Arc<dyn Ear>,
    seer: Arc<dyn Seer>,
    narrator: Narrator,
    config: SessionConfig,
    phase: Phase,
    question: Option<String>,
    frames: Vec<Frame>,
    last_description: Option<String>,
}

impl Session {
    pub fn new(
        eye: Arc<dyn Eye>,
        ear: Arc<dyn Ear>,
        seer: Arc<dyn Seer>,
        narrator: Narrator,
        config: SessionConfig,
    ) -> Self {
        Self {
            eye,
            ear,
            seer,
            narrator,
            config,
            phase: Phase::Idle,
            question: None,
            frames: Vec::new(),
            last_description: None,
        }
    }

    /// The most recent guidance the model produced, if any.
    pub fn last_description(&self) -> Option<&str> {
        self.last_description.as_deref()
    }

    /// Run the session to completion. Returns once the user has quit and the
    /// narration queue has been flushed.
    pub async fn run(mut self) -> anyhow::Result<()> {
        self.narrator.say(WELCOME);
        loop {
            self.phase = match self.phase {
                Phase::Idle => self.await_trigger().await,
                Phase::Scanning => self.scan().await,
                Phase::Describing => self.describe().await,
                Phase::AwaitingCommand => self.await_command().await,
                Phase::Closed => break,
            };
        }
        self.narrator.close().await;
        drop(self.eye);
        info!("session closed");
        Ok(())
    }

    async fn await_trigger(&mut self) -> Phase {
        info!("waiting for a scan request");
        match self.ear.listen().await {
            Ok(heard) => match parse_command(&heard) {
                Command::Quit => self.farewell(),
                Command::Rescan => self.begin_scan(None),
                Command::Other(question) => self.begin_scan(Some(question)),
            },
            Err(err) => self.listen_failed(err, Phase::Idle),
        }
    }

    fn begin_scan(&mut self, question: Option<String>) -> Phase {
        if question.is_some() {
            self.question = question;
        }
        self.narrator.say(SCANNING_STARTED);
        Phase::Scanning
    }

    fn farewell(&mut self) -> Phase {
        self.narrator.say(FAREWELL);
        Phase::Closed
    }

    fn listen_failed(&mut self, err: EarError, retry: Phase) -> Phase {
        if matches!(err, EarError::Closed) {
            info!("input stream closed, ending session");
            return self.farewell();
        }
        warn!(?err, "speech input failed");
        self.narrator.say(LISTEN_FAILED);
        retry
    }

    async fn scan(&mut self) -> Phase {
        self.frames.clear();
        for n in 0..self.config.frames_per_scan {
            if n > 0 {
                sleep(self.config.frame_interval).await;
            }
            match self.eye.next_frame().await {
                Ok(frame) => {
                    debug!(frame = n + 1, bytes = frame.bytes.len(), "captured frame");
                    self.frames.push(frame);
                }
                Err(err) => {
                    warn!(?err, frame = n + 1, "frame capture failed");
                    self.frames.clear();
                    self.narrator.say(CAPTURE_FAILED);
                    return Phase::Idle;
                }
            }
        }
        Phase::Describing
    }

    async fn describe(&mut self) -> Phase {
        let prompt = guidance_prompt(self.question.as_deref());
        let frames = std::mem::take(&mut self.frames);
        match self.seer.describe(&frames, &prompt).await {
            Ok(text) => {
                info!(%text, "guidance ready");
                self.last_description = Some(text.clone());
                self.narrator.say(text);
            }
            Err(SeerError::Empty) => {
                info!("model had nothing to say");
                self.narrator.say(NO_DESCRIPTION);
            }
            Err(err) => {
                warn!(?err, "describe failed");
                self.narrator.say(DESCRIBE_FAILED);
            }
        }
        Phase::AwaitingCommand
    }

    async fn await_command(&mut self) -> Phase {
        info!("waiting for a command");
        match self.ear.listen().await {
            Ok(heard) => match parse_command(&heard) {
                Command::Rescan => {
                    self.narrator.say(SCANNING_STARTED);
                    Phase::Scanning
                }
                Command::Quit => self.farewell(),
                Command::Other(other) => {
                    info!(%other, "unrecognized command");
                    self.narrator.say(INVALID_COMMAND);
                    Phase::AwaitingCommand
                }
            },
            Err(err) => self.listen_failed(err, Phase::AwaitingCommand),
        }
    }
}
