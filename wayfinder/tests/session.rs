use async_trait::async_trait;
use ear::{Ear, EarError};
use eye::{Eye, EyeError, Frame};
use mouth::{Mouth, MouthError, Narrator};
use seer::{Seer, SeerError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wayfinder::messages::*;
use wayfinder::{Session, SessionConfig};

#[derive(Clone, Default)]
struct RecordingMouth {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingMouth {
    fn transcript(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mouth for RecordingMouth {
    async fn speak(&self, text: &str) -> Result<(), MouthError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Ear that replays a script and reports a closed stream afterwards.
struct ScriptEar {
    script: Mutex<VecDeque<Result<String, EarError>>>,
}

impl ScriptEar {
    fn new(script: Vec<Result<String, EarError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    fn hears(utterances: &[&str]) -> Self {
        Self::new(utterances.iter().map(|u| Ok(u.to_string())).collect())
    }
}

#[async_trait]
impl Ear for ScriptEar {
    async fn listen(&self) -> Result<String, EarError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(EarError::Closed))
    }
}

/// Eye that captures fine unless the script says otherwise.
#[derive(Default)]
struct ScriptEye {
    failures: Mutex<VecDeque<Result<(), EyeError>>>,
    captures: AtomicUsize,
}

impl ScriptEye {
    fn failing_on(script: Vec<Result<(), EyeError>>) -> Self {
        Self {
            failures: Mutex::new(script.into_iter().collect()),
            captures: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Eye for ScriptEye {
    async fn next_frame(&self) -> Result<Frame, EyeError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        match self.failures.lock().unwrap().pop_front() {
            Some(Err(err)) => Err(err),
            _ => Ok(Frame::jpeg(vec![0xFF, 0xD8])),
        }
    }
}

/// Seer that replays scripted replies and records every prompt.
#[derive(Default)]
struct ScriptSeer {
    replies: Mutex<VecDeque<Result<String, SeerError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptSeer {
    fn answers(text: &str, times: usize) -> Self {
        Self {
            replies: Mutex::new((0..times).map(|_| Ok(text.to_string())).collect()),
            ..Self::default()
        }
    }

    fn replies(replies: Vec<Result<String, SeerError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Seer for ScriptSeer {
    async fn describe(&self, _frames: &[Frame], prompt: &str) -> Result<String, SeerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Path clear ahead.".to_string()))
    }
}

fn config() -> SessionConfig {
    SessionConfig {
        frames_per_scan: 5,
        frame_interval: Duration::ZERO,
    }
}

fn session(
    eye: Arc<ScriptEye>,
    ear: ScriptEar,
    seer: Arc<ScriptSeer>,
    mouth: RecordingMouth,
) -> Session {
    Session::new(
        eye,
        Arc::new(ear),
        seer,
        Narrator::spawn(Arc::new(mouth)),
        config(),
    )
}

#[tokio::test]
async fn clear_path_is_spoken_once() {
    let eye = Arc::new(ScriptEye::default());
    let seer = Arc::new(ScriptSeer::answers("Path clear ahead.", 1));
    let mouth = RecordingMouth::default();
    let ear = ScriptEar::hears(&["look around", "thank you"]);

    session(eye.clone(), ear, seer.clone(), mouth.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(
        mouth.transcript(),
        vec![WELCOME, SCANNING_STARTED, "Path clear ahead.", FAREWELL]
    );
    assert_eq!(seer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(eye.captures.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn capture_failure_returns_to_idle_without_describing() {
    let eye = Arc::new(ScriptEye::failing_on(vec![
        Ok(()),
        Ok(()),
        Err(EyeError::Capture("lens fell off".into())),
    ]));
    let seer = Arc::new(ScriptSeer::default());
    let mouth = RecordingMouth::default();
    // After the failed scan the session is idle again; the next utterance
    // must be accepted as a fresh trigger.
    let ear = ScriptEar::hears(&["look around", "stop"]);

    session(eye.clone(), ear, seer.clone(), mouth.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(
        mouth.transcript(),
        vec![WELCOME, SCANNING_STARTED, CAPTURE_FAILED, FAREWELL]
    );
    assert_eq!(seer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(eye.captures.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn rescan_describes_exactly_once_per_request() {
    let eye = Arc::new(ScriptEye::default());
    let seer = Arc::new(ScriptSeer::answers("Path clear ahead.", 3));
    let mouth = RecordingMouth::default();
    let ear = ScriptEar::hears(&["look around", "rescan", "rescan", "stop"]);

    session(eye.clone(), ear, seer.clone(), mouth.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(seer.calls.load(Ordering::SeqCst), 3);
    let transcript = mouth.transcript();
    assert_eq!(
        transcript
            .iter()
            .filter(|t| t.as_str() == SCANNING_STARTED)
            .count(),
        3
    );
    assert_eq!(
        transcript
            .iter()
            .filter(|t| t.as_str() == "Path clear ahead.")
            .count(),
        3
    );
}

#[tokio::test]
async fn unknown_command_keeps_awaiting() {
    let eye = Arc::new(ScriptEye::default());
    let seer = Arc::new(ScriptSeer::answers("Path clear ahead.", 2));
    let mouth = RecordingMouth::default();
    let ear = ScriptEar::hears(&["look around", "xyz", "rescan", "thank you"]);

    session(eye, ear, seer.clone(), mouth.clone())
        .run()
        .await
        .unwrap();

    let transcript = mouth.transcript();
    assert_eq!(
        transcript
            .iter()
            .filter(|t| t.as_str() == INVALID_COMMAND)
            .count(),
        1
    );
    // The rescan after the rejected command was still honored.
    assert_eq!(seer.calls.load(Ordering::SeqCst), 2);
    assert_eq!(transcript.last().map(String::as_str), Some(FAREWELL));
}

#[tokio::test]
async fn describe_failure_speaks_one_fallback() {
    let eye = Arc::new(ScriptEye::default());
    let seer = Arc::new(ScriptSeer::replies(vec![Err(SeerError::Rejected(
        "500: overloaded".into(),
    ))]));
    let mouth = RecordingMouth::default();
    let ear = ScriptEar::hears(&["look around", "q"]);

    session(eye, ear, seer.clone(), mouth.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(
        mouth.transcript(),
        vec![WELCOME, SCANNING_STARTED, DESCRIBE_FAILED, FAREWELL]
    );
}

#[tokio::test]
async fn describe_timeout_speaks_one_fallback() {
    let eye = Arc::new(ScriptEye::default());
    let seer = Arc::new(ScriptSeer::replies(vec![Err(SeerError::Timeout(
        Duration::from_secs(30),
    ))]));
    let mouth = RecordingMouth::default();
    let ear = ScriptEar::hears(&["look around", "q"]);

    session(eye, ear, seer.clone(), mouth.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(
        mouth.transcript(),
        vec![WELCOME, SCANNING_STARTED, DESCRIBE_FAILED, FAREWELL]
    );
}

#[tokio::test]
async fn empty_answer_gets_the_stock_line() {
    let eye = Arc::new(ScriptEye::default());
    let seer = Arc::new(ScriptSeer::replies(vec![Err(SeerError::Empty)]));
    let mouth = RecordingMouth::default();
    let ear = ScriptEar::hears(&["look around", "q"]);

    session(eye, ear, seer, mouth.clone()).run().await.unwrap();

    assert_eq!(
        mouth.transcript(),
        vec![WELCOME, SCANNING_STARTED, NO_DESCRIPTION, FAREWELL]
    );
}

#[tokio::test]
async fn the_question_rides_along_in_the_prompt() {
    let eye = Arc::new(ScriptEye::default());
    let seer = Arc::new(ScriptSeer::answers("The door is on your left.", 2));
    let mouth = RecordingMouth::default();
    let ear = ScriptEar::hears(&["where is the door", "rescan", "thank you"]);

    session(eye, ear, seer.clone(), mouth.clone())
        .run()
        .await
        .unwrap();

    let prompts = seer.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("where is the door"));
    // A bare rescan reuses the question captured at trigger time.
    assert!(prompts[1].contains("where is the door"));
}

#[tokio::test]
async fn unheard_input_reprompts() {
    let eye = Arc::new(ScriptEye::default());
    let seer = Arc::new(ScriptSeer::answers("Path clear ahead.", 1));
    let mouth = RecordingMouth::default();
    let ear = ScriptEar::new(vec![
        Err(EarError::Unrecognized),
        Ok("look around".into()),
        Err(EarError::Service("mic unplugged".into())),
        Ok("thank you".into()),
    ]);

    session(eye, ear, seer.clone(), mouth.clone())
        .run()
        .await
        .unwrap();

    let transcript = mouth.transcript();
    assert_eq!(
        transcript
            .iter()
            .filter(|t| t.as_str() == LISTEN_FAILED)
            .count(),
        2
    );
    assert_eq!(seer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(transcript.last().map(String::as_str), Some(FAREWELL));
}

#[tokio::test]
async fn quitting_from_idle_skips_the_camera() {
    let eye = Arc::new(ScriptEye::default());
    let seer = Arc::new(ScriptSeer::default());
    let mouth = RecordingMouth::default();
    let ear = ScriptEar::hears(&["stop"]);

    session(eye.clone(), ear, seer.clone(), mouth.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(mouth.transcript(), vec![WELCOME, FAREWELL]);
    assert_eq!(eye.captures.load(Ordering::SeqCst), 0);
    assert_eq!(seer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn closed_input_ends_the_session_cleanly() {
    let eye = Arc::new(ScriptEye::default());
    let seer = Arc::new(ScriptSeer::default());
    let mouth = RecordingMouth::default();
    // Script runs dry immediately: stdin closed before any command.
    let ear = ScriptEar::new(Vec::new());

    session(eye, ear, seer, mouth.clone()).run().await.unwrap();

    assert_eq!(mouth.transcript(), vec![WELCOME, FAREWELL]);
}
