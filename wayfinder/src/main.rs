use anyhow::{Context, anyhow};
use clap::Parser;
use ear::{ConsoleEar, Ear, HttpEar};
use eye::HttpEye;
use mouth::{AudioSink, CoquiTts, Mouth, Narrator, PrintMouth, ProcessSink, Tts, TtsMouth};
use seer::GeminiSeer;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use wayfinder::{Session, SessionConfig, init_logging};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Snapshot endpoint of the camera, e.g. http://192.168.0.12:8080/shot.jpg
    #[arg(long, env = "CAMERA_URL")]
    camera_url: String,

    /// API key for the Google Generative Language API
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: String,

    /// Vision model used to describe the surroundings
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-1.5-flash")]
    gemini_model: String,

    /// Coqui-style TTS endpoint
    #[arg(long, env = "TTS_URL", default_value = "http://localhost:5002/api/tts")]
    tts_url: String,

    /// TTS voice
    #[arg(long, env = "SPEAKER_ID")]
    speaker_id: Option<String>,

    /// TTS language
    #[arg(long, env = "LANGUAGE_ID")]
    language_id: Option<String>,

    /// Audio player command; detected on PATH when unset
    #[arg(long)]
    player: Option<String>,

    /// Speech-to-text service; commands are typed on stdin when unset
    #[arg(long, env = "MIC_URL")]
    mic_url: Option<String>,

    /// Frames captured per scan
    #[arg(long, default_value_t = 5)]
    frames: usize,

    /// Pause between captures, in milliseconds
    #[arg(long, default_value_t = 200)]
    frame_interval_ms: u64,

    /// Give up on a describe call after this many seconds
    #[arg(long, default_value_t = 30)]
    describe_timeout_secs: u64,

    /// Print narrations instead of speaking them
    #[arg(long)]
    mute: bool,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging();

    let eye = Arc::new(HttpEye::new(&cli.camera_url));
    eye.probe()
        .await
        .with_context(|| format!("cannot open camera at {}", cli.camera_url))?;

    let seer = Arc::new(
        GeminiSeer::new(cli.gemini_api_key, cli.gemini_model)
            .with_timeout(Duration::from_secs(cli.describe_timeout_secs)),
    );

    let ear: Arc<dyn Ear> = match &cli.mic_url {
        Some(url) => Arc::new(HttpEar::new(url.clone())),
        None => Arc::new(ConsoleEar::new()),
    };

    let mouth: Arc<dyn Mouth> = if cli.mute {
        Arc::new(PrintMouth)
    } else {
        let tts =
            Arc::new(CoquiTts::new(cli.tts_url, cli.speaker_id, cli.language_id)) as Arc<dyn Tts>;
        let sink: Arc<dyn AudioSink> = match &cli.player {
            Some(command) => Arc::new(ProcessSink::from_command(command)?),
            None => Arc::new(ProcessSink::detect().ok_or_else(|| {
                anyhow!("no audio player found; install aplay, paplay or ffplay, or pass --player")
            })?),
        };
        Arc::new(TtsMouth::new(tts, sink))
    };
    let narrator = Narrator::spawn(mouth);

    let config = SessionConfig {
        frames_per_scan: cli.frames,
        frame_interval: Duration::from_millis(cli.frame_interval_ms),
    };
    info!(frames = config.frames_per_scan, "wayfinder running");
    Session::new(eye, ear, seer, narrator, config).run().await
}
