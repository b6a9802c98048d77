use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser};
use gesture_control::{
    GestureSource, HandFrame, HandLandmarks, Landmark, MockGestureSource, NdjsonSource,
    PinchClassifier, INDEX_TIP, THUMB_TIP,
};
use intent_parser::{IntentConfig, MockOracle, Normalizer, QaOracle};
use parking_lot::Mutex;
use robot_protocol::TcpLink;
use std::sync::Arc;
use tracing::info;
use voice_local::plugin::{new_speaker, new_transcriber, SpeakerKind, TranscriberKind};
use voice_local::{SpeakerConfig, TranscriberConfig};

mod commands;
mod config;
mod console;
mod operator;
mod workers;

use config::{Config, OracleKind, TranscriberChoice};
use console::{Console, SourceFactory};
use operator::Operator;

#[derive(Parser, Debug)]
#[command(name = "operator-console", version)]
#[command(about = "Drive the robot with buttons, voice and gestures")]
struct Args {
    /// JSON config file; created with defaults if missing
    #[arg(long)]
    config: Option<String>,

    /// Robot address
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    /// Q&A oracle backend
    #[arg(long, value_enum)]
    oracle: Option<OracleKind>,

    /// Speech recognizer backend
    #[arg(long, value_enum)]
    transcriber: Option<TranscriberChoice>,

    /// Print responses without speaking them
    #[arg(long, action = ArgAction::SetTrue)]
    mute: bool,
}

impl Args {
    fn into_config(self) -> Result<(Config, bool)> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(oracle) = self.oracle {
            config.oracle = oracle;
        }
        if let Some(transcriber) = self.transcriber {
            config.transcriber = transcriber;
        }
        Ok((config, self.mute))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let (config, mute) = Args::parse().into_config()?;

    let normalizer = Normalizer::new(IntentConfig {
        confidence_threshold: config.confidence_threshold,
        ..IntentConfig::default()
    })?;
    // Blocking HTTP clients must be built and dropped off the async workers
    let oracle = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || build_oracle(&config)).await??
    };
    let speaker = new_speaker(
        if mute { SpeakerKind::Mute } else { SpeakerKind::Command },
        &SpeakerConfig {
            rate_wpm: config.speech_rate,
            ..SpeakerConfig::default()
        },
    )
    .map_err(|e| anyhow!("speaker: {e}"))?;
    let transcriber = new_transcriber(
        match config.transcriber {
            TranscriberChoice::Mock => TranscriberKind::Mock,
            TranscriberChoice::Command => TranscriberKind::Command,
        },
        &TranscriberConfig {
            language: Some(config.language.clone()),
            command: config.transcriber_command.clone(),
        },
    )
    .map_err(|e| anyhow!("transcriber: {e}"))?;

    let addr = config.robot_addr();
    info!(%addr, oracle = oracle.name(), "connecting to robot");
    let link = tokio::task::spawn_blocking(move || TcpLink::connect(&addr)).await??;
    println!("Connected to {}", link.peer());

    let operator = Operator::new(Box::new(link), normalizer, oracle, speaker);
    let mut console = Console::new(
        operator,
        Arc::new(Mutex::new(transcriber)),
        PinchClassifier::new(config.pinch_threshold),
        gesture_sources(config.gesture_feed.clone()),
    );
    let outcome = console.run().await;
    tokio::task::spawn_blocking(move || drop(console)).await?;
    outcome
}

fn build_oracle(config: &Config) -> Result<Arc<dyn QaOracle>> {
    match config.oracle {
        OracleKind::Mock => Ok(Arc::new(MockOracle::echo())),
        OracleKind::Gemini => gemini_oracle(config),
    }
}

#[cfg(feature = "gemini")]
fn gemini_oracle(config: &Config) -> Result<Arc<dyn QaOracle>> {
    let timeout = std::time::Duration::from_secs(config.oracle_timeout_secs);
    Ok(Arc::new(intent_parser::GeminiOracle::from_env(
        &config.gemini_model,
        timeout,
    )?))
}

#[cfg(not(feature = "gemini"))]
fn gemini_oracle(_config: &Config) -> Result<Arc<dyn QaOracle>> {
    Err(anyhow!("built without the `gemini` feature"))
}

/// Opens the landmark feed on every gesture start, or plays a short open/close script.
fn gesture_sources(feed: Option<String>) -> SourceFactory {
    Box::new(move || {
        let source: Box<dyn GestureSource> = match &feed {
            Some(path) => {
                let file = std::fs::File::open(path)?;
                Box::new(NdjsonSource::new(std::io::BufReader::new(file)))
            }
            None => Box::new(MockGestureSource::new([demo_frame(0.3), demo_frame(0.05)])),
        };
        Ok(source)
    })
}

fn demo_frame(spread: f32) -> HandFrame {
    let mut points = vec![Landmark { x: 0.5, y: 0.5, z: 0.0 }; 21];
    points[INDEX_TIP] = Landmark {
        x: points[THUMB_TIP].x + spread,
        y: 0.5,
        z: 0.0,
    };
    HandFrame {
        hands: vec![HandLandmarks { points }],
        ts: None,
    }
}

fn setup_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
}
