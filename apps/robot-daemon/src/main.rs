use anyhow::{anyhow, Result};
use clap::Parser;
use robot_control::{
    Dispatcher, Ev3devHardware, Hardware, MetricsHub, MockHardware, SessionController, SessionEnd,
};
use std::net::TcpListener;
use tracing::{debug, error, info};

mod config;
use config::{Backend, Config};

#[derive(Parser, Debug)]
#[command(name = "robot-daemon", version)]
#[command(about = "Executes operator commands on the robot, one session per run")]
struct Args {
    /// JSON config file; created with defaults if missing
    #[arg(long)]
    config: Option<String>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    /// Hardware backend
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Multiplier for move durations (0 makes moves instantaneous)
    #[arg(long)]
    time_scale: Option<f64>,
}

impl Args {
    fn into_config(self) -> Result<Config> {
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
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(scale) = self.time_scale {
            config.time_scale = scale;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    setup_tracing();
    let config = Args::parse().into_config()?;

    let hardware: Box<dyn Hardware> = match config.backend {
        Backend::Mock => Box::new(MockHardware::randomized()),
        Backend::Ev3dev => Box::new(Ev3devHardware::open(&config.ev3dev)?),
    };
    info!(backend = ?config.backend, time_scale = config.time_scale, "hardware ready");

    let dispatcher = Dispatcher::new(hardware).with_time_scale(config.time_scale);
    let metrics = MetricsHub::new().map_err(|e| anyhow!(e))?;
    let mut controller = SessionController::new(dispatcher, metrics);

    let listener = TcpListener::bind(config.bind_addr())?;
    info!(addr = %listener.local_addr()?, "waiting for operator");
    let end = controller.accept_one(&listener)?;
    debug!(metrics = %controller.metrics().encode_text(), "final metrics");

    let commands = controller.dispatcher().history().len();
    match end {
        SessionEnd::Exit | SessionEnd::PeerClosed => {
            info!(reason = ?end, commands, "session finished");
            Ok(())
        }
        SessionEnd::Transport(e) => {
            error!(commands, "session lost: {e}");
            Err(e.into())
        }
        SessionEnd::Fault(fault) => {
            error!(commands, "session aborted: {fault}");
            Err(fault.into())
        }
    }
}

fn setup_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
}
