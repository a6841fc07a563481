//! Jakarta Predict - Terminal Surface
//!
//! Submits one prediction to the service and renders the classified result.
//!
//! # Usage
//!
//! ```bash
//! # Weather classification for a date
//! jakarta-predict date 2024-06-01
//!
//! # Air quality classification from pollutant readings (unset ones use baselines)
//! jakarta-predict params --pm10 120 --o3 80
//!
//! # Different service, no animation, JSON output
//! jakarta-predict --api-url http://10.0.0.2:5000/api --reduce-motion --json date 2024-06-01
//!
//! # Verbose logging
//! RUST_LOG=debug jakarta-predict date 2024-06-01
//! ```
//!
//! # Environment Variables
//!
//! - `PREDICTOR_CONFIG`: Config file path
//! - `PREDICTOR_API_URL`: Service root (default: `http://localhost:5000/api`)
//! - `PREDICTOR_TIMEOUT_SECS`: Request timeout, `0` for none
//! - `PREDICTOR_REDUCE_MOTION`: Force reduced motion
//! - `REDUCE_MOTION`: OS-level reduced motion preference
//! - `RUST_LOG`: Log filter
//!
//! # Signals
//!
//! - `SIGINT`: Abandon the in-flight request and exit

mod render;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};

use predictor_core::config::MotionConfig;
use predictor_core::motion::detect_os_reduced_motion;
use predictor_core::{
    load_config, ConfigOverrides, DeviceCapability, HttpPredictionService, MotionAdaptation,
    ParameterInputModel, Pollutant, PredictionMode, RequestOrchestrator, RequestState,
    ResultPresenter, ResultView, SystemProbe,
};

/// Jakarta weather and air quality prediction client
#[derive(Parser, Debug)]
#[command(name = "jakarta-predict")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, env = "PREDICTOR_CONFIG", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Prediction service root
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (0 waits indefinitely)
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    /// Render without animation
    #[arg(long, global = true)]
    reduce_motion: bool,

    /// Print the result as JSON instead of a card
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict the weather for a date
    Date {
        /// Date as YYYY-MM-DD
        date: Option<NaiveDate>,
    },
    /// Classify air quality from pollutant readings
    Params(ParamArgs),
}

/// Pollutant readings; omitted ones keep their baseline
#[derive(Args, Debug, Default)]
struct ParamArgs {
    /// Particulate matter (μg/m³)
    #[arg(long)]
    pm10: Option<f64>,
    /// Carbon monoxide (ppm)
    #[arg(long)]
    co: Option<f64>,
    /// Sulfur dioxide (ppb)
    #[arg(long)]
    so2: Option<f64>,
    /// Nitrogen dioxide (ppb)
    #[arg(long)]
    no2: Option<f64>,
    /// Ozone (ppb)
    #[arg(long)]
    o3: Option<f64>,
}

impl ParamArgs {
    /// Feed the readings through the slider model so they are snapped and clamped
    fn into_model(self) -> ParameterInputModel {
        let mut model = ParameterInputModel::new();
        let readings = [
            (Pollutant::Pm10, self.pm10),
            (Pollutant::Co, self.co),
            (Pollutant::So2, self.so2),
            (Pollutant::No2, self.no2),
            (Pollutant::O3, self.o3),
        ];
        for (pollutant, value) in readings {
            if let Some(value) = value {
                let applied = model.set(pollutant, value);
                if (applied - value).abs() > f64::EPSILON {
                    warn!(pollutant = %pollutant, requested = value, applied, "Reading adjusted to slider range");
                }
            }
        }
        model
    }
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_url: self.api_url.clone(),
            timeout_secs: self.timeout,
            reduce_motion: self.reduce_motion.then_some(true),
        }
    }

    fn mode(&self) -> PredictionMode {
        match self.command {
            Command::Date { .. } => PredictionMode::Date,
            Command::Params(_) => PredictionMode::Parameters,
        }
    }
}

/// Build the motion decision from the environment, the device and config
fn build_motion(config: &MotionConfig) -> MotionAdaptation {
    let device = if config.probe_device {
        DeviceCapability::probe(&SystemProbe)
    } else {
        DeviceCapability::default()
    };
    let motion = MotionAdaptation::new(detect_os_reduced_motion(), device);
    if let Some(reduce) = config.reduce_motion {
        motion.set_override(reduce);
    }
    debug!(signals = ?motion.signals(), "Motion decision");
    motion
}

/// Wait for the active request, animating a spinner when motion is allowed
async fn await_result(
    orchestrator: &mut RequestOrchestrator<HttpPredictionService>,
    presenter: &ResultPresenter,
    out: &mut impl Write,
) -> Result<()> {
    let ResultView::Loading {
        label,
        animate_spinner,
    } = presenter.present_orchestrator(orchestrator)
    else {
        return Ok(());
    };

    if !animate_spinner {
        render::result_view(out, &ResultView::Loading { label, animate_spinner }).await?;
    }

    let mut ticker = tokio::time::interval(render::SPINNER_TICK);
    let mut tick = 0usize;
    let mut interrupted = false;

    while orchestrator.state().is_loading() && !interrupted {
        tokio::select! {
            outcome = orchestrator.wait_for_completion() => {
                if outcome.is_none() {
                    break;
                }
            }
            _ = ticker.tick(), if animate_spinner => {
                render::spinner_frame(out, tick, label)?;
                tick += 1;
            }
            _ = tokio::signal::ctrl_c() => {
                interrupted = true;
            }
        }
    }

    if interrupted {
        warn!("Interrupted, abandoning request");
        orchestrator.abandon();
    }

    if animate_spinner {
        render::clear_line(out)?;
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the result
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jakarta_predict=warn".parse()?)
                .add_directive("predictor_core=warn".parse()?),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    let (mut config, source) =
        load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_overrides(&cli.overrides());
    config.validate().context("Invalid configuration")?;
    info!(?source, base_url = %config.api.base_url, "Configuration ready");

    let motion = build_motion(&config.motion);
    let presenter = ResultPresenter::new(motion.handle());

    let service = HttpPredictionService::from_config(&config.api)
        .context("Failed to create HTTP client")?;
    let mut orchestrator = RequestOrchestrator::with_mode(service, cli.mode());

    let mut out = io::stdout();
    if !cli.json {
        render::page_header(&mut out, orchestrator.mode())?;
    }

    match cli.command {
        Command::Date { date } => {
            orchestrator.submit_date_request(date);
        }
        Command::Params(params) => {
            let model = params.into_model();
            if !cli.json {
                render::parameter_summary(&mut out, &model)?;
            }
            orchestrator.submit_parameter_request(model.snapshot());
        }
    }

    await_result(&mut orchestrator, &presenter, &mut out).await?;

    let view = presenter.present_orchestrator(&orchestrator);
    if cli.json {
        let json = match &view {
            ResultView::Ready(presentation) => serde_json::to_string_pretty(presentation)?,
            ResultView::Failed { message } => serde_json::json!({ "error": message }).to_string(),
            ResultView::Empty | ResultView::Loading { .. } => "null".to_string(),
        };
        writeln!(out, "{json}")?;
    } else {
        render::result_view(&mut out, &view).await?;
    }

    Ok(match orchestrator.state() {
        RequestState::Succeeded(_) => ExitCode::SUCCESS,
        RequestState::Failed(_) => ExitCode::from(1),
        RequestState::Idle | RequestState::Loading => ExitCode::from(130),
    })
}
