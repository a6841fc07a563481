//! Predictor Core - Jakarta Weather and Air Quality Prediction Client
//!
//! This crate holds everything a prediction client needs apart from drawing:
//! it talks to the remote model, tracks one logical request at a time,
//! classifies what comes back and decides how the result should look and move.
//! A terminal front end, a GUI or a test harness can sit on top of it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Surfaces                             │
//! │        CLI (crossterm)   │   GUI   │   Headless / tests      │
//! └────────────┬─────────────┴─────────┴──────────▲──────────────┘
//!              │ submit / set_mode / abandon      │ ResultView
//! ┌────────────▼──────────────────────────────────┴──────────────┐
//! │                       PREDICTOR CORE                          │
//! │  ┌────────────────────┐   state   ┌────────────────────────┐ │
//! │  │ RequestOrchestrator│──────────▶│    ResultPresenter     │ │
//! │  └───┬────────────▲───┘           └──┬──────────────┬──────┘ │
//! │      │            │ completions      │              │        │
//! │  ┌───▼────────────┴───┐   ┌──────────▼───┐  ┌───────▼──────┐ │
//! │  │ PredictionService  │   │  Classifier  │  │   Motion     │ │
//! │  │   (HTTP / mock)    │   │              │  │  Adaptation  │ │
//! │  └────────────────────┘   └──────────────┘  └──────────────┘ │
//! │  ParameterInputModel ──▶ ParameterSet ──▶ orchestrator        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`RequestOrchestrator`]: mode, request lifecycle, superseded-response handling
//! - [`ParameterInputModel`]: bounded pollutant readings
//! - [`classify`]: category string to [`ClassificationTier`]
//! - [`MotionAdaptation`] / [`MotionHandle`]: reduced-motion decision
//! - [`ResultPresenter`]: state to [`ResultView`]
//!
//! # Quick Start
//!
//! ```ignore
//! use predictor_core::{
//!     backend::HttpPredictionService, MotionAdaptation, RequestOrchestrator, ResultPresenter,
//! };
//!
//! let service = HttpPredictionService::new("http://localhost:5000/api", None)?;
//! let mut orchestrator = RequestOrchestrator::new(service);
//! let presenter = ResultPresenter::new(MotionAdaptation::without_probe(false).handle());
//!
//! orchestrator.submit_date_request(Some(date));
//! orchestrator.settle().await;
//! let view = presenter.present_orchestrator(&orchestrator);
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod classifier;
pub mod config;
pub mod error;
pub mod mode;
pub mod motion;
pub mod orchestrator;
pub mod parameters;
pub mod presenter;
pub mod state;

// Re-exports for convenience
pub use backend::{HttpPredictionService, PredictionService};
pub use classifier::{
    classify, icon_for, recommendation_for, ClassificationTier, IconGlyph, RecommendationBundle,
    ResultIcon, ThemeToken,
};
pub use config::{
    load_config, ConfigError, ConfigOverrides, ConfigSource, PredictorConfig,
};
pub use error::PredictionError;
pub use mode::PredictionMode;
pub use motion::{
    AdaptedEntrance, DeviceCapability, DeviceProbe, Entrance, MotionAdaptation, MotionHandle,
    MotionSignals, SystemProbe, VisualState,
};
pub use orchestrator::{CompletionOutcome, RequestOrchestrator};
pub use parameters::{ParameterInputModel, ParameterSet, Pollutant, SliderLevel};
pub use presenter::{Presentation, ResultPresenter, ResultView};
pub use state::{PredictionResult, RequestId, RequestState};
