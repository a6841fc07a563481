//! Result Presentation
//!
//! Turns the orchestrator's state into a view model a surface can render
//! without further decisions: icon, gradient, copy, optional panels and the
//! entrance each element should play.
//!
//! The view is recomputed from the current [`RequestState`] on every call.
//! Nothing is cached, so a recommendation can only ever describe the result
//! currently held by `Succeeded`.

use serde::Serialize;

use crate::backend::PredictionService;
use crate::classifier::{
    classify, icon_for, recommendation_for, ClassificationTier, RecommendationBundle, ResultIcon,
    ThemeToken, RECOMMENDATION_NOTE,
};
use crate::mode::PredictionMode;
use crate::motion::{AdaptedEntrance, Entrance, MotionHandle};
use crate::orchestrator::RequestOrchestrator;
use crate::state::{PredictionResult, RequestState};

/// Label shown while a request is in flight
pub const LOADING_LABEL: &str = "Processing...";

/// Result text when the service sent an empty category
pub const UNKNOWN_RESULT_TEXT: &str = "Unknown";

/// Background gradient of the result card, fading into black
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GradientTheme {
    /// Colour at the top-left corner
    pub from: ThemeToken,
    /// Opacity of `from`, in percent
    pub opacity_percent: u8,
}

impl GradientTheme {
    const fn new(from: ThemeToken, opacity_percent: u8) -> Self {
        Self {
            from,
            opacity_percent,
        }
    }

    /// Gradient used before anything is classified
    pub const NEUTRAL: GradientTheme = GradientTheme::new(ThemeToken::Blue, 20);
}

/// Gradient for a tier in a mode
///
/// Date mode darkens the unhealthy tiers more strongly than parameter mode.
#[must_use]
pub fn gradient_for(mode: PredictionMode, tier: ClassificationTier) -> GradientTheme {
    use ClassificationTier as T;

    match (mode, tier) {
        (_, T::Good) => GradientTheme::new(ThemeToken::Green, 20),
        (PredictionMode::Date, T::Moderate) => GradientTheme::new(ThemeToken::Yellow, 30),
        (PredictionMode::Date, T::Unhealthy) => GradientTheme::new(ThemeToken::Red, 30),
        (PredictionMode::Date, T::VeryUnhealthy) => GradientTheme::new(ThemeToken::Red, 40),
        (PredictionMode::Parameters, T::Moderate) => GradientTheme::new(ThemeToken::Yellow, 20),
        (PredictionMode::Parameters, T::Unhealthy) => GradientTheme::new(ThemeToken::Orange, 20),
        (PredictionMode::Parameters, T::VeryUnhealthy) => GradientTheme::new(ThemeToken::Red, 20),
        (_, T::Unknown) => GradientTheme::NEUTRAL,
    }
}

/// Pollutants that drove a parameter-mode classification
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CriticalPanel {
    /// Pollutant names as sent by the service
    pub parameters: Vec<String>,
    /// Highest sub-index, if reported
    pub max_value: Option<f64>,
}

/// Recommendation block under the result card
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendationPanel {
    /// Guidance for the tier
    pub bundle: &'static RecommendationBundle,
    /// General-guidance footnote
    pub note: &'static str,
    /// How the panel enters
    #[serde(skip)]
    pub entrance: AdaptedEntrance,
}

/// Everything needed to draw a successful result
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Presentation {
    /// Mode the result was requested in
    pub mode: PredictionMode,
    /// Tier derived from the category
    pub tier: ClassificationTier,
    /// Icon next to the heading
    pub icon: ResultIcon,
    /// Card background
    pub gradient: GradientTheme,
    /// Card heading
    pub title: &'static str,
    /// Sentence under the heading
    pub description: &'static str,
    /// The category as returned, or "Unknown"
    pub result_text: String,
    /// What the classification is based on
    pub basis_note: &'static str,
    /// Parameter mode only, when the service reported critical pollutants
    pub critical: Option<CriticalPanel>,
    /// Absent for unknown categories
    pub recommendation: Option<RecommendationPanel>,
    /// How the result card enters
    #[serde(skip)]
    pub entrance: AdaptedEntrance,
}

/// View of the request area for one render
#[derive(Clone, Debug, PartialEq)]
pub enum ResultView {
    /// Nothing to show
    Empty,
    /// Request in flight
    Loading {
        /// Button label
        label: &'static str,
        /// Whether the spinner may spin
        animate_spinner: bool,
    },
    /// Latest submission failed
    Failed {
        /// Message to show
        message: String,
    },
    /// Result to show
    Ready(Box<Presentation>),
}

/// Derives views from orchestrator state
#[derive(Clone, Debug)]
pub struct ResultPresenter {
    motion: MotionHandle,
}

impl ResultPresenter {
    /// Create a presenter reading the given motion decision
    #[must_use]
    pub fn new(motion: MotionHandle) -> Self {
        Self { motion }
    }

    /// Entrance of the whole page
    #[must_use]
    pub fn page_entrance(&self) -> AdaptedEntrance {
        self.motion.adapt(Entrance::page())
    }

    /// Entrance of the request form
    #[must_use]
    pub fn form_entrance(&self) -> AdaptedEntrance {
        self.motion.adapt(Entrance::form())
    }

    /// View for an orchestrator's current mode and state
    #[must_use]
    pub fn present_orchestrator<S: PredictionService + 'static>(
        &self,
        orchestrator: &RequestOrchestrator<S>,
    ) -> ResultView {
        self.present(orchestrator.mode(), orchestrator.state())
    }

    /// View for a mode and state
    #[must_use]
    pub fn present(&self, mode: PredictionMode, state: &RequestState) -> ResultView {
        match state {
            RequestState::Idle => ResultView::Empty,
            RequestState::Loading => ResultView::Loading {
                label: LOADING_LABEL,
                animate_spinner: !self.motion.should_reduce_motion(),
            },
            RequestState::Failed(message) => ResultView::Failed {
                message: message.clone(),
            },
            RequestState::Succeeded(result) => {
                ResultView::Ready(Box::new(self.present_result(mode, result)))
            }
        }
    }

    /// Presentation of a result
    #[must_use]
    pub fn present_result(&self, mode: PredictionMode, result: &PredictionResult) -> Presentation {
        let tier = classify(&result.category);

        let result_text = if result.category.is_empty() {
            UNKNOWN_RESULT_TEXT.to_string()
        } else {
            result.category.clone()
        };

        let critical = match (mode, &result.critical_parameters) {
            (PredictionMode::Parameters, Some(parameters)) => Some(CriticalPanel {
                parameters: parameters.clone(),
                max_value: result.max_value,
            }),
            _ => None,
        };

        let recommendation = recommendation_for(tier).map(|bundle| RecommendationPanel {
            bundle,
            note: RECOMMENDATION_NOTE,
            entrance: self.motion.adapt(Entrance::recommendation_panel()),
        });

        Presentation {
            mode,
            tier,
            icon: icon_for(mode, tier),
            gradient: gradient_for(mode, tier),
            title: mode.result_title(),
            description: mode.result_description(),
            result_text,
            basis_note: mode.basis_note(),
            critical,
            recommendation,
            entrance: self.motion.adapt(Entrance::result_card()),
        }
    }
}
