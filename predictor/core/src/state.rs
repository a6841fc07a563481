//! Request State
//!
//! The lifecycle of a prediction request and the payload it ends with.
//! Only the orchestrator constructs transitions; everyone else reads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classifier::{classify, ClassificationTier};

/// Sequence number of a submitted request
///
/// Increases with every submission; a response is applied only while its id
/// is still the active one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub(crate) fn new(seq: u64) -> Self {
        Self(seq)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Payload returned by the prediction service
///
/// Stored as received; the category is not normalised.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Category label, usually one of the Indonesian air quality labels
    pub category: String,
    /// Pollutants that drove the classification (parameter mode)
    #[serde(
        default,
        alias = "criticalParameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub critical_parameters: Option<Vec<String>>,
    /// Highest sub-index among the readings (parameter mode)
    #[serde(default, alias = "maxValue", skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
}

impl PredictionResult {
    /// Result with only a category
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            critical_parameters: None,
            max_value: None,
        }
    }

    /// Attach critical parameters and their maximum
    #[must_use]
    pub fn with_critical(mut self, parameters: Vec<String>, max_value: f64) -> Self {
        self.critical_parameters = Some(parameters);
        self.max_value = Some(max_value);
        self
    }

    /// Tier of the category, recomputed on every call
    #[must_use]
    pub fn tier(&self) -> ClassificationTier {
        classify(&self.category)
    }
}

/// Where the current request is in its lifecycle
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestState {
    /// Nothing submitted, or the previous result was discarded
    #[default]
    Idle,
    /// Waiting for the active request
    Loading,
    /// The active request returned a result
    Succeeded(PredictionResult),
    /// The latest submission failed
    Failed(String),
}

impl RequestState {
    /// Whether a request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The held result, if any
    #[must_use]
    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// The failure message, if any
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}
