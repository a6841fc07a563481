//! Prediction Mode
//!
//! The two ways a user can ask for a classification. The mode is chosen by
//! the surface (a tab, a subcommand) and owned by the orchestrator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the prediction is requested
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMode {
    /// Weather classification for a calendar date
    #[default]
    Date,
    /// Air quality classification from pollutant readings
    Parameters,
}

impl PredictionMode {
    /// Heading shown above a result in this mode
    #[must_use]
    pub fn result_title(&self) -> &'static str {
        match self {
            Self::Date => "Weather Prediction",
            Self::Parameters => "Air Quality Classification",
        }
    }

    /// Sentence introducing the classification
    #[must_use]
    pub fn result_description(&self) -> &'static str {
        match self {
            Self::Date => {
                "Based on historical data and our AI model, the predicted weather condition is:"
            }
            Self::Parameters => {
                "Based on the parameters you provided, our AI model classifies the air quality as:"
            }
        }
    }

    /// Note explaining what the classification is based on
    #[must_use]
    pub fn basis_note(&self) -> &'static str {
        match self {
            Self::Date => "This prediction is based on historical weather patterns in Jakarta.",
            Self::Parameters => {
                "This classification is based on the environmental parameters you provided."
            }
        }
    }
}

impl fmt::Display for PredictionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::Parameters => write!(f, "parameters"),
        }
    }
}
