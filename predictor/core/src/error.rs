//! Prediction Errors
//!
//! Every failure a request can hit. None of these escape the orchestrator:
//! they are logged and collapsed into `RequestState::Failed` carrying
//! [`PredictionError::user_message`].

use thiserror::Error;

/// Shown when a date submission has no date
pub const MISSING_DATE_MESSAGE: &str = "Please select a date";

/// Shown when the service rejects a request without a readable reason
pub const GENERIC_SERVICE_MESSAGE: &str = "Failed to get prediction";

/// Shown when the service could not be reached or answered garbage
pub const GENERIC_TRANSPORT_MESSAGE: &str = "Failed to get prediction. Please try again.";

/// Why a prediction request failed
#[derive(Debug, Error)]
pub enum PredictionError {
    /// Input rejected before any network I/O
    #[error("invalid request: {0}")]
    Validation(String),

    /// Network unreachable or response body malformed
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx status from the prediction service
    #[error("prediction service returned {status}: {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Server-supplied message, or the generic fallback
        message: String,
    },
}

impl PredictionError {
    /// Message to display in the failed state
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Service { message, .. } => message.clone(),
            Self::Transport(_) => GENERIC_TRANSPORT_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for PredictionError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
