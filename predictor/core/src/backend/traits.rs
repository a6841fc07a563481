//! Prediction Service Traits
//!
//! The remote model is consumed only through this trait, so the orchestrator
//! can be driven by the HTTP client in production and by scripted services
//! in tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use crate::parameters::ParameterSet;
use crate::state::PredictionResult;

/// Body of `POST /predict/date`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DateRequest {
    /// `YYYY-MM-DD`
    pub date: String,
}

impl DateRequest {
    /// Serialise a calendar date
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Body of a non-2xx response
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ServiceErrorBody {
    /// Human-readable reason
    #[serde(default)]
    pub error: Option<String>,
}

/// Remote prediction service
///
/// Each call is a single shot: no retry, no caching.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Service name for logs
    fn name(&self) -> &str;

    /// Weather classification for a date
    async fn predict_by_date(&self, date: NaiveDate) -> Result<PredictionResult, PredictionError>;

    /// Air quality classification from pollutant readings
    async fn predict_by_parameters(
        &self,
        params: &ParameterSet,
    ) -> Result<PredictionResult, PredictionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_request_is_iso() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let body = serde_json::to_value(DateRequest::new(date)).unwrap();
        assert_eq!(body, serde_json::json!({"date": "2024-03-07"}));
    }

    #[test]
    fn test_error_body_tolerates_missing_field() {
        let body: ServiceErrorBody = serde_json::from_str(r#"{"detail":"x"}"#).unwrap();
        assert!(body.error.is_none());
    }
}
