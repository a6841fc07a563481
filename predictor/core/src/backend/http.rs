//! HTTP Prediction Service
//!
//! JSON-over-HTTP client for the remote model.
//!
//! # Endpoints
//!
//! - `POST {base}/predict/date` with `{"date": "YYYY-MM-DD"}`
//! - `POST {base}/predict/weather` with `{"pm10", "co", "so2", "no2", "o3"}`
//!
//! Both answer `200 {category, ...}` or a non-2xx `{error}`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use super::traits::{DateRequest, PredictionService, ServiceErrorBody};
use crate::config::ApiConfig;
use crate::error::{PredictionError, GENERIC_SERVICE_MESSAGE};
use crate::parameters::ParameterSet;
use crate::state::PredictionResult;

/// Default service root
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Prediction service client
#[derive(Clone, Debug)]
pub struct HttpPredictionService {
    /// Service root without trailing slash
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpPredictionService {
    /// Create a client
    ///
    /// `timeout` of `None` leaves requests unbounded, so a hung connection
    /// keeps the orchestrator loading.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, PredictionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: builder.build()?,
        })
    }

    /// Create from the `[api]` config section
    pub fn from_config(config: &ApiConfig) -> Result<Self, PredictionError> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    /// Service root
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn date_url(&self) -> String {
        format!("{}/predict/date", self.base_url)
    }

    fn weather_url(&self) -> String {
        format!("{}/predict/weather", self.base_url)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<PredictionResult, PredictionError> {
        tracing::debug!(url, "Posting prediction request");

        let response = self.http_client.post(url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            // Unreadable bodies still produce a service error
            let bytes = response.bytes().await.unwrap_or_default();
            let message = serde_json::from_slice::<ServiceErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.error)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| GENERIC_SERVICE_MESSAGE.to_string());
            tracing::warn!(url, status = status.as_u16(), %message, "Prediction rejected");
            return Err(PredictionError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| PredictionError::Transport(format!("malformed response body: {e}")))
    }
}

impl Default for HttpPredictionService {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    fn name(&self) -> &str {
        "http"
    }

    async fn predict_by_date(&self, date: NaiveDate) -> Result<PredictionResult, PredictionError> {
        self.post(&self.date_url(), &DateRequest::new(date)).await
    }

    async fn predict_by_parameters(
        &self,
        params: &ParameterSet,
    ) -> Result<PredictionResult, PredictionError> {
        self.post(&self.weather_url(), params).await
    }
}
