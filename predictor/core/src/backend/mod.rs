//! Prediction Service Integration
//!
//! Access to the remote prediction model through a common trait.
//!
//! # Usage
//!
//! ```ignore
//! use predictor_core::backend::{HttpPredictionService, PredictionService};
//!
//! let service = HttpPredictionService::new("http://localhost:5000/api", None)?;
//! let result = service.predict_by_date(date).await?;
//! ```

mod http;
mod traits;

pub use http::{HttpPredictionService, DEFAULT_BASE_URL};
pub use traits::{DateRequest, PredictionService, ServiceErrorBody};
