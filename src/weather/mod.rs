//! Weather forecasting through the remote prediction service
//!
//! Observed conditions are forwarded to the prediction service, the reply is
//! reshaped into current/hourly/daily records, and alerts are derived from
//! temperature, precipitation and condition thresholds.

use thiserror::Error;

pub mod alerts;
pub mod client;
pub mod locations;
pub mod models;
pub mod timestamp;

pub use alerts::derive_alerts;
pub use client::WeatherService;
pub use locations::{JsonLocationStore, LocationStore};
pub use models::{Location, WeatherForecast, WeatherInput, WeatherResponse};

#[derive(Debug, Error)]
pub enum WeatherError {
    /// Transport failure, timeout, or non-2xx status from the prediction service
    #[error("Error fetching forecast from model: {0}")]
    Upstream(String),

    #[error("Malformed forecast from model: {0}")]
    MalformedResponse(String),

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Location {id} has no numeric '{field}'")]
    LocationField { id: String, field: &'static str },
}
