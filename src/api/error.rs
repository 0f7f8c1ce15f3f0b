use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;
use thiserror::Error;

use crate::{energy::EnergyError, weather::WeatherError};

/// Errors surfaced by handlers. Unreadable request bodies are a 422, the
/// rest map to a 500. Both carry the error text in `detail`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error(transparent)]
    Energy(#[from] EnergyError),

    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),

    #[error("{0}")]
    Internal(String),
}

/// `Json` extractor whose rejection uses the `detail` error body.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Weather(WeatherError::Upstream(_)) => "Upstream",
            ApiError::Weather(WeatherError::MalformedResponse(_)) => "MalformedResponse",
            ApiError::Weather(_) => "Location",
            ApiError::Energy(_) => "Energy",
            ApiError::InvalidBody(_) => "InvalidBody",
            ApiError::Internal(_) => "Internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, ApiError::InvalidBody(_)) {
            tracing::warn!(kind = self.kind(), error = %self, "request rejected");
        } else {
            tracing::error!(kind = self.kind(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            detail: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        ApiError::Internal(format!("{error:#}"))
    }
}

/// Response for a handler that panicked.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let reason = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(%reason, "handler panicked");

    ApiError::Internal("Internal server error".to_string()).into_response()
}
