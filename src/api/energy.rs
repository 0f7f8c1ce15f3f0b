//! Energy forecast endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    api::error::{ApiError, AppJson},
    energy::EnergyForecast,
    state::AppState,
};

pub const WELCOME_MESSAGE: &str =
    "Welcome to the Energy Forecast API! Use /forecast with a date parameter.";

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    /// `YYYY-MM-DD`, matched against dataset timestamps
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    message: &'static str,
}

/// GET /
pub async fn home() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
    })
}

/// POST /forecast - supply, demand and renewable share per timestamp
pub async fn forecast_energy(
    State(st): State<AppState>,
    AppJson(req): AppJson<ForecastRequest>,
) -> Result<Json<EnergyForecast>, ApiError> {
    info!(date = %req.date, "energy forecast requested");
    let forecast = st.energy.forecast(&req.date)?;
    Ok(Json(forecast))
}
