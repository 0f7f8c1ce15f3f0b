//! Weather forecast API endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::{
    api::error::{ApiError, AppJson},
    state::AppState,
    weather::{WeatherError, WeatherInput, WeatherResponse},
};

/// POST /api/weather/forecast - forecast from observed conditions
pub async fn post_forecast(
    State(st): State<AppState>,
    AppJson(input): AppJson<WeatherInput>,
) -> Result<Json<WeatherResponse>, ApiError> {
    info!(location = ?input.location, "receiving forecast request");
    let forecast = st.weather.get_forecast(&input).await?;
    Ok(Json(forecast))
}

/// GET /api/weather/forecast/:location_id - forecast from a stored location's
/// current conditions
pub async fn location_forecast(
    State(st): State<AppState>,
    Path(location_id): Path<String>,
) -> Result<Json<WeatherResponse>, ApiError> {
    info!(%location_id, "receiving forecast request for stored location");
    let location = st
        .locations
        .get(&location_id)
        .await?
        .ok_or_else(|| WeatherError::LocationNotFound(location_id.clone()))?;

    let input = WeatherInput::from_location(&location_id, location, Utc::now())?;
    let forecast = st.weather.get_forecast(&input).await?;
    Ok(Json(forecast))
}
