use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

use super::{
    alerts::derive_alerts,
    models::{Location, UpstreamForecast},
    WeatherError, WeatherForecast, WeatherInput, WeatherResponse,
};

/// Gateway to the remote weather prediction service.
///
/// One POST per call, bounded by the client timeout. Failures are returned
/// immediately; nothing is retried.
#[derive(Clone)]
pub struct WeatherService {
    client: Client,
    base_url: String,
}

impl WeatherService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Upstream(error_chain(&e)))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url.trim_end_matches('/'))
    }

    pub async fn get_forecast(&self, input: &WeatherInput) -> Result<WeatherResponse, WeatherError> {
        let url = self.predict_url();
        debug!(%url, "requesting weather prediction");

        let response = self
            .client
            .post(&url)
            .json(input)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!(error = %error_chain(&e), "weather prediction request failed");
                WeatherError::Upstream(error_chain(&e))
            })?;

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::Upstream(error_chain(&e)))?;
        let payload: UpstreamForecast = serde_json::from_str(&body)
            .map_err(|e| WeatherError::MalformedResponse(e.to_string()))?;

        info!(
            hourly = payload.hourly.len(),
            daily = payload.daily.len(),
            "received weather prediction"
        );

        Ok(assemble(payload, input.location.clone()))
    }
}

/// Shapes the prediction into a response. The current record is stamped
/// with the local processing time; hourly and daily keep upstream times.
fn assemble(payload: UpstreamForecast, location: Location) -> WeatherResponse {
    let current_weather = payload.current.at(Utc::now());
    let hourly_forecast: Vec<WeatherForecast> =
        payload.hourly.into_iter().map(Into::into).collect();
    let daily_forecast: Vec<WeatherForecast> = payload.daily.into_iter().map(Into::into).collect();

    let alerts = derive_alerts(&current_weather, &hourly_forecast);

    WeatherResponse {
        location,
        current_weather,
        hourly_forecast,
        daily_forecast,
        alerts,
    }
}

/// `reqwest` keeps the interesting part (timeout, refused connection) in
/// the source chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
