use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{timestamp, WeatherError};

/// Free-form location descriptor, echoed back untouched.
pub type Location = Map<String, Value>;

/// Observed conditions sent to the prediction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInput {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub location: Location,
}

impl WeatherInput {
    /// Builds an input from a stored location's `current_*` readings.
    pub fn from_location(
        id: &str,
        location: Location,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, WeatherError> {
        let reading = |field: &'static str| {
            location
                .get(field)
                .and_then(Value::as_f64)
                .ok_or_else(|| WeatherError::LocationField {
                    id: id.to_string(),
                    field,
                })
        };

        Ok(Self {
            temperature: reading("current_temperature")?,
            humidity: reading("current_humidity")?,
            pressure: reading("current_pressure")?,
            wind_speed: reading("current_wind_speed")?,
            wind_direction: reading("current_wind_direction")?,
            timestamp,
            location,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub temperature: f64,
    pub humidity: f64,
    /// 0.0 - 1.0
    pub precipitation_probability: f64,
    #[serde(with = "timestamp")]
    pub forecast_time: DateTime<Utc>,
    pub weather_condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub location: Location,
    pub current_weather: WeatherForecast,
    pub hourly_forecast: Vec<WeatherForecast>,
    pub daily_forecast: Vec<WeatherForecast>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<String>,
}

// Prediction service reply. Every field is required.

#[derive(Debug, Deserialize)]
pub(crate) struct UpstreamForecast {
    pub current: UpstreamCurrent,
    pub hourly: Vec<UpstreamPoint>,
    pub daily: Vec<UpstreamPoint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpstreamCurrent {
    pub temperature: f64,
    pub humidity: f64,
    pub precipitation_prob: f64,
    pub condition: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpstreamPoint {
    pub temperature: f64,
    pub humidity: f64,
    pub precipitation_prob: f64,
    pub condition: String,
    #[serde(with = "timestamp")]
    pub time: DateTime<Utc>,
}

impl From<UpstreamPoint> for WeatherForecast {
    fn from(p: UpstreamPoint) -> Self {
        Self {
            temperature: p.temperature,
            humidity: p.humidity,
            precipitation_probability: p.precipitation_prob,
            forecast_time: p.time,
            weather_condition: p.condition,
        }
    }
}

impl UpstreamCurrent {
    pub fn at(self, forecast_time: DateTime<Utc>) -> WeatherForecast {
        WeatherForecast {
            temperature: self.temperature,
            humidity: self.humidity,
            precipitation_probability: self.precipitation_prob,
            forecast_time,
            weather_condition: self.condition,
        }
    }
}
