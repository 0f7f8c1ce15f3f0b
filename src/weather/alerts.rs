//! Human-readable alerts derived from the current and hourly forecast.

use super::WeatherForecast;

pub const HIGH_TEMPERATURE_ALERT: &str =
    "High temperature alert: Stay hydrated and avoid prolonged sun exposure";
pub const FREEZING_ALERT: &str = "Freezing temperature alert: Risk of ice formation";
pub const PRECIPITATION_ALERT: &str = "High precipitation probability in next 6 hours";

const HIGH_TEMPERATURE_C: f64 = 35.0;
const FREEZING_C: f64 = 0.0;
const PRECIPITATION_THRESHOLD: f64 = 0.7;
const PRECIPITATION_WINDOW_HOURS: usize = 6;
const EXTREME_CONDITIONS: [&str; 3] = ["storm", "thunderstorm", "heavy rain"];

/// Rules are checked in order (temperature, precipitation, condition); each
/// fires at most once.
pub fn derive_alerts(current: &WeatherForecast, hourly: &[WeatherForecast]) -> Vec<String> {
    let mut alerts = Vec::new();

    if current.temperature > HIGH_TEMPERATURE_C {
        alerts.push(HIGH_TEMPERATURE_ALERT.to_string());
    } else if current.temperature < FREEZING_C {
        alerts.push(FREEZING_ALERT.to_string());
    }

    if hourly
        .iter()
        .take(PRECIPITATION_WINDOW_HOURS)
        .any(|h| h.precipitation_probability > PRECIPITATION_THRESHOLD)
    {
        alerts.push(PRECIPITATION_ALERT.to_string());
    }

    let condition = current.weather_condition.to_lowercase();
    if EXTREME_CONDITIONS.contains(&condition.as_str()) {
        alerts.push(format!("Extreme weather alert: {}", current.weather_condition));
    }

    alerts
}
