use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use super::{Dataset, DateMatch, EnergyError, FeaturePreparer};
use crate::ml::{FeatureScaler, Regressor};

pub const NO_DATA_MESSAGE: &str = "No data available for the given date.";

/// Forecast for one dataset timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastItem {
    pub timestamp: String,
    pub forecasted_supply_kw: f64,
    pub forecasted_demand_kw: Option<f64>,
    #[serde(rename = "renewable_energy_%")]
    pub renewable_energy_percent: f64,
}

/// Either the per-timestamp items or the structured "no data" payload.
/// Both are successful responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnergyForecast {
    Items(Vec<ForecastItem>),
    NoData { error: &'static str },
}

impl EnergyForecast {
    pub fn no_data() -> Self {
        EnergyForecast::NoData {
            error: NO_DATA_MESSAGE,
        }
    }
}

/// Two decimal places, exact ties to even.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Solar share of demand in percent; 0 when demand is zero or unknown.
pub fn renewable_share(solar: Option<f64>, load: Option<f64>) -> f64 {
    match (solar, load) {
        (Some(solar), Some(load)) if load != 0.0 => {
            let share = 100.0 * solar / load;
            if share.is_finite() {
                share
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

pub struct EnergyForecaster {
    preparer: FeaturePreparer,
    regressor: Arc<dyn Regressor>,
}

impl EnergyForecaster {
    pub fn new(
        dataset: Arc<Dataset>,
        scaler: Arc<dyn FeatureScaler>,
        regressor: Arc<dyn Regressor>,
        date_match: DateMatch,
    ) -> Self {
        Self {
            preparer: FeaturePreparer::new(dataset, scaler, date_match),
            regressor,
        }
    }

    pub fn forecast(&self, date: &str) -> Result<EnergyForecast, EnergyError> {
        let Some(batch) = self.preparer.prepare(date)? else {
            info!(date, "no dataset rows for requested date");
            return Ok(EnergyForecast::no_data());
        };

        let supply = self.regressor.predict(&batch.scaled)?;
        if supply.len() != batch.rows.len() {
            return Err(EnergyError::PredictionCount {
                expected: batch.rows.len(),
                actual: supply.len(),
            });
        }

        let items: Vec<ForecastItem> = batch
            .rows
            .iter()
            .zip(supply)
            .map(|(row, supply_kw)| ForecastItem {
                timestamp: row.datetime.clone(),
                forecasted_supply_kw: round2(supply_kw),
                forecasted_demand_kw: row.load_actual.map(round2),
                renewable_energy_percent: round2(renewable_share(
                    row.solar_generation_actual,
                    row.load_actual,
                )),
            })
            .collect();

        debug!(date, items = items.len(), "energy forecast assembled");
        Ok(EnergyForecast::Items(items))
    }
}
