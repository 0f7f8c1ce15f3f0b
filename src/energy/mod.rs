//! Energy supply/demand forecasting over the historical dataset
//!
//! A request date selects dataset rows, their feature columns are scaled and
//! fed to the supply regressor, and each row becomes one [`ForecastItem`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::ml::ArtifactError;

pub mod dataset;
pub mod features;
pub mod forecaster;

pub use dataset::{Dataset, DatasetError, DatasetRow, FEATURE_COLUMNS};
pub use features::{FeaturePreparer, PreparedBatch};
pub use forecaster::{EnergyForecast, EnergyForecaster, ForecastItem, NO_DATA_MESSAGE};

/// How a requested date is compared against a row's `datetime`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DateMatch {
    /// `datetime` contains the date anywhere. `"2021-05-1"` also selects
    /// `"2021-05-10 ..."`.
    #[default]
    Substring,
    /// The calendar-date part of `datetime` (before the first `T` or space)
    /// equals the date.
    Exact,
}

impl DateMatch {
    pub fn matches(self, datetime: &str, date: &str) -> bool {
        match self {
            DateMatch::Substring => datetime.contains(date),
            DateMatch::Exact => {
                let day = datetime
                    .split(|c: char| c == 'T' || c == ' ')
                    .next()
                    .unwrap_or(datetime);
                day == date
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum EnergyError {
    #[error("supply model failed: {0}")]
    Model(#[from] ArtifactError),

    #[error("supply model returned {actual} predictions for {expected} rows")]
    PredictionCount { expected: usize, actual: usize },
}
