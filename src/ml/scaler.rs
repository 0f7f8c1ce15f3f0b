use serde::{Deserialize, Serialize};

use super::{check_width, ArtifactError, FeatureScaler};

/// Fitted feature scaler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// z-score: `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `(x - min) / (max - min)`
    MinMax { min: Vec<f64>, max: Vec<f64> },
}

impl Scaler {
    /// Both parameter vectors must have the same length.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let (a, b, what) = match self {
            Scaler::Standard { mean, scale } => (mean, scale, "scaler.scale"),
            Scaler::MinMax { min, max } => (min, max, "scaler.max"),
        };
        check_width(what, a.len(), b)
    }

    fn scale_row(&self, row: &[f64]) -> Vec<f64> {
        match self {
            Scaler::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale.iter()))
                .map(|(x, (mean, std))| {
                    if std.abs() < 1e-10 {
                        0.0
                    } else {
                        (x - mean) / std
                    }
                })
                .collect(),
            Scaler::MinMax { min, max } => row
                .iter()
                .zip(min.iter().zip(max.iter()))
                .map(|(x, (min, max))| {
                    if (max - min).abs() < 1e-10 {
                        0.5
                    } else {
                        (x - min) / (max - min)
                    }
                })
                .collect(),
        }
    }
}

impl FeatureScaler for Scaler {
    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ArtifactError> {
        let width = self.n_features();
        rows.iter()
            .map(|row| {
                check_width("feature row", width, row)?;
                Ok(self.scale_row(row))
            })
            .collect()
    }

    fn n_features(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { min, .. } => min.len(),
        }
    }
}
