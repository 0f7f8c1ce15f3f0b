//! Supply regressors that can be loaded from a model artifact.

use serde::{Deserialize, Serialize};

use super::{check_width, ArtifactError, Regressor};

/// Linear regression over the scaled feature row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearRegressionModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressionModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        row.iter()
            .zip(self.coefficients.iter())
            .map(|(f, c)| f * c)
            .sum::<f64>()
            + self.intercept
    }
}

impl Regressor for LinearRegressionModel {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ArtifactError> {
        rows.iter()
            .map(|row| {
                check_width("scaled feature row", self.coefficients.len(), row)?;
                Ok(self.predict_row(row))
            })
            .collect()
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }
}

/// Model section of the artifact file, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SupplyModel {
    Linear(LinearRegressionModel),
}

impl Regressor for SupplyModel {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ArtifactError> {
        match self {
            SupplyModel::Linear(m) => m.predict(rows),
        }
    }

    fn n_features(&self) -> usize {
        match self {
            SupplyModel::Linear(m) => m.n_features(),
        }
    }
}
