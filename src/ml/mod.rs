//! Supply model artifacts
//!
//! The energy pipeline treats the trained regressor and its fitted feature
//! scaler as external collaborators. This module defines the two seams
//! ([`FeatureScaler`], [`Regressor`]) and the concrete artifact format that is
//! loaded once at startup:
//! - Standard (z-score) or min-max scaling, fitted offline
//! - Linear supply regressor over the scaled feature matrix

use std::path::PathBuf;
use thiserror::Error;

pub mod artifacts;
pub mod models;
pub mod scaler;

pub use artifacts::ModelArtifacts;
pub use models::{LinearRegressionModel, SupplyModel};
pub use scaler::Scaler;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{what} has {actual} values, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("feature order mismatch: expected {expected:?}, got {actual:?}")]
    FeatureOrder {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

/// Maps raw feature rows onto the normalized space the regressor was trained in.
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ArtifactError>;

    fn n_features(&self) -> usize;
}

/// Predicts one supply value per scaled feature row, in row order.
#[cfg_attr(test, mockall::automock)]
pub trait Regressor: Send + Sync {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ArtifactError>;

    fn n_features(&self) -> usize;
}

pub(crate) fn check_width(
    what: &'static str,
    expected: usize,
    row: &[f64],
) -> Result<(), ArtifactError> {
    if row.len() != expected {
        return Err(ArtifactError::ShapeMismatch {
            what,
            expected,
            actual: row.len(),
        });
    }
    Ok(())
}
