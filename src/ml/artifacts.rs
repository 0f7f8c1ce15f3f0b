use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};
use tracing::info;

use super::{ArtifactError, FeatureScaler, Regressor, Scaler, SupplyModel};

/// On-disk supply model: the fitted scaler, the regressor, and the feature
/// order both were trained with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifacts {
    pub feature_names: Vec<String>,
    pub scaler: Scaler,
    pub model: SupplyModel,
}

impl ModelArtifacts {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifacts: Self = serde_json::from_str(&raw)?;
        info!(
            path = %path.display(),
            features = artifacts.feature_names.len(),
            "loaded supply model artifacts"
        );
        Ok(artifacts)
    }

    /// Rejects artifacts whose feature order or vector widths disagree with
    /// the columns the dataset hands over.
    pub fn validate(&self, expected: &[&str]) -> Result<(), ArtifactError> {
        if self.feature_names.iter().map(String::as_str).ne(expected.iter().copied()) {
            return Err(ArtifactError::FeatureOrder {
                expected: expected.iter().map(|s| s.to_string()).collect(),
                actual: self.feature_names.clone(),
            });
        }
        self.scaler.validate()?;
        if self.scaler.n_features() != expected.len() {
            return Err(ArtifactError::ShapeMismatch {
                what: "scaler",
                expected: expected.len(),
                actual: self.scaler.n_features(),
            });
        }
        if self.model.n_features() != expected.len() {
            return Err(ArtifactError::ShapeMismatch {
                what: "model",
                expected: expected.len(),
                actual: self.model.n_features(),
            });
        }
        Ok(())
    }

    pub fn into_parts(self) -> (Arc<dyn FeatureScaler>, Arc<dyn Regressor>) {
        (Arc::new(self.scaler), Arc::new(self.model))
    }
}
