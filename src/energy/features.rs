//! Feature preparation for the supply regressor

use std::sync::Arc;
use tracing::debug;

use super::{Dataset, DatasetRow, DateMatch};
use crate::ml::{ArtifactError, FeatureScaler};

/// Scaled model input together with the rows it was taken from.
/// `scaled[i]` belongs to `rows[i]`.
#[derive(Debug)]
pub struct PreparedBatch<'a> {
    pub scaled: Vec<Vec<f64>>,
    pub rows: Vec<&'a DatasetRow>,
}

pub struct FeaturePreparer {
    dataset: Arc<Dataset>,
    scaler: Arc<dyn FeatureScaler>,
    date_match: DateMatch,
}

impl FeaturePreparer {
    pub fn new(dataset: Arc<Dataset>, scaler: Arc<dyn FeatureScaler>, date_match: DateMatch) -> Self {
        Self {
            dataset,
            scaler,
            date_match,
        }
    }

    /// Selects the rows for `date` and scales their feature columns.
    ///
    /// `Ok(None)` means no row matched; it is not an error.
    pub fn prepare(&self, date: &str) -> Result<Option<PreparedBatch<'_>>, ArtifactError> {
        let rows = self.dataset.matching(date, self.date_match);
        debug!(date, mode = %self.date_match, matched = rows.len(), "filtered dataset");

        if rows.is_empty() {
            return Ok(None);
        }

        let raw: Vec<Vec<f64>> = rows.iter().map(|row| row.feature_vector()).collect();
        let scaled = self.scaler.transform(&raw)?;

        Ok(Some(PreparedBatch { scaled, rows }))
    }
}
