//! Historical dataset loading
//!
//! The dataset is read once at startup and never mutated afterwards. Empty
//! cells are forward-filled column by column in file order; a cell with no
//! earlier value in its column stays missing.

use std::{io, path::Path};
use thiserror::Error;
use tracing::info;

use super::DateMatch;

/// Model input columns, in the order the regressor was trained with.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "hour_sin",
    "hour_cos",
    "dayofyear_sin",
    "dayofyear_cos",
    "DE_ALLSKY_SFC_SW_DNI",
    "DE_T2M",
    "DE_RH2M",
    "DE_PRECTOTCORR",
    "DE_PS",
];

pub const DATETIME_COLUMN: &str = "datetime";
pub const LOAD_COLUMN: &str = "DE_load_actual_entsoe_transparency";
pub const SOLAR_COLUMN: &str = "DE_solar_generation_actual";

const MISSING_MARKERS: [&str; 5] = ["", "nan", "NaN", "NA", "null"];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset {}: {source}", path.display())]
    Open {
        path: std::path::PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: column '{column}' has non-numeric value '{value}'")]
    BadNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// One historical hour
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    pub datetime: String,
    /// Values of [`FEATURE_COLUMNS`], same order
    pub features: [Option<f64>; 9],
    pub load_actual: Option<f64>,
    pub solar_generation_actual: Option<f64>,
}

impl DatasetRow {
    /// Feature vector for the scaler. Missing values become `NaN`.
    pub fn feature_vector(&self) -> Vec<f64> {
        self.features.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<DatasetRow>,
}

struct ColumnIndex {
    datetime: usize,
    features: [usize; 9],
    load: usize,
    solar: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DatasetError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(DatasetError::MissingColumn(name))
        };

        let mut features = [0usize; 9];
        for (slot, name) in features.iter_mut().zip(FEATURE_COLUMNS) {
            *slot = find(name)?;
        }

        Ok(Self {
            datetime: find(DATETIME_COLUMN)?,
            features,
            load: find(LOAD_COLUMN)?,
            solar: find(SOLAR_COLUMN)?,
        })
    }
}

fn parse_cell(
    record: &csv::StringRecord,
    idx: usize,
    column: &'static str,
) -> Result<Option<f64>, DatasetError> {
    let raw = record.get(idx).unwrap_or("").trim();
    if MISSING_MARKERS.contains(&raw) {
        return Ok(None);
    }
    raw.parse::<f64>().map(Some).map_err(|_| DatasetError::BadNumber {
        line: record.position().map(|p| p.line()).unwrap_or(0),
        column,
        value: raw.to_string(),
    })
}

impl Dataset {
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path).map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(file)?;
        info!(path = %path.display(), rows = dataset.len(), "loaded energy dataset");
        Ok(dataset)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let columns = ColumnIndex::resolve(csv.headers()?)?;

        let mut rows = Vec::new();
        let mut last_datetime: Option<String> = None;
        let mut last_features: [Option<f64>; 9] = [None; 9];
        let mut last_load: Option<f64> = None;
        let mut last_solar: Option<f64> = None;

        for record in csv.records() {
            let record = record?;

            let datetime = record
                .get(columns.datetime)
                .map(str::trim)
                .filter(|s| !MISSING_MARKERS.contains(s))
                .map(str::to_string)
                .or_else(|| last_datetime.clone());
            last_datetime = datetime.clone();

            let mut features = [None; 9];
            for (i, (idx, name)) in columns.features.iter().zip(FEATURE_COLUMNS).enumerate() {
                features[i] = parse_cell(&record, *idx, name)?.or(last_features[i]);
            }
            last_features = features;

            let load_actual = parse_cell(&record, columns.load, LOAD_COLUMN)?.or(last_load);
            last_load = load_actual;
            let solar_generation_actual =
                parse_cell(&record, columns.solar, SOLAR_COLUMN)?.or(last_solar);
            last_solar = solar_generation_actual;

            rows.push(DatasetRow {
                datetime: datetime.unwrap_or_default(),
                features,
                load_actual,
                solar_generation_actual,
            });
        }

        Ok(Self { rows })
    }

    /// Wraps rows as-is, without forward filling.
    pub fn from_rows(rows: Vec<DatasetRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    /// Rows whose `datetime` matches `date`, in file order.
    pub fn matching(&self, date: &str, mode: DateMatch) -> Vec<&DatasetRow> {
        self.rows
            .iter()
            .filter(|row| mode.matches(&row.datetime, date))
            .collect()
    }
}
