use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::energy::{Dataset, EnergyForecaster, FEATURE_COLUMNS};
use crate::ml::ModelArtifacts;
use crate::weather::{JsonLocationStore, LocationStore, WeatherService};

/// Everything request handlers need, built once before the server starts.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub energy: Arc<EnergyForecaster>,
    pub weather: Arc<WeatherService>,
    pub locations: Arc<dyn LocationStore>,
}

impl AppState {
    pub fn new(cfg: Config) -> Result<Self> {
        let dataset = Dataset::from_path(&cfg.energy.dataset_path).context("loading energy dataset")?;

        let artifacts =
            ModelArtifacts::load(&cfg.energy.model_path).context("loading supply model")?;
        artifacts
            .validate(&FEATURE_COLUMNS)
            .context("supply model does not match dataset features")?;
        let (scaler, regressor) = artifacts.into_parts();

        let energy = EnergyForecaster::new(
            Arc::new(dataset),
            scaler,
            regressor,
            cfg.energy.date_match,
        );

        let weather = WeatherService::new(cfg.weather.model_url.clone(), cfg.weather.timeout())
            .context("building weather client")?;

        let locations = match &cfg.locations.path {
            Some(path) => JsonLocationStore::load(path)?,
            None => JsonLocationStore::empty(),
        };

        info!(
            date_match = %cfg.energy.date_match,
            model_url = %cfg.weather.model_url,
            "application state ready"
        );

        Ok(Self::from_parts(cfg, energy, weather, Arc::new(locations)))
    }

    pub fn from_parts(
        cfg: Config,
        energy: EnergyForecaster,
        weather: WeatherService,
        locations: Arc<dyn LocationStore>,
    ) -> Self {
        Self {
            cfg: Arc::new(cfg),
            energy: Arc::new(energy),
            weather: Arc::new(weather),
            locations,
        }
    }
}
