//! Stored locations for the `/api/weather/forecast/{location_id}` endpoint

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::{collections::HashMap, path::Path};
use tracing::info;

use super::Location;

#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Location>>;
}

/// Locations read from a JSON object keyed by location id.
#[derive(Debug, Clone, Default)]
pub struct JsonLocationStore {
    locations: HashMap<String, Location>,
}

impl JsonLocationStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_map(locations: HashMap<String, Location>) -> Self {
        Self { locations }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read locations file {}", path.display()))?;
        let locations: HashMap<String, Location> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid locations file {}", path.display()))?;
        info!(path = %path.display(), count = locations.len(), "loaded locations");
        Ok(Self { locations })
    }
}

#[async_trait]
impl LocationStore for JsonLocationStore {
    async fn get(&self, id: &str) -> Result<Option<Location>> {
        Ok(self.locations.get(id).cloned())
    }
}
