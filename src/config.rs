use anyhow::Result;
use figment::{providers::{Env, Format, Serialized, Toml}, Figment};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};

use crate::energy::DateMatch;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub weather: WeatherConfig,
    pub energy: EnergyConfig,
    pub locations: LocationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout_secs: 60,
            enable_cors: true,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_version: String,
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_version: "v1".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Remote weather prediction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub model_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            model_url: "http://localhost:8501".to_string(),
            timeout_secs: 30,
        }
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyConfig {
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub date_match: DateMatch,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/updated_solar.csv"),
            model_path: PathBuf::from("data/supply_model.json"),
            date_match: DateMatch::Substring,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationsConfig {
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("FG__").split("__"));
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.weather.timeout_secs == 0 {
            anyhow::bail!("weather.timeout_secs must be greater than zero");
        }
        if self.server.request_timeout_secs == 0 {
            anyhow::bail!("server.request_timeout_secs must be greater than zero");
        }
        // Upstream failures must reach the handler before the server gives up.
        if self.server.request_timeout_secs <= self.weather.timeout_secs {
            anyhow::bail!(
                "server.request_timeout_secs ({}) must exceed weather.timeout_secs ({})",
                self.server.request_timeout_secs,
                self.weather.timeout_secs
            );
        }
        Ok(())
    }
}
