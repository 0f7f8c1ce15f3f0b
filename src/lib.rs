//! Forecast Gateway
//!
//! HTTP API for two independent forecast pipelines:
//! - energy: dataset rows for a date -> scaled features -> supply model ->
//!   per-timestamp supply, demand and renewable share
//! - weather: observed conditions -> remote prediction service ->
//!   current/hourly/daily records plus derived alerts

pub mod api;
pub mod config;
pub mod energy;
pub mod ml;
pub mod state;
pub mod telemetry;
pub mod weather;
