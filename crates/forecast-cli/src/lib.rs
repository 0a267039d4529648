//! Forecast CLI - Command line tools for the conflict forecaster.
//!
//! The `forecast` binary runs scans locally, renders GeoJSON, plays back a
//! single trajectory, generates synthetic scenarios and submits requests to a
//! running forecast server.

pub mod client;
pub mod report;
pub mod scenarios;

pub use client::{ApiVersion, ForecastClient};
pub use scenarios::{create_scenario, Scenario, ScenarioKind, ScenarioParams};
