//! Shared application state.

use forecast_core::{
    build_feature_collection, ConflictForecastRequest, ConflictForecastResponse, ConflictScanner,
    FeatureCollection, FeatureOptions,
};

use crate::config::Config;

/// Immutable per-process state shared by all handlers.
pub struct AppState {
    scanner: ConflictScanner,
    feature_options: FeatureOptions,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            scanner: ConflictScanner::new(config.scan),
            feature_options: config.features,
        }
    }

    pub fn scanner(&self) -> &ConflictScanner {
        &self.scanner
    }

    pub fn feature_options(&self) -> &FeatureOptions {
        &self.feature_options
    }

    pub fn forecast(&self, request: &ConflictForecastRequest) -> ConflictForecastResponse {
        self.scanner.forecast(request)
    }

    /// Forecast and render the result together with the request's regions.
    pub fn feature_collection(&self, request: &ConflictForecastRequest) -> FeatureCollection {
        let conflicts = self.scanner.scan(request);
        build_feature_collection(
            self.scanner.geodesy(),
            &conflicts,
            &request.separation_requirements,
            &self.feature_options,
            &mut rand::rng(),
        )
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
