//! Server configuration from environment.

use std::env;
use std::str::FromStr;

use forecast_core::{FeatureOptions, RegionTieBreak, ScanConfig};
use forecast_core::rules::{DEFAULT_CIRCLE_VERTICES, DEFAULT_SAMPLE_PERIOD_MS};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub scan: ScanConfig,
    pub features: FeatureOptions,
    /// Largest accepted request body
    pub max_body_bytes: usize,
    /// Emit logs as JSON lines instead of the plain formatter
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            scan: ScanConfig::default(),
            features: FeatureOptions::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_json: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Missing or unparseable values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            server_port: parse_var(&lookup, "FORECAST_PORT").unwrap_or(DEFAULT_PORT),
            scan: ScanConfig {
                sample_period_ms: parse_var(&lookup, "FORECAST_SAMPLE_PERIOD_MS")
                    .filter(|period: &i64| *period > 0)
                    .unwrap_or(DEFAULT_SAMPLE_PERIOD_MS),
                tie_break: lookup("FORECAST_REGION_TIE_BREAK")
                    .and_then(|s| s.parse::<RegionTieBreak>().ok())
                    .unwrap_or_default(),
            },
            features: FeatureOptions {
                circle_vertices: parse_var(&lookup, "FORECAST_CIRCLE_VERTICES")
                    .filter(|vertices: &usize| *vertices >= 3)
                    .unwrap_or(DEFAULT_CIRCLE_VERTICES),
            },
            max_body_bytes: parse_var(&lookup, "FORECAST_MAX_BODY_BYTES").unwrap_or(DEFAULT_MAX_BODY_BYTES),
            log_json: lookup("FORECAST_LOG_JSON")
                .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.scan, ScanConfig::default());
        assert_eq!(config.features.circle_vertices, 60);
        assert_eq!(config.max_body_bytes, 8 * 1024 * 1024);
        assert!(!config.log_json);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("FORECAST_PORT", "9000"),
            ("FORECAST_SAMPLE_PERIOD_MS", "1000"),
            ("FORECAST_REGION_TIE_BREAK", "LAST"),
            ("FORECAST_CIRCLE_VERTICES", "24"),
            ("FORECAST_MAX_BODY_BYTES", "1024"),
            ("FORECAST_LOG_JSON", "true"),
        ]);
        assert_eq!(config.server_port, 9000);
        assert_eq!(config.scan.sample_period_ms, 1000);
        assert_eq!(config.scan.tie_break, RegionTieBreak::Last);
        assert_eq!(config.features.circle_vertices, 24);
        assert_eq!(config.max_body_bytes, 1024);
        assert!(config.log_json);
    }

    #[test]
    fn unparseable_values_fall_back() {
        let config = config_from(&[
            ("FORECAST_PORT", "eighty"),
            ("FORECAST_SAMPLE_PERIOD_MS", "-5"),
            ("FORECAST_REGION_TIE_BREAK", "middle"),
            ("FORECAST_CIRCLE_VERTICES", "2"),
            ("FORECAST_LOG_JSON", "maybe"),
        ]);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.scan.sample_period_ms, 5000);
        assert_eq!(config.scan.tie_break, RegionTieBreak::First);
        assert_eq!(config.features.circle_vertices, 60);
        assert!(!config.log_json);
    }
}
