//! Scan and rendering parameters for the forecast engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ForecastError;

/// Default cadence of the sampling grid.
pub const DEFAULT_SAMPLE_PERIOD_MS: i64 = 5_000;

/// Default number of vertices used to draw a separation region.
pub const DEFAULT_CIRCLE_VERTICES: usize = 60;

/// Resolution of an exact tie in center distance between two enclosing regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionTieBreak {
    /// The requirement listed first wins.
    #[default]
    First,
    /// The requirement listed last wins.
    Last,
}

impl FromStr for RegionTieBreak {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            other => Err(ForecastError::UnknownTieBreak(other.to_string())),
        }
    }
}

impl fmt::Display for RegionTieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Last => f.write_str("last"),
        }
    }
}

/// Configuration for the conflict scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Spacing of the sampling grid in milliseconds
    pub sample_period_ms: i64,
    /// Region selection on equal center distance
    pub tie_break: RegionTieBreak,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            sample_period_ms: DEFAULT_SAMPLE_PERIOD_MS,
            tie_break: RegionTieBreak::default(),
        }
    }
}

impl ScanConfig {
    /// Grid spacing actually used; non-positive periods fall back to the default.
    pub fn effective_period_ms(&self) -> i64 {
        if self.sample_period_ms > 0 {
            self.sample_period_ms
        } else {
            DEFAULT_SAMPLE_PERIOD_MS
        }
    }
}

/// Configuration for the GeoJSON feature mapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureOptions {
    /// Vertices of the polygon approximating each separation region
    pub circle_vertices: usize,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            circle_vertices: DEFAULT_CIRCLE_VERTICES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tie_break_parses_case_insensitively() {
        assert_eq!("First".parse::<RegionTieBreak>(), Ok(RegionTieBreak::First));
        assert_eq!(" last ".parse::<RegionTieBreak>(), Ok(RegionTieBreak::Last));
        assert_eq!(
            "middle".parse::<RegionTieBreak>(),
            Err(ForecastError::UnknownTieBreak("middle".into()))
        );
    }

    #[test]
    fn non_positive_period_falls_back_to_default() {
        let config = ScanConfig {
            sample_period_ms: 0,
            ..ScanConfig::default()
        };
        assert_eq!(config.effective_period_ms(), DEFAULT_SAMPLE_PERIOD_MS);
        assert_eq!(ScanConfig::default().effective_period_ms(), 5_000);
    }
}
