//! Error type for the forecast core.

use thiserror::Error;

use crate::plot::MIN_WAYPOINT_SPACING_MS;

pub type Result<T> = std::result::Result<T, ForecastError>;

#[derive(Debug, Error, PartialEq)]
pub enum ForecastError {
    #[error("trajectory must have at least 2 waypoints, got {0}")]
    TooFewWaypoints(usize),

    #[error(
        "waypoint {index} at {next}ms is not ascending or not at least {}ms after {previous}ms",
        MIN_WAYPOINT_SPACING_MS
    )]
    WaypointSpacing {
        index: usize,
        previous: i64,
        next: i64,
    },

    #[error("unknown region tie-break policy '{0}' (expected 'first' or 'last')")]
    UnknownTieBreak(String),
}
