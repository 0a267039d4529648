//! Conflict forecasting for planned 4-D trajectories.
//!
//! Interpolates aircraft positions from sparse waypoints, scans all pairs on a
//! fixed time grid against prioritized circular separation regions, and merges
//! the violations into conflict intervals.

pub mod conflict;
pub mod error;
pub mod features;
pub mod geodesy;
pub mod interpolate;
pub mod models;
pub mod plot;
pub mod rules;

pub use conflict::{required_separation, ActiveTrajectory, ConflictScanner};
pub use error::{ForecastError, Result};
pub use features::{build_feature_collection, circle_ring, Feature, FeatureCollection, Geometry};
pub use geodesy::{normalize_heading, point_in_polygon, GeodeticCalc, SphericalGeodesic, Wgs84Geodesic};
pub use interpolate::{bracket, interpolate_position, sorted_waypoints, TrajectorySample};
pub use models::{
    AircraftDistancePair, Conflict, ConflictForecastRequest, ConflictForecastResponse, GeoPoint,
    SeparationRequirement, TemporalGeoPoint, Trajectory, Waypoint,
};
pub use plot::{validate_waypoints, Plot, TrajectoryPlotGenerator, MIN_WAYPOINT_SPACING_MS};
pub use rules::{FeatureOptions, RegionTieBreak, ScanConfig};
