//! Core data models for the conflict forecast system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position on the WGS84 ellipsoid in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Position with an epoch-millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporalGeoPoint {
    pub lon: f64,
    pub lat: f64,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl TemporalGeoPoint {
    pub fn new(lon: f64, lat: f64, timestamp: i64) -> Self {
        Self {
            lon,
            lat,
            timestamp,
        }
    }

    /// Stamp a plain position with a time.
    pub fn at(point: GeoPoint, timestamp: i64) -> Self {
        Self::new(point.lon, point.lat, timestamp)
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }

    /// Timestamp as a UTC date, `None` when outside chrono's range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Planned position and ETO of a trajectory. Unknown JSON fields are ignored.
pub type Waypoint = TemporalGeoPoint;

/// Planned 4-D trajectory of one aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub id: i64,
    pub waypoints: Vec<Waypoint>,
}

/// Separation requirement for a circular region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeparationRequirement {
    /// Center of the circular region
    pub center: GeoPoint,
    /// Radius of the circular region in metres, exclusive
    pub radius: f64,
    /// Required minimum lateral separation in the region in metres
    pub lateral_separation: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictForecastRequest {
    #[serde(default)]
    pub trajectories: Vec<Trajectory>,
    /// Regions earlier in the list have higher priority. Aircraft outside
    /// every region are not separated and never cause a conflict.
    #[serde(default)]
    pub separation_requirements: Vec<SeparationRequirement>,
}

/// Lateral distance between two trajectories at one sample instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AircraftDistancePair {
    pub id1: i64,
    pub id2: i64,
    pub distance: f64,
}

/// Lateral separation breakdown between two trajectories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub trajectory_a: i64,
    /// Position and time of A when the breakdown is first detected
    pub conflict_start_a: TemporalGeoPoint,
    /// Position and time of A at the last sample of the breakdown
    pub conflict_end_a: Option<TemporalGeoPoint>,
    pub trajectory_b: i64,
    pub conflict_start_b: TemporalGeoPoint,
    pub conflict_end_b: Option<TemporalGeoPoint>,
}

impl Conflict {
    pub fn involves(&self, trajectory_id: i64) -> bool {
        self.trajectory_a == trajectory_id || self.trajectory_b == trajectory_id
    }

    /// Detected duration in milliseconds, `None` while the conflict is open.
    pub fn duration_ms(&self) -> Option<i64> {
        self.conflict_end_a
            .map(|end| end.timestamp - self.conflict_start_a.timestamp)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConflictForecastResponse {
    pub conflicts: Vec<Conflict>,
}
