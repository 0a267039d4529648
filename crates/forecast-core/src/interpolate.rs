//! Position interpolation between bracketing waypoints.
//!
//! Within a leg the aircraft is assumed to hold a constant heading and ground
//! speed, so the position at `t` lies on the geodesic from the earlier waypoint
//! towards the later one, at the fraction of the leg's duration already flown.

use crate::geodesy::GeodeticCalc;
use crate::models::{TemporalGeoPoint, Waypoint};

/// Interpolated position of a trajectory at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    /// Latest waypoint at or before the instant
    pub before: Waypoint,
    /// Interpolated position, stamped with the instant
    pub current: TemporalGeoPoint,
}

/// Copy of `waypoints` in ascending timestamp order.
pub fn sorted_waypoints(waypoints: &[Waypoint]) -> Vec<Waypoint> {
    let mut sorted = waypoints.to_vec();
    sorted.sort_by_key(|wp| wp.timestamp);
    sorted
}

/// Waypoints bracketing `t`: the latest with timestamp <= `t` and the earliest
/// with timestamp > `t`. `waypoints` must be sorted by timestamp.
pub fn bracket(waypoints: &[Waypoint], t: i64) -> Option<(Waypoint, Waypoint)> {
    let idx = waypoints.partition_point(|wp| wp.timestamp <= t);
    if idx == 0 {
        return None;
    }
    let after = waypoints.get(idx)?;
    Some((waypoints[idx - 1], *after))
}

/// Position of a trajectory at `t`, or `None` when `t` is not bracketed by two
/// waypoints. `waypoints` must be sorted by timestamp.
pub fn interpolate_position<G: GeodeticCalc + ?Sized>(
    geodesy: &G,
    waypoints: &[Waypoint],
    t: i64,
) -> Option<TrajectorySample> {
    let (before, after) = bracket(waypoints, t)?;
    Some(TrajectorySample {
        before,
        current: interpolate_between(geodesy, &before, &after, t),
    })
}

/// Position at `t` on the leg `before` -> `after`.
pub fn interpolate_between<G: GeodeticCalc + ?Sized>(
    geodesy: &G,
    before: &Waypoint,
    after: &Waypoint,
    t: i64,
) -> TemporalGeoPoint {
    let (heading, leg_distance) = geodesy.heading_and_distance(before.point(), after.point());
    let progress = leg_progress(before.timestamp, after.timestamp, t);
    let position = geodesy.destination_point(before.point(), heading, leg_distance * progress);
    TemporalGeoPoint::at(position, t)
}

fn leg_progress(start: i64, end: i64, t: i64) -> f64 {
    // i128 keeps spans across the whole i64 range exact
    let span = i128::from(end) - i128::from(start);
    if span <= 0 {
        return 0.0;
    }
    (i128::from(t) - i128::from(start)) as f64 / span as f64
}
