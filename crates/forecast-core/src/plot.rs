//! Continuous trajectory playback.
//!
//! [`TrajectoryPlotGenerator`] steps simulated time forward by arbitrary
//! amounts and produces the aircraft's position, speed and heading at each
//! step. A single large step may cross several waypoints; the generator then
//! relocates directly onto the leg containing the new time.

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::geodesy::{GeodeticCalc, Wgs84Geodesic};
use crate::models::{TemporalGeoPoint, Waypoint};

/// Minimum spacing between consecutive waypoints accepted for playback.
pub const MIN_WAYPOINT_SPACING_MS: i64 = 1_000;

/// One playback sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    pub position: TemporalGeoPoint,
    /// Ground speed on the current leg in metres per second
    pub lateral_speed: f64,
    /// Heading of the current leg in degrees [0, 360)
    pub heading: f64,
}

/// Check that a trajectory can be played back: at least two waypoints in
/// strictly ascending order, each at least [`MIN_WAYPOINT_SPACING_MS`] apart.
pub fn validate_waypoints(waypoints: &[Waypoint]) -> Result<()> {
    if waypoints.len() < 2 {
        return Err(ForecastError::TooFewWaypoints(waypoints.len()));
    }
    for (idx, pair) in waypoints.windows(2).enumerate() {
        if pair[1].timestamp.saturating_sub(pair[0].timestamp) < MIN_WAYPOINT_SPACING_MS {
            return Err(ForecastError::WaypointSpacing {
                index: idx + 1,
                previous: pair[0].timestamp,
                next: pair[1].timestamp,
            });
        }
    }
    Ok(())
}

/// Stateful stepper over one trajectory.
pub struct TrajectoryPlotGenerator<G = Wgs84Geodesic> {
    waypoints: Vec<Waypoint>,
    end_time: i64,
    current_time: i64,
    /// Index of the waypoint starting the current leg
    leg: Option<usize>,
    heading: f64,
    lateral_speed: f64,
    completed: bool,
    geodesy: G,
}

impl TrajectoryPlotGenerator<Wgs84Geodesic> {
    /// Create a generator starting at `start_time` and finishing after `end_time`.
    pub fn new(waypoints: Vec<Waypoint>, start_time: i64, end_time: i64) -> Result<Self> {
        Self::with_geodesy(waypoints, start_time, end_time, Wgs84Geodesic)
    }
}

impl<G: GeodeticCalc> TrajectoryPlotGenerator<G> {
    pub fn with_geodesy(
        waypoints: Vec<Waypoint>,
        start_time: i64,
        end_time: i64,
        geodesy: G,
    ) -> Result<Self> {
        validate_waypoints(&waypoints)?;
        Ok(Self {
            waypoints,
            end_time,
            current_time: start_time,
            leg: None,
            heading: 0.0,
            lateral_speed: 0.0,
            completed: false,
            geodesy,
        })
    }

    /// True once the generator has run past its end time or its last waypoint.
    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn current_time(&self) -> i64 {
        self.current_time
    }

    /// Advance simulated time by `elapsed_ms` and return the sample at the new
    /// time, or `None` before the first waypoint and after completion.
    ///
    /// A step that would overflow the clock completes the generator.
    pub fn next_plot(&mut self, elapsed_ms: i64) -> Option<Plot> {
        if self.completed {
            return None;
        }

        let Some(next_time) = self.current_time.checked_add(elapsed_ms) else {
            tracing::debug!("Playback clock overflow at {} + {}ms", self.current_time, elapsed_ms);
            self.completed = true;
            return None;
        };
        self.current_time = next_time;

        if self.current_time > self.end_time {
            self.completed = true;
            return None;
        }

        if self.current_time < self.waypoints[0].timestamp {
            self.leg = None;
            return None;
        }

        let needs_relocation = match self.leg {
            None => true,
            Some(idx) => {
                self.waypoints[idx + 1].timestamp < self.current_time
                    || self.waypoints[idx].timestamp > self.current_time
            }
        };
        if needs_relocation && !self.relocate_leg() {
            self.completed = true;
            return None;
        }

        let start = self.waypoints[self.leg?];
        let seconds_into_leg = self.current_time.saturating_sub(start.timestamp) as f64 / 1000.0;
        let position = self.geodesy.destination_point(
            start.point(),
            self.heading,
            self.lateral_speed * seconds_into_leg,
        );

        Some(Plot {
            position: TemporalGeoPoint::at(position, self.current_time),
            lateral_speed: self.lateral_speed,
            heading: self.heading,
        })
    }

    /// Samples every `step_ms` until the generator stops producing them.
    /// Yields nothing for a step of zero or less.
    pub fn plots(&mut self, step_ms: i64) -> impl Iterator<Item = Plot> + '_ {
        std::iter::from_fn(move || {
            if step_ms <= 0 {
                return None;
            }
            self.next_plot(step_ms)
        })
    }

    /// Move onto the leg whose end is the first waypoint after the current
    /// time. Returns false when no such leg exists.
    fn relocate_leg(&mut self) -> bool {
        let next = self
            .waypoints
            .iter()
            .position(|wp| wp.timestamp > self.current_time);
        match next {
            Some(idx) if idx > 0 => {
                self.leg = Some(idx - 1);
                self.update_heading_and_speed(idx - 1);
                true
            }
            _ => false,
        }
    }

    fn update_heading_and_speed(&mut self, idx: usize) {
        let start = &self.waypoints[idx];
        let end = &self.waypoints[idx + 1];
        let (heading, lateral_distance) = self
            .geodesy
            .heading_and_distance(start.point(), end.point());
        let leg_seconds = end.timestamp.saturating_sub(start.timestamp) as f64 / 1000.0;
        self.heading = heading;
        self.lateral_speed = lateral_distance / leg_seconds;
    }
}
