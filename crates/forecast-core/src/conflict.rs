//! Conflict scan engine.
//!
//! Samples every trajectory on a fixed time grid, measures the lateral distance
//! of each pair present at a sample, selects the governing separation region
//! of each aircraft and merges violations of the applicable minimum into
//! conflict intervals.

use std::collections::HashMap;

use crate::geodesy::{GeodeticCalc, Wgs84Geodesic};
use crate::interpolate::{interpolate_position, sorted_waypoints, TrajectorySample};
use crate::models::{
    AircraftDistancePair, Conflict, ConflictForecastRequest, ConflictForecastResponse, GeoPoint,
    SeparationRequirement, TemporalGeoPoint, Trajectory, Waypoint,
};
use crate::rules::{RegionTieBreak, ScanConfig};

/// A trajectory bracketed by waypoints at the current sample instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveTrajectory {
    pub id: i64,
    pub sample: TrajectorySample,
}

/// Batch conflict forecaster.
///
/// Holds only configuration and a stateless geodesy implementation, so one
/// scanner can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct ConflictScanner<G = Wgs84Geodesic> {
    pub config: ScanConfig,
    geodesy: G,
}

impl ConflictScanner<Wgs84Geodesic> {
    pub fn new(config: ScanConfig) -> Self {
        Self::with_geodesy(config, Wgs84Geodesic)
    }
}

impl Default for ConflictScanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl<G: GeodeticCalc> ConflictScanner<G> {
    pub fn with_geodesy(config: ScanConfig, geodesy: G) -> Self {
        Self { config, geodesy }
    }

    pub fn geodesy(&self) -> &G {
        &self.geodesy
    }

    /// Run the scan and wrap the result for the wire.
    pub fn forecast(&self, request: &ConflictForecastRequest) -> ConflictForecastResponse {
        ConflictForecastResponse {
            conflicts: self.scan(request),
        }
    }

    /// First (inclusive) and last (exclusive) sample instants, each one period
    /// after the earliest and latest waypoint, clamped to `i64::MAX`. `None`
    /// without waypoints.
    pub fn sampling_window(&self, trajectories: &[Trajectory]) -> Option<(i64, i64)> {
        let period = self.config.effective_period_ms();
        let mut timestamps = trajectories
            .iter()
            .flat_map(|trajectory| trajectory.waypoints.iter().map(|wp| wp.timestamp));
        let first = timestamps.next()?;
        let (earliest, latest) = timestamps.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));
        Some((earliest.saturating_add(period), latest.saturating_add(period)))
    }

    /// Detect all conflicts in the request.
    pub fn scan(&self, request: &ConflictForecastRequest) -> Vec<Conflict> {
        let Some((start, end)) = self.sampling_window(&request.trajectories) else {
            tracing::debug!("No waypoints in request, nothing to scan");
            return Vec::new();
        };
        let period = self.config.effective_period_ms();
        tracing::debug!(
            "Scanning {} trajectories against {} regions from {} to {} every {}ms",
            request.trajectories.len(),
            request.separation_requirements.len(),
            start,
            end,
            period
        );

        let trajectories: Vec<(i64, Vec<Waypoint>)> = request
            .trajectories
            .iter()
            .map(|trajectory| (trajectory.id, sorted_waypoints(&trajectory.waypoints)))
            .collect();

        let mut tracker = ConflictTracker::default();
        let mut t = start;
        let mut sample_index: u64 = 0;
        while t < end {
            let active = self.sample_positions(&trajectories, t);
            let pairs = self.distance_pairs(&active);
            let regions = self.assign_regions(&active, &request.separation_requirements);
            let by_id: HashMap<i64, usize> = active
                .iter()
                .enumerate()
                .map(|(idx, trajectory)| (trajectory.id, idx))
                .collect();

            let mut violations = 0usize;
            for pair in &pairs {
                let (Some(&idx1), Some(&idx2)) = (by_id.get(&pair.id1), by_id.get(&pair.id2)) else {
                    continue;
                };
                let required = required_separation(
                    regions[idx1].map(|r| &request.separation_requirements[r]),
                    regions[idx2].map(|r| &request.separation_requirements[r]),
                );
                if !is_violation(pair.distance, required) {
                    continue;
                }
                violations += 1;
                tracker.record(
                    sample_index,
                    pair.id1,
                    active[idx1].sample.current,
                    pair.id2,
                    active[idx2].sample.current,
                );
            }

            tracing::trace!(
                "{}: {} active trajectories, {} pairs, {} violations, {} conflicts so far",
                t,
                active.len(),
                pairs.len(),
                violations,
                tracker.len()
            );

            match t.checked_add(period) {
                Some(next) => t = next,
                None => break,
            }
            sample_index += 1;
        }

        let conflicts = tracker.into_conflicts();
        tracing::debug!("Scan finished with {} conflicts", conflicts.len());
        conflicts
    }

    /// Interpolate every trajectory at `t`. Trajectories without bracketing
    /// waypoints are skipped; a repeated id replaces the earlier entry in place.
    pub fn sample_positions(
        &self,
        trajectories: &[(i64, Vec<Waypoint>)],
        t: i64,
    ) -> Vec<ActiveTrajectory> {
        let mut active: Vec<ActiveTrajectory> = Vec::with_capacity(trajectories.len());
        for (id, waypoints) in trajectories {
            let Some(sample) = interpolate_position(&self.geodesy, waypoints, t) else {
                tracing::trace!("{}: no bracketing waypoints for trajectory {}", t, id);
                continue;
            };
            match active.iter_mut().find(|entry| entry.id == *id) {
                Some(existing) => existing.sample = sample,
                None => active.push(ActiveTrajectory { id: *id, sample }),
            }
        }
        active
    }

    /// Lateral distance of every unordered pair, each computed once. `id1` is
    /// the trajectory listed first.
    pub fn distance_pairs(&self, active: &[ActiveTrajectory]) -> Vec<AircraftDistancePair> {
        let mut pairs = Vec::with_capacity(active.len() * active.len().saturating_sub(1) / 2);
        for (i, first) in active.iter().enumerate() {
            for second in &active[i + 1..] {
                pairs.push(AircraftDistancePair {
                    id1: first.id,
                    id2: second.id,
                    distance: self
                        .geodesy
                        .distance(first.sample.current.point(), second.sample.current.point()),
                });
            }
        }
        pairs
    }

    /// Governing region index for each active trajectory, aligned with `active`.
    pub fn assign_regions(
        &self,
        active: &[ActiveTrajectory],
        requirements: &[SeparationRequirement],
    ) -> Vec<Option<usize>> {
        active
            .iter()
            .map(|trajectory| self.governing_region(trajectory.sample.current.point(), requirements))
            .collect()
    }

    /// Index of the enclosing region whose center is nearest to `position`.
    ///
    /// A region encloses a position when the center distance is strictly less
    /// than its radius. `None` means the position is ungoverned.
    pub fn governing_region(
        &self,
        position: GeoPoint,
        requirements: &[SeparationRequirement],
    ) -> Option<usize> {
        let mut selected: Option<(usize, f64)> = None;
        for (idx, region) in requirements.iter().enumerate() {
            let center_distance = self.geodesy.distance(position, region.center);
            if !(center_distance < region.radius) {
                continue;
            }
            let replace = match selected {
                None => true,
                Some((_, best)) => match self.config.tie_break {
                    RegionTieBreak::First => center_distance < best,
                    RegionTieBreak::Last => center_distance <= best,
                },
            };
            if replace {
                selected = Some((idx, center_distance));
            }
        }
        selected.map(|(idx, _)| idx)
    }
}

/// Minimum separation applying to a pair, `None` when either is ungoverned.
///
/// Under a shared region this is that region's minimum; across regions the
/// larger of the two applies.
pub fn required_separation(
    region_a: Option<&SeparationRequirement>,
    region_b: Option<&SeparationRequirement>,
) -> Option<f64> {
    let (a, b) = (region_a?, region_b?);
    Some(a.lateral_separation.max(b.lateral_separation))
}

fn is_violation(distance: f64, required: Option<f64>) -> bool {
    required.is_some_and(|minimum| minimum > distance)
}

#[derive(Debug, Clone, Copy)]
struct OpenRun {
    index: usize,
    last_sample: u64,
}

/// Merges per-sample violations into conflict records.
///
/// A pair violating at consecutive samples extends one record; a gap of one
/// or more samples starts a new record.
#[derive(Debug, Default)]
struct ConflictTracker {
    conflicts: Vec<Conflict>,
    open: HashMap<(i64, i64), OpenRun>,
}

impl ConflictTracker {
    fn record(
        &mut self,
        sample_index: u64,
        id_a: i64,
        position_a: TemporalGeoPoint,
        id_b: i64,
        position_b: TemporalGeoPoint,
    ) {
        let key = (id_a, id_b);
        if let Some(run) = self.open.get_mut(&key) {
            if run.last_sample + 1 == sample_index {
                let conflict = &mut self.conflicts[run.index];
                conflict.conflict_end_a = Some(position_a);
                conflict.conflict_end_b = Some(position_b);
                run.last_sample = sample_index;
                return;
            }
        }

        self.open.insert(
            key,
            OpenRun {
                index: self.conflicts.len(),
                last_sample: sample_index,
            },
        );
        self.conflicts.push(Conflict {
            trajectory_a: id_a,
            conflict_start_a: position_a,
            conflict_end_a: Some(position_a),
            trajectory_b: id_b,
            conflict_start_b: position_b,
            conflict_end_b: Some(position_b),
        });
    }

    fn len(&self) -> usize {
        self.conflicts.len()
    }

    fn into_conflicts(self) -> Vec<Conflict> {
        self.conflicts
    }
}
