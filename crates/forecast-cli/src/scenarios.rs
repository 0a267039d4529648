//! Pre-defined traffic scenarios for exercising the forecaster.

use forecast_core::{
    ConflictForecastRequest, GeoPoint, GeodeticCalc, SeparationRequirement, TemporalGeoPoint,
    Trajectory, Wgs84Geodesic,
};

/// Named scenario shapes selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScenarioKind {
    /// Two aircraft on reciprocal headings through the center
    HeadOn,
    /// West-to-east and south-to-north tracks crossing at the center
    Crossing,
    /// Two eastbound tracks offset north, never closer than the offset
    Parallel,
    /// Four aircraft from the cardinal directions meeting at the center
    Converging,
}

impl ScenarioKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::HeadOn => "head-on",
            Self::Crossing => "crossing",
            Self::Parallel => "parallel",
            Self::Converging => "converging",
        }
    }
}

/// Geometry shared by all scenarios.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioParams {
    pub center: GeoPoint,
    /// Distance from the center to each track's first waypoint
    pub offset_m: f64,
    pub speed_mps: f64,
    /// Epoch milliseconds of every track's first waypoint
    pub start_time: i64,
    /// Track spacing for the parallel scenario
    pub parallel_spacing_m: f64,
    /// Minimum of the single region centered on the scenario
    pub lateral_separation: f64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            center: GeoPoint::new(104.0, 1.35),
            offset_m: 10_000.0,
            speed_mps: 100.0,
            start_time: 1_700_000_000_000,
            parallel_spacing_m: 2_000.0,
            lateral_separation: 1_852.0,
        }
    }
}

/// A named scenario, ready to be submitted.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub request: ConflictForecastRequest,
}

pub fn create_scenario(kind: ScenarioKind, params: &ScenarioParams) -> Scenario {
    let geodesy = Wgs84Geodesic;
    let trajectories = match kind {
        ScenarioKind::HeadOn => vec![
            straight_track(&geodesy, 1, params, params.center, 270.0, 90.0),
            straight_track(&geodesy, 2, params, params.center, 90.0, 270.0),
        ],
        ScenarioKind::Crossing => vec![
            straight_track(&geodesy, 1, params, params.center, 270.0, 90.0),
            straight_track(&geodesy, 2, params, params.center, 180.0, 0.0),
        ],
        ScenarioKind::Parallel => {
            let shifted = geodesy.destination_point(params.center, 0.0, params.parallel_spacing_m);
            vec![
                straight_track(&geodesy, 1, params, params.center, 270.0, 90.0),
                straight_track(&geodesy, 2, params, shifted, 270.0, 90.0),
            ]
        }
        ScenarioKind::Converging => [0.0, 90.0, 180.0, 270.0]
            .iter()
            .enumerate()
            .map(|(i, &bearing)| converging_track(&geodesy, i as i64 + 1, params, bearing))
            .collect(),
    };

    Scenario {
        name: kind.name().to_string(),
        request: ConflictForecastRequest {
            trajectories,
            separation_requirements: vec![SeparationRequirement {
                center: params.center,
                radius: params.offset_m * 2.0,
                lateral_separation: params.lateral_separation,
            }],
        },
    }
}

/// Track entering `offset_m` from `through` on `from_bearing` and leaving the
/// same distance out on `to_bearing`.
fn straight_track(
    geodesy: &Wgs84Geodesic,
    id: i64,
    params: &ScenarioParams,
    through: GeoPoint,
    from_bearing: f64,
    to_bearing: f64,
) -> Trajectory {
    let start = geodesy.destination_point(through, from_bearing, params.offset_m);
    let end = geodesy.destination_point(through, to_bearing, params.offset_m);
    let end_time = params.start_time + leg_ms(params.offset_m * 2.0, params.speed_mps);

    Trajectory {
        id,
        waypoints: vec![
            TemporalGeoPoint::at(start, params.start_time),
            TemporalGeoPoint::at(end, end_time),
        ],
    }
}

fn converging_track(geodesy: &Wgs84Geodesic, id: i64, params: &ScenarioParams, bearing: f64) -> Trajectory {
    let start = geodesy.destination_point(params.center, bearing, params.offset_m);
    let end_time = params.start_time + leg_ms(params.offset_m, params.speed_mps);

    Trajectory {
        id,
        waypoints: vec![
            TemporalGeoPoint::at(start, params.start_time),
            TemporalGeoPoint::at(params.center, end_time),
        ],
    }
}

fn leg_ms(distance_m: f64, speed_mps: f64) -> i64 {
    (distance_m / speed_mps * 1000.0).round() as i64
}
