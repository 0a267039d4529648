//! GeoJSON rendering of conflicts and separation regions.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::geodesy::GeodeticCalc;
use crate::models::{Conflict, GeoPoint, SeparationRequirement, TemporalGeoPoint};
use crate::rules::FeatureOptions;

const MIN_RING_VERTICES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry,
            properties,
        }
    }
}

/// Geometry with `[lon, lat]` positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    LineString(Vec<[f64; 2]>),
    Polygon(Vec<Vec<[f64; 2]>>),
}

/// Render conflicts as paired line strings and requirements as circles.
///
/// Both lines of a conflict share one random stroke color drawn from `rng`.
pub fn build_feature_collection<G, R>(
    geodesy: &G,
    conflicts: &[Conflict],
    requirements: &[SeparationRequirement],
    options: &FeatureOptions,
    rng: &mut R,
) -> FeatureCollection
where
    G: GeodeticCalc + ?Sized,
    R: Rng,
{
    let mut features = Vec::with_capacity(conflicts.len() * 2 + requirements.len());

    for conflict in conflicts {
        let stroke = format!(
            "rgb({}, {}, {})",
            rng.random_range(0..256u16),
            rng.random_range(0..256u16),
            rng.random_range(0..256u16)
        );
        features.push(trajectory_line(
            "Trajectory A",
            conflict.trajectory_a,
            &conflict.conflict_start_a,
            conflict.conflict_end_a.as_ref(),
            &stroke,
        ));
        features.push(trajectory_line(
            "Trajectory B",
            conflict.trajectory_b,
            &conflict.conflict_start_b,
            conflict.conflict_end_b.as_ref(),
            &stroke,
        ));
    }

    for requirement in requirements {
        features.push(region_polygon(geodesy, requirement, options.circle_vertices));
    }

    FeatureCollection::new(features)
}

fn trajectory_line(
    name: &str,
    trajectory_id: i64,
    start: &TemporalGeoPoint,
    end: Option<&TemporalGeoPoint>,
    stroke: &str,
) -> Feature {
    let last = end.unwrap_or(start);
    let mut properties = Map::new();
    properties.insert("name".into(), json!(name));
    properties.insert("trajectoryId".into(), json!(trajectory_id));
    properties.insert("startTime".into(), json!(start.timestamp));
    if let Some(end) = end {
        properties.insert("endTime".into(), json!(end.timestamp));
    }
    properties.insert("stroke".into(), json!(stroke));
    properties.insert("stroke-width".into(), json!(2));
    properties.insert("stroke-opacity".into(), json!(1));

    Feature::new(
        Geometry::LineString(vec![[start.lon, start.lat], [last.lon, last.lat]]),
        properties,
    )
}

fn region_polygon<G: GeodeticCalc + ?Sized>(
    geodesy: &G,
    requirement: &SeparationRequirement,
    vertices: usize,
) -> Feature {
    let ring = circle_ring(geodesy, requirement.center, requirement.radius, vertices)
        .into_iter()
        .map(|point| [point.lon, point.lat])
        .collect();

    let mut properties = Map::new();
    properties.insert("radius".into(), json!(requirement.radius));
    properties.insert("lateralSeparation".into(), json!(requirement.lateral_separation));

    Feature::new(Geometry::Polygon(vec![ring]), properties)
}

/// Closed ring of `vertices` points at `radius` metres around `center`,
/// clockwise from north. The first point is repeated at the end.
pub fn circle_ring<G: GeodeticCalc + ?Sized>(
    geodesy: &G,
    center: GeoPoint,
    radius: f64,
    vertices: usize,
) -> Vec<GeoPoint> {
    let vertices = vertices.max(MIN_RING_VERTICES);
    let step = 360.0 / vertices as f64;
    let mut ring: Vec<GeoPoint> = (0..vertices)
        .map(|i| geodesy.destination_point(center, step * i as f64, radius))
        .collect();
    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::{point_in_polygon, Wgs84Geodesic};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn conflict(end: Option<TemporalGeoPoint>) -> Conflict {
        Conflict {
            trajectory_a: 7,
            conflict_start_a: TemporalGeoPoint::new(103.9, 1.3, 5_000),
            conflict_end_a: end,
            trajectory_b: 9,
            conflict_start_b: TemporalGeoPoint::new(103.91, 1.3, 5_000),
            conflict_end_b: end.map(|p| TemporalGeoPoint::new(p.lon + 0.01, p.lat, p.timestamp)),
        }
    }

    fn requirement() -> SeparationRequirement {
        SeparationRequirement {
            center: GeoPoint::new(104.0, 1.35),
            radius: 20_000.0,
            lateral_separation: 1_000.0,
        }
    }

    #[test]
    fn test_feature_counts() {
        let mut rng = StdRng::seed_from_u64(42);
        let conflicts = vec![conflict(Some(TemporalGeoPoint::new(103.95, 1.3, 20_000))); 3];
        let collection = build_feature_collection(
            &Wgs84Geodesic,
            &conflicts,
            &[requirement(), requirement()],
            &FeatureOptions::default(),
            &mut rng,
        );
        assert_eq!(collection.kind, "FeatureCollection");
        assert_eq!(collection.features.len(), 8);
        let polygons = collection
            .features
            .iter()
            .filter(|f| matches!(f.geometry, Geometry::Polygon(_)))
            .count();
        assert_eq!(polygons, 2);
    }

    #[test]
    fn test_conflict_lines_share_stroke() {
        let mut rng = StdRng::seed_from_u64(7);
        let collection = build_feature_collection(
            &Wgs84Geodesic,
            &[conflict(Some(TemporalGeoPoint::new(103.95, 1.3, 20_000)))],
            &[],
            &FeatureOptions::default(),
            &mut rng,
        );
        let a = &collection.features[0];
        let b = &collection.features[1];
        assert_eq!(a.properties["name"], "Trajectory A");
        assert_eq!(b.properties["name"], "Trajectory B");
        assert_eq!(a.properties["trajectoryId"], 7);
        assert_eq!(b.properties["trajectoryId"], 9);
        assert_eq!(a.properties["startTime"], 5_000);
        assert_eq!(a.properties["endTime"], 20_000);
        assert_eq!(a.properties["stroke"], b.properties["stroke"]);
        assert!(a.properties["stroke"].as_str().unwrap().starts_with("rgb("));
        assert_eq!(a.properties["stroke-width"], 2);
        assert_eq!(
            a.geometry,
            Geometry::LineString(vec![[103.9, 1.3], [103.95, 1.3]])
        );
    }

    #[test]
    fn test_open_conflict_line_collapses_to_start() {
        let mut rng = StdRng::seed_from_u64(1);
        let collection = build_feature_collection(
            &Wgs84Geodesic,
            &[conflict(None)],
            &[],
            &FeatureOptions::default(),
            &mut rng,
        );
        let line = &collection.features[0];
        assert!(!line.properties.contains_key("endTime"));
        assert_eq!(line.geometry, Geometry::LineString(vec![[103.9, 1.3], [103.9, 1.3]]));
    }

    #[test]
    fn test_circle_ring_is_closed_at_radius() {
        let center = GeoPoint::new(104.0, 1.35);
        let ring = circle_ring(&Wgs84Geodesic, center, 5_000.0, 60);
        assert_eq!(ring.len(), 61);
        assert_eq!(ring.first(), ring.last());
        for point in &ring {
            assert!((Wgs84Geodesic.distance(center, *point) - 5_000.0).abs() < 0.01);
        }
        assert!(point_in_polygon(center, &ring));
        assert!(!point_in_polygon(GeoPoint::new(104.1, 1.35), &ring));
        // Degenerate vertex counts still produce a polygon
        assert_eq!(circle_ring(&Wgs84Geodesic, center, 5_000.0, 1).len(), 4);
    }

    #[test]
    fn test_geojson_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        let collection = build_feature_collection(
            &Wgs84Geodesic,
            &[],
            &[requirement()],
            &FeatureOptions { circle_vertices: 8 },
            &mut rng,
        );
        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["type"], "Feature");
        assert_eq!(value["features"][0]["geometry"]["type"], "Polygon");
        assert_eq!(
            value["features"][0]["geometry"]["coordinates"][0]
                .as_array()
                .map(Vec::len),
            Some(9)
        );
        assert_eq!(value["features"][0]["properties"]["lateralSeparation"], 1_000.0);
    }
}
