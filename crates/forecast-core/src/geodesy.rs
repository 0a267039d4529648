//! Geodetic primitives shared by the interpolators, the scan engine and the
//! feature mapper.
//!
//! All implementations are stateless and can be shared freely across threads.
//! Headings are compass degrees (0 = north, clockwise) normalized to [0, 360).

use geo::{
    Bearing, Contains, Destination, Distance, Geodesic, Haversine, LineString, Point, Polygon,
};

use crate::models::GeoPoint;

/// Geodetic calculations needed by the forecast engine.
pub trait GeodeticCalc: Send + Sync {
    /// Shortest distance between two points in metres.
    fn distance(&self, from: GeoPoint, to: GeoPoint) -> f64;

    /// Point reached by moving `distance_m` metres from `origin` along `heading_deg`.
    fn destination_point(&self, origin: GeoPoint, heading_deg: f64, distance_m: f64) -> GeoPoint;

    /// Heading in degrees [0, 360) and distance in metres to reach `to` from `from`.
    fn heading_and_distance(&self, from: GeoPoint, to: GeoPoint) -> (f64, f64);

    /// Heading in degrees [0, 360) to reach `to` from `from`.
    fn heading(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        self.heading_and_distance(from, to).0
    }

    /// Returns true if `point` lies strictly inside `ring`.
    fn point_in_polygon(&self, point: GeoPoint, ring: &[GeoPoint]) -> bool {
        point_in_polygon(point, ring)
    }
}

/// Ellipsoidal geodesics on WGS84 (Karney's algorithm via `geo`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Wgs84Geodesic;

impl GeodeticCalc for Wgs84Geodesic {
    fn distance(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        Geodesic::distance(to_point(from), to_point(to))
    }

    fn destination_point(&self, origin: GeoPoint, heading_deg: f64, distance_m: f64) -> GeoPoint {
        if distance_m.abs() <= f64::EPSILON {
            return origin;
        }
        from_point(Geodesic::destination(to_point(origin), heading_deg, distance_m))
    }

    fn heading_and_distance(&self, from: GeoPoint, to: GeoPoint) -> (f64, f64) {
        let (start, end) = (to_point(from), to_point(to));
        let distance = Geodesic::distance(start, end);
        if distance <= f64::EPSILON {
            return (0.0, 0.0);
        }
        (normalize_heading(Geodesic::bearing(start, end)), distance)
    }
}

/// Great-circle calculations on the mean-radius sphere (haversine via `geo`).
///
/// Cheaper than [`Wgs84Geodesic`] and within ~0.5% of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalGeodesic;

impl GeodeticCalc for SphericalGeodesic {
    fn distance(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        Haversine::distance(to_point(from), to_point(to))
    }

    fn destination_point(&self, origin: GeoPoint, heading_deg: f64, distance_m: f64) -> GeoPoint {
        if distance_m.abs() <= f64::EPSILON {
            return origin;
        }
        from_point(Haversine::destination(to_point(origin), heading_deg, distance_m))
    }

    fn heading_and_distance(&self, from: GeoPoint, to: GeoPoint) -> (f64, f64) {
        let (start, end) = (to_point(from), to_point(to));
        let distance = Haversine::distance(start, end);
        if distance <= f64::EPSILON {
            return (0.0, 0.0);
        }
        (normalize_heading(Haversine::bearing(start, end)), distance)
    }
}

/// Wrap any angle in degrees into [0, 360).
pub fn normalize_heading(heading_deg: f64) -> f64 {
    let heading = heading_deg.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360
    if heading >= 360.0 {
        0.0
    } else {
        heading
    }
}

/// Returns true if `point` is inside the closed `ring`.
///
/// The ring is projected into a local east/north plane centred on `point`
/// before the test, so polygons crossing the antimeridian work as expected.
/// Points on the boundary are outside.
pub fn point_in_polygon(point: GeoPoint, ring: &[GeoPoint]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let m_per_deg_lat = meters_per_deg_lat(point.lat);
    let m_per_deg_lon = meters_per_deg_lon(point.lat);
    let exterior: LineString<f64> = ring
        .iter()
        .map(|vertex| {
            let dlon = (vertex.lon - point.lon + 540.0).rem_euclid(360.0) - 180.0;
            (dlon * m_per_deg_lon, (vertex.lat - point.lat) * m_per_deg_lat)
        })
        .collect();

    Polygon::new(exterior, Vec::new()).contains(&Point::new(0.0, 0.0))
}

fn to_point(p: GeoPoint) -> Point<f64> {
    Point::new(p.lon, p.lat)
}

fn from_point(p: Point<f64>) -> GeoPoint {
    GeoPoint::new(p.x(), p.y())
}

/// Meters per degree of latitude at a given latitude (WGS84 approximation).
fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
        - 0.0023 * (6.0 * lat_rad).cos()
}

/// Meters per degree of longitude at a given latitude (WGS84 approximation).
fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos() + 0.118 * (5.0 * lat_rad).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WSSS: GeoPoint = GeoPoint { lon: 104.0, lat: 1.35 };

    #[test]
    fn test_one_degree_of_latitude() {
        let dist = Wgs84Geodesic.distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        // WGS84 meridian arc for the first degree
        assert!((dist - 110_574.0).abs() < 5.0, "got {dist}");

        let spherical = SphericalGeodesic.distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert!((spherical - 111_194.0).abs() < 100.0, "got {spherical}");
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_for_same_point() {
        let points = [
            WSSS,
            GeoPoint::new(103.7, 1.1),
            GeoPoint::new(-117.8265, 33.6846),
            GeoPoint::new(179.9, -45.0),
            GeoPoint::new(-179.9, -45.0),
        ];
        for a in points {
            assert!(Wgs84Geodesic.distance(a, a) < 1e-6);
            for b in points {
                let ab = Wgs84Geodesic.distance(a, b);
                let ba = Wgs84Geodesic.distance(b, a);
                assert!(ab >= 0.0);
                assert!((ab - ba).abs() < 1e-6, "{a:?} {b:?}: {ab} vs {ba}");
            }
        }
    }

    #[test]
    fn test_headings_are_normalized() {
        let origin = GeoPoint::new(0.0, 0.0);
        let cases = [
            (GeoPoint::new(0.0, 0.1), 0.0),
            (GeoPoint::new(0.1, 0.0), 90.0),
            (GeoPoint::new(0.0, -0.1), 180.0),
            (GeoPoint::new(-0.1, 0.0), 270.0),
        ];
        for calc in [&Wgs84Geodesic as &dyn GeodeticCalc, &SphericalGeodesic] {
            for (target, expected) in cases {
                let (heading, distance) = calc.heading_and_distance(origin, target);
                assert!((0.0..360.0).contains(&heading));
                assert!((heading - expected).abs() < 1e-6, "expected {expected}, got {heading}");
                assert!(distance > 11_000.0 && distance < 11_200.0);
            }
        }
    }

    #[test]
    fn test_normalize_heading() {
        assert_eq!(normalize_heading(-90.0), 270.0);
        assert_eq!(normalize_heading(360.0), 0.0);
        assert_eq!(normalize_heading(725.0), 5.0);
        assert_eq!(normalize_heading(-1e-15), 0.0);
    }

    #[test]
    fn test_destination_round_trips_heading_and_distance() {
        for calc in [&Wgs84Geodesic as &dyn GeodeticCalc, &SphericalGeodesic] {
            let target = calc.destination_point(WSSS, 45.0, 10_000.0);
            let (heading, distance) = calc.heading_and_distance(WSSS, target);
            assert!((heading - 45.0).abs() < 1e-6, "got {heading}");
            assert!((distance - 10_000.0).abs() < 1e-3, "got {distance}");

            assert_eq!(calc.destination_point(WSSS, 123.0, 0.0), WSSS);
            assert_eq!(calc.heading_and_distance(WSSS, WSSS), (0.0, 0.0));
        }
    }

    #[test]
    fn test_spherical_tracks_wgs84_closely() {
        let far = GeoPoint::new(151.18, -33.95);
        let ellipsoidal = Wgs84Geodesic.distance(WSSS, far);
        let spherical = SphericalGeodesic.distance(WSSS, far);
        assert!(((spherical - ellipsoidal) / ellipsoidal).abs() < 0.005);

        // Westward headings come back in [0, 360)
        let heading = SphericalGeodesic.heading(WSSS, GeoPoint::new(103.0, 1.0));
        assert!(heading > 180.0 && heading < 360.0, "got {heading}");
    }

    #[test]
    fn test_point_in_polygon() {
        let square = [
            GeoPoint::new(103.9, 1.3),
            GeoPoint::new(104.1, 1.3),
            GeoPoint::new(104.1, 1.4),
            GeoPoint::new(103.9, 1.4),
            GeoPoint::new(103.9, 1.3),
        ];
        assert!(Wgs84Geodesic.point_in_polygon(WSSS, &square));
        assert!(!point_in_polygon(GeoPoint::new(104.2, 1.35), &square));
        assert!(!point_in_polygon(WSSS, &square[..2]));
    }

    #[test]
    fn test_point_in_polygon_across_antimeridian() {
        let ring = [
            GeoPoint::new(179.5, -1.0),
            GeoPoint::new(-179.5, -1.0),
            GeoPoint::new(-179.5, 1.0),
            GeoPoint::new(179.5, 1.0),
            GeoPoint::new(179.5, -1.0),
        ];
        assert!(point_in_polygon(GeoPoint::new(180.0, 0.0), &ring));
        assert!(point_in_polygon(GeoPoint::new(-179.9, 0.5), &ring));
        assert!(!point_in_polygon(GeoPoint::new(178.0, 0.0), &ring));
    }
}
