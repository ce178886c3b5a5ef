//! Great-circle distance and spatial-grid cell arithmetic.

use geo::Point;

use crate::{DLAT, DLON};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance in metres between two WGS-84 points
/// (`x` = longitude, `y` = latitude).
pub fn haversine_m(a: Point<f64>, b: Point<f64>) -> f64 {
    let phi1 = a.y().to_radians();
    let phi2 = b.y().to_radians();
    let dphi = (b.y() - a.y()).to_radians();
    let dlambda = (b.x() - a.x()).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Grid cell containing a coordinate.
pub fn cell_for(lat: f64, lon: f64) -> (i32, i32) {
    ((lat / DLAT).floor() as i32, (lon / DLON).floor() as i32)
}

/// Arithmetic midpoint of a point set. Used only to bias tie-breaking, so
/// the flat-earth average is good enough at query scale.
pub fn midpoint(points: &[Point<f64>]) -> Point<f64> {
    if points.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let n = points.len() as f64;
    let x: f64 = points.iter().map(|p| p.x()).sum();
    let y: f64 = points.iter().map(|p| p.y()).sum();
    Point::new(x / n, y / n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance() {
        let p = Point::new(13.405, 52.52);
        assert!(haversine_m(p, p) < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = Point::new(13.0, 52.0);
        let b = Point::new(13.0, 53.0);
        let d = haversine_m(a, b);
        // pi / 180 * R
        assert!((d - 111_194.9).abs() < 1.0, "got {d}");
    }

    #[test]
    fn cell_floor_handles_negatives() {
        assert_eq!(cell_for(0.0, 0.0), (0, 0));
        assert_eq!(cell_for(0.009, 0.015), (2, 2));
        assert_eq!(cell_for(-0.001, -0.001), (-1, -1));
    }

    #[test]
    fn midpoint_averages() {
        let mid = midpoint(&[Point::new(0.0, 0.0), Point::new(2.0, 4.0)]);
        assert_eq!((mid.x(), mid.y()), (1.0, 2.0));
    }
}
