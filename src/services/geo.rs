//! Great-circle geometry helpers.
//!
//! Bearings follow the compass convention used throughout the pipeline:
//! degrees clockwise from north, normalized to [0, 360).

/// A geographic point in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Forward azimuth from `from` to `to` along the great-circle path,
/// in degrees [0, 360).
///
/// Identical points yield 0° — `atan2(0, 0)` is defined as 0 by convention,
/// which is the accepted degenerate case rather than an error.
pub fn bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlng = (to.lng - from.lng).to_radians();

    let x = dlng.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();

    x.atan2(y).to_degrees().rem_euclid(360.0)
}

/// Shortest arc (0–180°) between two bearings.
pub fn angular_diff(a: f64, b: f64) -> f64 {
    ((a - b + 180.0).rem_euclid(360.0) - 180.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint { lat, lng }
    }

    #[test]
    fn test_bearing_due_north() {
        let b = bearing(p(0.0, 0.0), p(1.0, 0.0));
        assert!((b - 0.0).abs() < 0.5, "bearing={}", b);
    }

    #[test]
    fn test_bearing_due_east() {
        let b = bearing(p(0.0, 0.0), p(0.0, 1.0));
        assert!((b - 90.0).abs() < 0.5, "bearing={}", b);
    }

    #[test]
    fn test_bearing_due_south() {
        let b = bearing(p(1.0, 0.0), p(0.0, 0.0));
        assert!((b - 180.0).abs() < 0.5, "bearing={}", b);
    }

    #[test]
    fn test_bearing_due_west() {
        let b = bearing(p(0.0, 1.0), p(0.0, 0.0));
        assert!((b - 270.0).abs() < 0.5, "bearing={}", b);
    }

    #[test]
    fn test_bearing_northeast_quadrant() {
        let b = bearing(p(0.0, 0.0), p(1.0, 1.0));
        assert!(b > 0.0 && b < 90.0, "bearing={}", b);
    }

    #[test]
    fn test_bearing_always_in_range() {
        let pairs = [
            (p(51.5, -0.1), p(48.8, 2.3)),      // London → Paris
            (p(40.7, -74.0), p(34.0, -118.2)),  // NYC → LA
            (p(-33.9, 151.2), p(1.3, 103.8)),   // Sydney → Singapore
        ];
        for (from, to) in pairs {
            let b = bearing(from, to);
            assert!((0.0..360.0).contains(&b), "bearing out of range: {}", b);
        }
    }

    #[test]
    fn test_bearing_identical_points_is_zero() {
        assert_eq!(bearing(p(40.0, -74.0), p(40.0, -74.0)), 0.0);
    }

    #[test]
    fn test_angular_diff_basic() {
        assert!((angular_diff(10.0, 90.0) - 80.0).abs() < 1e-9);
        assert!((angular_diff(90.0, 10.0) - 80.0).abs() < 1e-9);
        assert!((angular_diff(0.0, 0.0)).abs() < 1e-9);
    }

    #[test]
    fn test_angular_diff_wraps_around_north() {
        assert!((angular_diff(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((angular_diff(10.0, 350.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_angular_diff_never_exceeds_half_turn() {
        for a in [0.0, 45.0, 123.4, 180.0, 270.0, 359.9] {
            for b in [0.0, 90.0, 180.0, 269.5, 355.0] {
                let d = angular_diff(a, b);
                assert!((0.0..=180.0).contains(&d), "diff({}, {}) = {}", a, b, d);
            }
        }
    }
}
