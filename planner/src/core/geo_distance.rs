//! Great-circle distances on a spherical earth.

use crate::config::constants::EARTH_RADIUS_M;
use crate::data::poi::GeoPoint;

/// Haversine distance between two points, in meters.
///
/// Total over finite input: `h` stays within `[0, 1]` so `atan2` never sees an
/// invalid domain. NaN coordinates yield a NaN distance.
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let sin_phi = (d_phi / 2.0).sin();
    let sin_lambda = (d_lambda / 2.0).sin();

    let h = sin_phi * sin_phi + phi1.cos() * phi2.cos() * sin_lambda * sin_lambda;
    // Rounding can push h a hair past 1.0 for antipodal points; NaN must pass through
    let h = if h > 1.0 { 1.0 } else { h };

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Point reached from `origin` travelling `distance_m` meters along the initial
/// bearing `bearing_deg` (clockwise from north) on the same sphere as [`distance`].
pub fn destination(origin: &GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lng.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);

    // Normalise longitude to [-180, 180)
    let lng = (lambda2.to_degrees() + 540.0) % 360.0 - 180.0;

    GeoPoint::new(phi2.to_degrees(), lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_approx {
        ($left:expr, $right:expr, $tol:expr) => {
            let (l, r) = ($left as f64, $right as f64);
            assert!(
                (l - r).abs() <= $tol,
                "assert_approx failed: left={}, right={}, diff={}, tol={}",
                l, r, (l - r).abs(), $tol
            );
        };
    }

    #[test]
    fn known_value_near_utrecht() {
        let a = GeoPoint::new(52.0, 5.0);
        let b = GeoPoint::new(52.0, 5.01);
        let d = distance(&a, &b);
        assert!((d - 687.0).abs() <= 5.0, "got {}", d);
    }

    #[test]
    fn identical_points_are_zero() {
        let a = GeoPoint::new(52.37, 4.89);
        assert_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = distance(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(1.0, 0.0));
        assert_approx!(d, EARTH_RADIUS_M * 1f64.to_radians(), 1e-6);
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = distance(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(0.0, 180.0));
        assert_approx!(d, std::f64::consts::PI * EARTH_RADIUS_M, 1e-3);
    }

    #[test]
    fn nan_propagates() {
        let d = distance(&GeoPoint::new(f64::NAN, 5.0), &GeoPoint::new(52.0, 5.0));
        assert!(d.is_nan());
    }

    #[test]
    fn destination_round_trips_distance() {
        let origin = GeoPoint::new(52.1, 5.2);
        for bearing in [0.0, 45.0, 90.0, 180.0, 270.0, 333.0] {
            let p = destination(&origin, bearing, 800.0);
            assert_approx!(distance(&origin, &p), 800.0, 1e-3);
        }
    }

    #[test]
    fn destination_normalises_longitude() {
        let p = destination(&GeoPoint::new(0.0, 179.999), 90.0, 1000.0);
        assert!(p.lng < -179.0);
    }
}
