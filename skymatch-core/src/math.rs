//! Great-circle separation kernels.
//!
//! Both kernels take pre-computed sines and cosines of the latitudes so that a
//! caller scanning many candidates against one query can hoist the query's
//! trigonometry out of the loop.
//!
//! [`vincenty_angular_separation`] is accurate at every separation and is what
//! the matcher uses. [`haversine_angular_separation`] is kept as a cross-check;
//! it loses precision only for near-antipodal pairs.
//!
//! [`chord_from_separation`] turns a separation into the straight-line distance
//! between the two points on the unit sphere, which is what a 3D separation
//! reduces to when no radial distances are known.

/// Vincenty special case of the great-circle distance on a sphere.
///
/// Returns radians in [0, π].
#[inline]
pub fn vincenty_angular_separation(
    sin_lat1: f64,
    cos_lat1: f64,
    sin_lat2: f64,
    cos_lat2: f64,
    delta_lon: f64,
) -> f64 {
    let (sin_delta_lon, cos_delta_lon) = libm::sincos(delta_lon);

    let num = libm::sqrt(
        (cos_lat2 * sin_delta_lon).powi(2)
            + (cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_delta_lon).powi(2),
    );
    let den = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_delta_lon;

    libm::atan2(num, den)
}

/// Haversine great-circle distance.
///
/// Returns radians in [0, π]. The argument of the inverse sine is clamped so
/// rounding near the antipode cannot produce NaN.
#[inline]
pub fn haversine_angular_separation(lat1: f64, lat2: f64, delta_lon: f64) -> f64 {
    let sin_half_dlat = libm::sin((lat2 - lat1) * 0.5);
    let sin_half_dlon = libm::sin(delta_lon * 0.5);

    let h = sin_half_dlat * sin_half_dlat
        + libm::cos(lat1) * libm::cos(lat2) * sin_half_dlon * sin_half_dlon;

    2.0 * libm::asin(libm::sqrt(h.clamp(0.0, 1.0)))
}

/// Chord length subtended by a great-circle separation of `sep` radians.
///
/// ```
/// use skymatch_core::math::chord_from_separation;
///
/// assert!((chord_from_separation(std::f64::consts::PI) - 2.0).abs() < 1e-15);
/// ```
#[inline]
pub fn chord_from_separation(sep: f64) -> f64 {
    2.0 * libm::sin(0.5 * sep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEG_TO_RAD, HALF_PI, PI};
    use approx::assert_abs_diff_eq;

    fn vincenty_deg(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
        let (s1, c1) = libm::sincos(lat1 * DEG_TO_RAD);
        let (s2, c2) = libm::sincos(lat2 * DEG_TO_RAD);
        vincenty_angular_separation(s1, c1, s2, c2, (lon2 - lon1) * DEG_TO_RAD)
    }

    #[test]
    fn test_vincenty_same_point() {
        assert_eq!(vincenty_deg(10.0, 20.0, 10.0, 20.0), 0.0);
    }

    #[test]
    fn test_vincenty_quarter_circle() {
        assert_abs_diff_eq!(vincenty_deg(0.0, 0.0, 90.0, 0.0), HALF_PI, epsilon = 1e-15);
        assert_abs_diff_eq!(vincenty_deg(0.0, 90.0, 0.0, 0.0), HALF_PI, epsilon = 1e-15);
    }

    #[test]
    fn test_vincenty_antipodes() {
        assert_abs_diff_eq!(vincenty_deg(0.0, 0.0, 180.0, 0.0), PI, epsilon = 1e-15);
        assert_abs_diff_eq!(vincenty_deg(0.0, 90.0, 0.0, -90.0), PI, epsilon = 1e-15);
    }

    #[test]
    fn test_vincenty_one_milliarcsecond() {
        let mas_deg = 1.0 / 3_600_000.0;
        let sep = vincenty_deg(45.0, 30.0, 45.0, 30.0 + mas_deg);
        assert_abs_diff_eq!(sep, mas_deg * DEG_TO_RAD, epsilon = 1e-15);
    }

    #[test]
    fn test_haversine_matches_vincenty() {
        let pairs = [
            (0.0, 0.0, 1.0, 0.0),
            (10.0, -45.0, 200.0, 60.0),
            (359.9, 0.0, 0.1, 0.0),
            (123.4, 89.9, 303.4, 89.9),
        ];
        for (lon1, lat1, lon2, lat2) in pairs {
            let v = vincenty_deg(lon1, lat1, lon2, lat2);
            let h = haversine_angular_separation(
                lat1 * DEG_TO_RAD,
                lat2 * DEG_TO_RAD,
                (lon2 - lon1) * DEG_TO_RAD,
            );
            assert_abs_diff_eq!(v, h, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_haversine_antipode_is_finite() {
        let h = haversine_angular_separation(0.0, 0.0, PI);
        assert!(h.is_finite());
        assert_abs_diff_eq!(h, PI, epsilon = 1e-7);
    }

    #[test]
    fn test_chord_bounds() {
        assert_eq!(chord_from_separation(0.0), 0.0);
        assert_abs_diff_eq!(chord_from_separation(PI), 2.0, epsilon = 1e-15);
        assert_abs_diff_eq!(chord_from_separation(HALF_PI), 2.0_f64.sqrt(), epsilon = 1e-15);
    }

    #[test]
    fn test_chord_matches_cartesian_distance() {
        let (lon1, lat1, lon2, lat2) = (0.3_f64, 0.2_f64, 1.3_f64, -0.4_f64);
        let a = [lat1.cos() * lon1.cos(), lat1.cos() * lon1.sin(), lat1.sin()];
        let b = [lat2.cos() * lon2.cos(), lat2.cos() * lon2.sin(), lat2.sin()];
        let cartesian = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt();

        let (s1, c1) = libm::sincos(lat1);
        let (s2, c2) = libm::sincos(lat2);
        let sep = vincenty_angular_separation(s1, c1, s2, c2, lon2 - lon1);
        assert_abs_diff_eq!(chord_from_separation(sep), cartesian, epsilon = 1e-12);
    }
}
