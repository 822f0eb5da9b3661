//! Angle wrapping.
//!
//! | Quantity | Range | Function |
//! |----------|-------|----------|
//! | Longitude, right ascension | [0, 2π) | [`wrap_0_2pi`] |
//! | Longitude difference | [-π, +π) | [`wrap_pm_pi`] |
//!
//! Latitude is never wrapped: a latitude past a pole is rejected by
//! [`validate_latitude`](super::validate_latitude).
//!
//! Both functions reduce with `libm::fmod`, which keeps the sign of the
//! dividend, then shift into the target range.

use crate::constants::{PI, TWOPI};
use libm::fmod;

/// Wraps an angle to [-π, +π) radians. Both -π and +π map to -π.
///
/// ```
/// use skymatch_core::angle::wrap_pm_pi;
/// use std::f64::consts::PI;
///
/// let x = wrap_pm_pi(3.0 * PI / 2.0);
/// assert!((x - (-PI / 2.0)).abs() < 1e-10);
/// ```
#[inline]
pub fn wrap_pm_pi(x: f64) -> f64 {
    let w = fmod(x, TWOPI);
    let w = if w < -PI {
        w + TWOPI
    } else if w >= PI {
        w - TWOPI
    } else {
        w
    };
    // the shift up can round onto +π
    if w >= PI {
        w - TWOPI
    } else {
        w
    }
}

/// Wraps an angle to [0, 2π) radians.
///
/// A tiny negative input would round to exactly 2π after the shift; that case
/// maps to 0 so the upper bound stays open.
///
/// ```
/// use skymatch_core::angle::wrap_0_2pi;
/// use std::f64::consts::PI;
///
/// let x = wrap_0_2pi(-PI / 2.0);
/// assert!((x - 3.0 * PI / 2.0).abs() < 1e-10);
/// ```
#[inline]
pub fn wrap_0_2pi(x: f64) -> f64 {
    let w = fmod(x, TWOPI);
    if w < 0.0 {
        let shifted = w + TWOPI;
        if shifted >= TWOPI {
            0.0
        } else {
            shifted
        }
    } else {
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_pm_pi() {
        assert_eq!(wrap_pm_pi(1.0), 1.0);
        assert!((wrap_pm_pi(3.0 * PI / 2.0) - (-PI / 2.0)).abs() < 1e-15);
        assert!((wrap_pm_pi(-3.0 * PI / 2.0) - (PI / 2.0)).abs() < 1e-15);
    }

    #[test]
    fn test_wrap_pm_pi_half_open() {
        assert_eq!(wrap_pm_pi(PI), -PI);
        assert_eq!(wrap_pm_pi(-PI), -PI);
        for x in [-7.0, -PI - 1e-15, -PI + 1e-15, PI - 1e-15, PI + 1e-15, 7.0] {
            let w = wrap_pm_pi(x);
            assert!((-PI..PI).contains(&w), "wrap_pm_pi({}) = {}", x, w);
        }
    }

    #[test]
    fn test_wrap_pm_pi_mirror() {
        // a difference and its negation wrap to the same magnitude
        for d in [0.1, 1.0, 3.0, 3.1] {
            assert_eq!(wrap_pm_pi(d).abs(), wrap_pm_pi(-d).abs());
        }
    }

    #[test]
    fn test_wrap_0_2pi() {
        assert_eq!(wrap_0_2pi(1.0), 1.0);
        assert!((wrap_0_2pi(-PI / 2.0) - (3.0 * PI / 2.0)).abs() < 1e-15);
        assert!((wrap_0_2pi(3.0 * PI) - PI).abs() < 1e-15);
        assert!(wrap_0_2pi(TWOPI).abs() < 1e-15);
    }

    #[test]
    fn test_wrap_0_2pi_tiny_negative_stays_below_two_pi() {
        let w = wrap_0_2pi(-1e-20);
        assert!((0.0..TWOPI).contains(&w));
    }
}
