use super::types::Angle;
use crate::constants::{HALF_PI, TWOPI};
use crate::{AstroError, MathErrorKind};

/// Validates a latitude-like angle.
///
/// The angle must be finite and lie in [-π/2, +π/2]. Out-of-range values are
/// rejected, never clamped.
pub fn validate_latitude(angle: Angle) -> Result<Angle, AstroError> {
    let rad = angle.radians();
    if !rad.is_finite() {
        return Err(AstroError::math_error(
            "validate_latitude",
            MathErrorKind::NotFinite,
            "Lat not finite",
        ));
    }

    if (-HALF_PI..=HALF_PI).contains(&rad) {
        return Ok(angle);
    }

    Err(AstroError::math_error(
        "validate_latitude",
        MathErrorKind::OutOfRange,
        &format!("Lat {:.6}° out of range [-90°, +90°]", angle.degrees()),
    ))
}

/// Validates a longitude-like angle.
///
/// - `normalize = true`: any finite angle is accepted and wrapped into [0, 2π)
/// - `normalize = false`: the angle must already lie in [0, 2π)
pub fn validate_longitude(angle: Angle, normalize: bool) -> Result<Angle, AstroError> {
    let rad = angle.radians();
    if !rad.is_finite() {
        return Err(AstroError::math_error(
            "validate_longitude",
            MathErrorKind::NotFinite,
            "Lon not finite",
        ));
    }

    if normalize {
        let normalized = super::normalize::wrap_0_2pi(rad);
        return Ok(Angle::from_radians(normalized));
    }

    if (0.0..TWOPI).contains(&rad) {
        return Ok(angle);
    }

    Err(AstroError::math_error(
        "validate_longitude",
        MathErrorKind::OutOfRange,
        &format!("Lon {:.6}° out of range [0°, 360°)", angle.degrees()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_latitude() {
        assert!(validate_latitude(Angle::from_degrees(45.0)).is_ok());
        assert!(validate_latitude(Angle::from_radians(HALF_PI)).is_ok());
        assert!(validate_latitude(Angle::from_radians(-HALF_PI)).is_ok());

        let err = validate_latitude(Angle::from_degrees(95.0)).unwrap_err();
        assert_eq!(err.kind(), MathErrorKind::OutOfRange);
    }

    #[test]
    fn test_validate_latitude_not_finite() {
        let result = validate_latitude(Angle::from_radians(f64::NAN));
        if let Err(AstroError::MathError { kind, .. }) = result {
            assert_eq!(kind, MathErrorKind::NotFinite);
        } else {
            panic!("Expected MathError with NotFinite");
        }
    }

    #[test]
    fn test_validate_longitude_normalized() {
        let normalized = validate_longitude(Angle::from_degrees(370.0), true).unwrap();
        assert!((normalized.degrees() - 10.0).abs() < 1e-10);

        let negative = validate_longitude(Angle::from_degrees(-1.0), true).unwrap();
        assert!((negative.degrees() - 359.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_longitude_strict() {
        assert!(validate_longitude(Angle::from_degrees(0.0), false).is_ok());
        assert!(validate_longitude(Angle::from_degrees(359.9), false).is_ok());

        let err = validate_longitude(Angle::from_radians(TWOPI), false).unwrap_err();
        assert_eq!(err.kind(), MathErrorKind::OutOfRange);
        let err = validate_longitude(Angle::from_degrees(-10.0), false).unwrap_err();
        assert_eq!(err.kind(), MathErrorKind::OutOfRange);
    }

    #[test]
    fn test_validate_longitude_infinite() {
        let err = validate_longitude(Angle::from_radians(f64::INFINITY), true).unwrap_err();
        assert_eq!(err.kind(), MathErrorKind::NotFinite);
    }
}
