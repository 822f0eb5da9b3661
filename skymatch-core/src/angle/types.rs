//! Core angle type.
//!
//! [`Angle`] stores radians and converts to degrees, arcminutes and arcseconds
//! on request. Separations reported by the matcher are `Angle`s, so the caller
//! picks the display unit rather than the library.
//!
//! ```
//! use skymatch_core::Angle;
//!
//! let sep = Angle::from_degrees(1.0);
//! assert!((sep.radians() - 0.017453292519943295).abs() < 1e-15);
//! assert!((sep.arcseconds() - 3600.0).abs() < 1e-9);
//! ```
//!
//! [`AngleUnit`] names a unit at the boundary, for example when a separation
//! column is printed:
//!
//! ```
//! use skymatch_core::{Angle, AngleUnit};
//!
//! let sep = Angle::from_unit(0.5, AngleUnit::Degrees);
//! assert!((sep.to_unit(AngleUnit::Arcminutes) - 30.0).abs() < 1e-12);
//! ```

/// An angular measurement stored as radians.
///
/// `PartialEq`/`PartialOrd` compare the raw radian value. `Eq` and `Ord` are
/// not implemented because f64 can be NaN. With the `serde` feature an angle
/// serializes as a bare radian value.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Angle {
    rad: f64,
}

impl Angle {
    pub const ZERO: Self = Self { rad: 0.0 };

    #[inline]
    pub const fn from_radians(rad: f64) -> Self {
        Self { rad }
    }

    #[inline]
    pub fn from_degrees(deg: f64) -> Self {
        Self {
            rad: deg.to_radians(),
        }
    }

    #[inline]
    pub fn from_arcminutes(arcmin: f64) -> Self {
        Self {
            rad: (arcmin / 60.0).to_radians(),
        }
    }

    #[inline]
    pub fn from_arcseconds(arcsec: f64) -> Self {
        Self {
            rad: (arcsec / 3600.0).to_radians(),
        }
    }

    /// Creates an angle from a value expressed in `unit`.
    #[inline]
    pub fn from_unit(value: f64, unit: AngleUnit) -> Self {
        match unit {
            AngleUnit::Radians => Self::from_radians(value),
            AngleUnit::Degrees => Self::from_degrees(value),
            AngleUnit::Arcminutes => Self::from_arcminutes(value),
            AngleUnit::Arcseconds => Self::from_arcseconds(value),
        }
    }

    /// Returns the angle in radians. No conversion occurs.
    #[inline]
    pub fn radians(self) -> f64 {
        self.rad
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.rad.to_degrees()
    }

    #[inline]
    pub fn arcminutes(self) -> f64 {
        self.degrees() * 60.0
    }

    #[inline]
    pub fn arcseconds(self) -> f64 {
        self.degrees() * 3600.0
    }

    /// Returns the angle expressed in `unit`.
    #[inline]
    pub fn to_unit(self, unit: AngleUnit) -> f64 {
        match unit {
            AngleUnit::Radians => self.radians(),
            AngleUnit::Degrees => self.degrees(),
            AngleUnit::Arcminutes => self.arcminutes(),
            AngleUnit::Arcseconds => self.arcseconds(),
        }
    }

    /// Returns `(sin, cos)`.
    #[inline]
    pub fn sin_cos(self) -> (f64, f64) {
        libm::sincos(self.rad)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.rad.is_finite()
    }

    /// Validates the angle as a longitude.
    ///
    /// With `normalize` the angle is wrapped into [0, 2π); without it, the angle
    /// must already lie in [0, 2π).
    ///
    /// # Errors
    ///
    /// Returns [`AstroError`](crate::AstroError) if the angle is not finite, or
    /// `normalize` is false and the angle is out of range.
    #[inline]
    pub fn validate_longitude(self, normalize: bool) -> Result<Self, crate::AstroError> {
        super::validate::validate_longitude(self, normalize)
    }

    /// Validates the angle as a latitude in [-90°, +90°].
    #[inline]
    pub fn validate_latitude(self) -> Result<Self, crate::AstroError> {
        super::validate::validate_latitude(self)
    }
}

/// Units an [`Angle`] can be read from or written to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AngleUnit {
    Radians,
    #[default]
    Degrees,
    Arcminutes,
    Arcseconds,
}

impl AngleUnit {
    /// Short symbol used in column headers.
    pub fn symbol(self) -> &'static str {
        match self {
            AngleUnit::Radians => "rad",
            AngleUnit::Degrees => "deg",
            AngleUnit::Arcminutes => "arcmin",
            AngleUnit::Arcseconds => "arcsec",
        }
    }
}

impl std::fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for AngleUnit {
    type Err = crate::AstroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rad" | "radian" | "radians" => Ok(AngleUnit::Radians),
            "deg" | "degree" | "degrees" => Ok(AngleUnit::Degrees),
            "arcmin" | "arcminute" | "arcminutes" => Ok(AngleUnit::Arcminutes),
            "arcsec" | "arcsecond" | "arcseconds" => Ok(AngleUnit::Arcseconds),
            other => Err(crate::AstroError::math_error(
                "AngleUnit::from_str",
                crate::MathErrorKind::InvalidInput,
                &format!("unknown angle unit '{}'", other),
            )),
        }
    }
}
