//! Points on the celestial sphere and ordered collections of them.
//!
//! A [`SphericalPoint`] is validated on construction: longitude is wrapped into
//! [0, 2π) and latitude must lie in [-π/2, +π/2]. Everything downstream relies
//! on that invariant and does no further checking.
//!
//! A [`PointSet`] is an ordered, immutable sequence of points. Its order is the
//! index space of a [`MatchResult`](crate::MatchResult).

use crate::error::{MatchError, PointRole, Result};
use skymatch_core::{Angle, AstroResult};

/// A validated (longitude, latitude) pair, stored in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SphericalPoint {
    lon: Angle,
    lat: Angle,
}

impl SphericalPoint {
    /// Builds a point from degrees. Longitude wraps, latitude is range-checked.
    ///
    /// ```
    /// use skymatch::SphericalPoint;
    ///
    /// let p = SphericalPoint::from_degrees(-10.0, 45.0).unwrap();
    /// assert!((p.lon().degrees() - 350.0).abs() < 1e-10);
    ///
    /// assert!(SphericalPoint::from_degrees(0.0, 91.0).is_err());
    /// ```
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> AstroResult<Self> {
        Self::from_angles(Angle::from_degrees(lon_deg), Angle::from_degrees(lat_deg))
    }

    pub fn from_radians(lon_rad: f64, lat_rad: f64) -> AstroResult<Self> {
        Self::from_angles(Angle::from_radians(lon_rad), Angle::from_radians(lat_rad))
    }

    pub fn from_angles(lon: Angle, lat: Angle) -> AstroResult<Self> {
        let lat = lat.validate_latitude()?;
        let lon = lon.validate_longitude(true)?;
        Ok(Self { lon, lat })
    }

    /// Longitude-like component in [0, 2π).
    #[inline]
    pub fn lon(&self) -> Angle {
        self.lon
    }

    /// Latitude-like component in [-π/2, +π/2].
    #[inline]
    pub fn lat(&self) -> Angle {
        self.lat
    }

    /// Returns `(lon, lat)` in degrees.
    #[inline]
    pub fn to_degrees(&self) -> (f64, f64) {
        (self.lon.degrees(), self.lat.degrees())
    }
}

impl std::fmt::Display for SphericalPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}°, {:+.6}°)", self.lon.degrees(), self.lat.degrees())
    }
}

/// An ordered, immutable collection of [`SphericalPoint`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    points: Vec<SphericalPoint>,
}

impl PointSet {
    /// Builds a set from `(lon, lat)` pairs in degrees.
    ///
    /// `role` only labels the error: the first invalid pair fails the whole
    /// call with [`MatchError::InvalidCoordinate`] carrying its index.
    pub fn from_degrees(pairs: &[(f64, f64)], role: PointRole) -> Result<Self> {
        let points = pairs
            .iter()
            .enumerate()
            .map(|(i, &(lon, lat))| {
                SphericalPoint::from_degrees(lon, lat)
                    .map_err(|e| MatchError::invalid_coordinate(role, i, e))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { points })
    }

    /// Builds a set from separate longitude and latitude columns in degrees.
    ///
    /// # Errors
    /// [`MatchError::ShapeMismatch`] if the columns differ in length, then
    /// [`MatchError::InvalidCoordinate`] for the first bad row.
    pub fn from_degree_columns(lons: &[f64], lats: &[f64], role: PointRole) -> Result<Self> {
        if lons.len() != lats.len() {
            return Err(MatchError::shape_mismatch(
                format!("{} latitude column", role),
                lons.len(),
                lats.len(),
            ));
        }
        let pairs: Vec<(f64, f64)> = lons.iter().copied().zip(lats.iter().copied()).collect();
        Self::from_degrees(&pairs, role)
    }

    /// Builds a set from `(lon, lat)` pairs in radians.
    pub fn from_radians(pairs: &[(f64, f64)], role: PointRole) -> Result<Self> {
        let points = pairs
            .iter()
            .enumerate()
            .map(|(i, &(lon, lat))| {
                SphericalPoint::from_radians(lon, lat)
                    .map_err(|e| MatchError::invalid_coordinate(role, i, e))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { points })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&SphericalPoint> {
        self.points.get(index)
    }

    #[inline]
    pub fn points(&self) -> &[SphericalPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SphericalPoint> {
        self.points.iter()
    }
}

impl From<Vec<SphericalPoint>> for PointSet {
    fn from(points: Vec<SphericalPoint>) -> Self {
        Self { points }
    }
}

impl FromIterator<SphericalPoint> for PointSet {
    fn from_iter<I: IntoIterator<Item = SphericalPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a SphericalPoint;
    type IntoIter = std::slice::Iter<'a, SphericalPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl std::ops::Index<usize> for PointSet {
    type Output = SphericalPoint;

    fn index(&self, index: usize) -> &SphericalPoint {
        &self.points[index]
    }
}
