//! Great-circle separation between points.
//!
//! [`angular_distance`] is the kernel every search strategy uses. It takes
//! validated [`SphericalPoint`]s and cannot fail. [`angular_distance_radians`]
//! is the raw entry point for callers holding bare radians: it checks ranges
//! without wrapping and reports [`MatchError::InvalidCoordinate`] instead.

use crate::error::{MatchError, PointRole, Result};
use crate::point::SphericalPoint;
use skymatch_core::angle::wrap_pm_pi;
use skymatch_core::math::vincenty_angular_separation;
use skymatch_core::math::chord_from_separation;
use skymatch_core::Angle;

/// Great-circle separation between two points, in [0, π].
///
/// Uses the Vincenty formula, which stays accurate for both tiny and
/// near-antipodal separations.
///
/// ```
/// use skymatch::{angular_distance, SphericalPoint};
///
/// let a = SphericalPoint::from_degrees(0.0, 0.0).unwrap();
/// let b = SphericalPoint::from_degrees(1.0, 0.0).unwrap();
/// assert!((angular_distance(&a, &b).degrees() - 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn angular_distance(a: &SphericalPoint, b: &SphericalPoint) -> Angle {
    PreparedPoint::new(a).separation(&PreparedPoint::new(b))
}

/// Separation between two raw (lon, lat) pairs in radians.
///
/// The inputs must already be normalized: longitude in [0, 2π), latitude in
/// [-π/2, +π/2]. Nothing is wrapped here.
///
/// # Errors
/// [`MatchError::InvalidCoordinate`] for a non-finite or out-of-range
/// component; `index` is 0 for the first point and 1 for the second.
pub fn angular_distance_radians(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Result<Angle> {
    let a = strict_point(0, lon1, lat1)?;
    let b = strict_point(1, lon2, lat2)?;
    Ok(angular_distance(&a, &b))
}

/// Straight-line distance between the two points on the unit sphere, in [0, 2].
#[inline]
pub fn chord_distance(a: &SphericalPoint, b: &SphericalPoint) -> f64 {
    chord_from_separation(angular_distance(a, b).radians())
}

fn strict_point(index: usize, lon: f64, lat: f64) -> Result<SphericalPoint> {
    let lon = Angle::from_radians(lon)
        .validate_longitude(false)
        .map_err(|e| MatchError::invalid_coordinate(PointRole::Input, index, e))?;
    let lat = Angle::from_radians(lat)
        .validate_latitude()
        .map_err(|e| MatchError::invalid_coordinate(PointRole::Input, index, e))?;
    SphericalPoint::from_angles(lon, lat)
        .map_err(|e| MatchError::invalid_coordinate(PointRole::Input, index, e))
}

/// A point with its latitude trigonometry evaluated once.
///
/// Search loops compare one query against many candidates; preparing both sides
/// up front leaves a single `sincos` of the longitude difference per pair.
#[derive(Debug, Clone, Copy)]
pub struct PreparedPoint {
    lon: f64,
    lat: f64,
    sin_lat: f64,
    cos_lat: f64,
}

impl PreparedPoint {
    #[inline]
    pub fn new(p: &SphericalPoint) -> Self {
        let (sin_lat, cos_lat) = p.lat().sin_cos();
        Self {
            lon: p.lon().radians(),
            lat: p.lat().radians(),
            sin_lat,
            cos_lat,
        }
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Great-circle separation from `other`.
    ///
    /// The longitude difference is wrapped into [-π, +π) and only its
    /// magnitude reaches Vincenty, and the pair is ordered by latitude first.
    /// `d(a, b)` and `d(b, a)` are then identical, and two candidates mirrored
    /// across the query's meridian differ by at most the rounding of their
    /// stored longitudes.
    #[inline]
    pub fn separation(&self, other: &Self) -> Angle {
        let (p, q) = if self.lat <= other.lat {
            (self, other)
        } else {
            (other, self)
        };
        let delta_lon = wrap_pm_pi(q.lon - p.lon).abs();
        Angle::from_radians(vincenty_angular_separation(
            p.sin_lat, p.cos_lat, q.sin_lat, q.cos_lat, delta_lon,
        ))
    }
}
