//! Nearest-neighbor matching of celestial coordinates.
//!
//! Given a set of query positions and a reference catalog, both as
//! (longitude, latitude) pairs on the unit sphere, `skymatch` finds for every
//! query point the catalog entry with the smallest great-circle separation.
//! Radius searches return every pair inside a threshold instead.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`point`] | [`SphericalPoint`], [`PointSet`] |
//! | [`distance`] | [`angular_distance`], [`chord_distance`] |
//! | [`search`] | [`match_nearest`], [`search_around`], scan and HEALPix strategies |
//! | [`result`] | [`MatchResult`], [`Match`], [`Pair`] |
//! | [`report`] | [`MatchReport`]: matches joined with catalog coordinates |
//! | [`error`] | [`MatchError`] and [`Result`] |
//!
//! # Quick Start
//!
//! ```
//! use skymatch::{match_nearest, AngleUnit, PointRole, PointSet};
//!
//! let catalog = PointSet::from_degrees(
//!     &[(10.684, 41.269), (83.822, -5.391), (201.365, -43.019)],
//!     PointRole::Candidate,
//! )
//! .unwrap();
//! let query = PointSet::from_degrees(&[(83.82, -5.39)], PointRole::Query).unwrap();
//!
//! let result = match_nearest(&query, &catalog).unwrap();
//! assert_eq!(result.indices(), vec![1]);
//! assert!(result.separations(AngleUnit::Arcseconds)[0] < 10.0);
//! ```
//!
//! # Tie-break
//!
//! Equal separations resolve to the lowest candidate index. Exact duplicates in
//! the catalog therefore always match the first occurrence.
//!
//! # Features
//!
//! - **`serde`**: `Serialize` for results and reports, `Serialize`/`Deserialize`
//!   for [`MatchOptions`].
//! - **`cli`**: the `skymatch` binary.

pub mod distance;
pub mod error;
pub mod point;
pub mod report;
pub mod result;
pub mod search;

pub use distance::{angular_distance, angular_distance_radians, chord_distance};
pub use error::{MatchError, PointRole, Result};
pub use point::{PointSet, SphericalPoint};
pub use report::{MatchReport, ReportTable, ResolvedMatch, SeparationSummary};
pub use result::{Match, MatchResult, Pair};
pub use search::{
    match_nearest, match_with_options, search_around, search_around_with_options, MatchOptions,
    NeighborIndex, SearchStrategy,
};
pub use skymatch_core::{Angle, AngleUnit};
