//! Angle primitives and great-circle kernels for spherical catalog matching.
//!
//! `skymatch-core` holds the small amount of spherical math the matcher needs:
//! a typed [`Angle`], wrapping and range validation for longitude/latitude pairs,
//! and numerically stable separation formulas. It has no knowledge of point sets
//! or matching; that lives in the `skymatch` crate.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`angle`] | [`Angle`] type, normalization, validation |
//! | [`math`] | Vincenty and haversine angular separation, chord length |
//! | [`constants`] | π multiples and unit conversion factors |
//! | [`errors`] | [`AstroError`] and [`AstroResult`] |
//!
//! # Design Notes
//!
//! - **Radians internally**: every computation runs in radians. Degrees and
//!   arcseconds are accepted and produced only at the boundary through [`Angle`].
//! - **Validation, not repair**: latitude outside [-90°, +90°] is an error. Only
//!   longitude, which is cyclic, is ever wrapped.

pub mod angle;
pub mod constants;
pub mod errors;
pub mod math;

pub use angle::{Angle, AngleUnit};
pub use errors::{AstroError, AstroResult, MathErrorKind};
