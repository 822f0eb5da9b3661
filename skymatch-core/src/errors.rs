//! Error types for angle validation.
//!
//! [`AstroError`] is the single failure type of this crate. It is raised when
//! an angle is not finite or falls outside the range its role allows (a
//! latitude beyond a pole, an unwrapped longitude outside [0, 2π)).
//!
//! ```
//! use skymatch_core::{AstroError, MathErrorKind};
//!
//! fn checked_latitude(rad: f64) -> Result<f64, AstroError> {
//!     if rad.abs() > std::f64::consts::FRAC_PI_2 {
//!         return Err(AstroError::math_error(
//!             "checked_latitude",
//!             MathErrorKind::OutOfRange,
//!             "beyond pole",
//!         ));
//!     }
//!     Ok(rad)
//! }
//! ```

use thiserror::Error;

/// Classification of angle failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathErrorKind {
    /// Input value is invalid for the operation.
    InvalidInput,
    /// Value is NaN or infinity.
    NotFinite,
    /// Value outside valid domain (e.g., latitude > 90°).
    OutOfRange,
}

/// Unified error type for angle handling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AstroError {
    /// Numerical or domain failure.
    #[error("Math error in {operation} ({kind:?}): {message}")]
    MathError {
        operation: String,
        kind: MathErrorKind,
        message: String,
    },
}

/// Convenience alias for `Result<T, AstroError>`.
pub type AstroResult<T> = Result<T, AstroError>;

impl AstroError {
    /// Creates a [`MathError`](Self::MathError) with the given kind.
    pub fn math_error(operation: &str, kind: MathErrorKind, reason: &str) -> Self {
        Self::MathError {
            operation: operation.to_string(),
            kind,
            message: reason.to_string(),
        }
    }

    /// Returns the failure classification.
    pub fn kind(&self) -> MathErrorKind {
        match self {
            Self::MathError { kind, .. } => *kind,
        }
    }
}
