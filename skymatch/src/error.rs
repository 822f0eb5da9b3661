use skymatch_core::AstroError;
use thiserror::Error;

/// Which input collection an offending coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRole {
    Query,
    Candidate,
    /// A coordinate handed to a single-pair operation.
    Input,
}

impl std::fmt::Display for PointRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointRole::Query => f.write_str("query"),
            PointRole::Candidate => f.write_str("candidate"),
            PointRole::Input => f.write_str("input"),
        }
    }
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid coordinate at {role} index {index}: {source}")]
    InvalidCoordinate {
        role: PointRole,
        index: usize,
        #[source]
        source: AstroError,
    },

    #[error("Candidate set is empty")]
    EmptyCandidateSet,

    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Requested neighbor {requested} but only {available} candidates exist")]
    NotEnoughCandidates { requested: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, MatchError>;

impl MatchError {
    pub fn invalid_coordinate(role: PointRole, index: usize, source: AstroError) -> Self {
        Self::InvalidCoordinate {
            role,
            index,
            source,
        }
    }

    pub fn shape_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skymatch_core::MathErrorKind;

    #[test]
    fn test_invalid_coordinate_message() {
        let source = AstroError::math_error("validate_latitude", MathErrorKind::OutOfRange, "Lat 91°");
        let err = MatchError::invalid_coordinate(PointRole::Candidate, 7, source);
        let msg = err.to_string();
        assert!(msg.contains("candidate index 7"));
        assert!(msg.contains("Lat 91°"));
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = MatchError::shape_mismatch("latitude column", 3, 2);
        assert_eq!(
            err.to_string(),
            "Shape mismatch in latitude column: expected 3, got 2"
        );
    }

    #[test]
    fn test_not_enough_candidates_message() {
        let err = MatchError::NotEnoughCandidates {
            requested: 3,
            available: 2,
        };
        assert!(err.to_string().contains("neighbor 3"));
    }

    #[test]
    fn test_send_sync() {
        fn _assert_send<T: Send>() {}
        fn _assert_sync<T: Sync>() {}
        _assert_send::<MatchError>();
        _assert_sync::<MatchError>();
    }
}
