//! Error types for constraint evaluation

use crate::report::Failure;
use tenet_core::ValueType;
use thiserror::Error;

/// A constraint was applied to a value it cannot judge, or was built from
/// malformed arguments. This is a fault in the check itself, never in the
/// value under test.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UsageError {
    #[error("`{constraint}` requires a numeric value, got {actual}")]
    NotNumeric {
        constraint: String,
        actual: ValueType,
    },

    #[error("`{constraint}` requires a value with a length, got {actual}")]
    NoLength {
        constraint: String,
        actual: ValueType,
    },

    #[error("`{constraint}` requires a string value, got {actual}")]
    NotAString {
        constraint: String,
        actual: ValueType,
    },

    #[error("`{constraint}` requires a list, map or string value, got {actual}")]
    NotASequence {
        constraint: String,
        actual: ValueType,
    },

    #[error("`{constraint}` cannot be applied: {reason}")]
    Unsupported { constraint: String, reason: String },

    #[error("Invalid regular expression /{pattern}/: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid range [{min}, {max}]: lower bound exceeds upper bound")]
    InvalidRange { min: f64, max: f64 },
}

/// What a harness receives from [`assert_that`](crate::assert_that).
#[derive(Debug, Clone, Error)]
pub enum AssertionError {
    /// The value did not satisfy the constraint
    #[error("assertion failed: {0}")]
    Failed(Failure),

    /// The constraint could not be applied to the value
    #[error("assertion misused: {0}")]
    Usage(#[from] UsageError),
}

impl AssertionError {
    pub fn is_failure(&self) -> bool {
        matches!(self, AssertionError::Failed(_))
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, AssertionError::Usage(_))
    }
}
