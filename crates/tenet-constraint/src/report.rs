//! Evaluation outcome types

use serde::Serialize;
use std::fmt;

/// Why a value did not satisfy a constraint.
///
/// Only built on the failure path. The rendered message is produced on
/// demand by `Display`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    /// Description of the constraint, including its expected operand
    pub expected: String,
    /// Rendering of the value that was checked
    pub actual: String,
    /// Extra context such as the failing index of a quantifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Failure {
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Full human-readable message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expected: {}\n  But was:  {}", self.expected, self.actual)?;
        if let Some(detail) = &self.detail {
            write!(f, "\n  {}", detail)?;
        }
        Ok(())
    }
}

/// Outcome of applying a constraint to a value
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Passed,
    Failed(Failure),
}

impl Evaluation {
    pub fn passed(&self) -> bool {
        matches!(self, Evaluation::Passed)
    }

    pub fn failed(&self) -> bool {
        !self.passed()
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Evaluation::Passed => None,
            Evaluation::Failed(failure) => Some(failure),
        }
    }

    /// Rendered failure message, `None` when the evaluation passed
    pub fn message(&self) -> Option<String> {
        self.failure().map(Failure::message)
    }

    pub fn into_result(self) -> Result<(), Failure> {
        match self {
            Evaluation::Passed => Ok(()),
            Evaluation::Failed(failure) => Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_layout() {
        let failure = Failure::new("empty", "\"abc\" (length 3)");
        assert_eq!(
            failure.message(),
            "Expected: empty\n  But was:  \"abc\" (length 3)"
        );

        let failure = failure.with_detail("first failure at index 0");
        assert!(failure.message().ends_with("\n  first failure at index 0"));
    }

    #[test]
    fn test_passed_has_no_message() {
        assert!(Evaluation::Passed.passed());
        assert!(Evaluation::Passed.message().is_none());
        assert!(Evaluation::Passed.into_result().is_ok());
    }

    #[test]
    fn test_failed_accessors() {
        let eval = Evaluation::Failed(Failure::new("null", "5"));
        assert!(eval.failed());
        assert_eq!(eval.failure().map(|f| f.actual.as_str()), Some("5"));
        assert!(eval.into_result().is_err());
    }
}
