//! Harness call site: turning an evaluation into a pass/fail signal

use crate::constraint::{
    assignable_from, contains, ends_with, equal_to, instance_of, is_empty, is_false, is_nan,
    is_not_empty, is_not_null, is_null, is_true, matches, starts_with, Constraint,
};
use crate::error::AssertionError;
use crate::evaluator::evaluate;
use crate::report::Evaluation;
use tenet_core::{Value, ValueType};

/// Evaluate and fold both error kinds into one `Result`.
///
/// `Err(AssertionError::Failed)` means the value is wrong,
/// `Err(AssertionError::Usage)` means the check itself is.
pub fn assert_that(value: &Value, constraint: &Constraint) -> Result<(), AssertionError> {
    match evaluate(constraint, value)? {
        Evaluation::Passed => Ok(()),
        Evaluation::Failed(failure) => Err(AssertionError::Failed(failure)),
    }
}

// Classic one-call assertions. Each is a named shorthand for
// `assert_that(value, constraint)`; the subject always comes first.

pub fn assert_null(value: impl Into<Value>) -> Result<(), AssertionError> {
    assert_that(&value.into(), &is_null())
}

pub fn assert_not_null(value: impl Into<Value>) -> Result<(), AssertionError> {
    assert_that(&value.into(), &is_not_null())
}

pub fn assert_true(value: impl Into<Value>) -> Result<(), AssertionError> {
    assert_that(&value.into(), &is_true())
}

pub fn assert_false(value: impl Into<Value>) -> Result<(), AssertionError> {
    assert_that(&value.into(), &is_false())
}

pub fn assert_nan(value: impl Into<Value>) -> Result<(), AssertionError> {
    assert_that(&value.into(), &is_nan())
}

pub fn assert_empty(value: impl Into<Value>) -> Result<(), AssertionError> {
    assert_that(&value.into(), &is_empty())
}

pub fn assert_not_empty(value: impl Into<Value>) -> Result<(), AssertionError> {
    assert_that(&value.into(), &is_not_empty())
}

pub fn assert_instance_of(value: impl Into<Value>, ty: ValueType) -> Result<(), AssertionError> {
    assert_that(&value.into(), &instance_of(ty))
}

pub fn assert_not_instance_of(value: impl Into<Value>, ty: ValueType) -> Result<(), AssertionError> {
    assert_that(&value.into(), &!instance_of(ty))
}

pub fn assert_assignable_from(value: impl Into<Value>, ty: ValueType) -> Result<(), AssertionError> {
    assert_that(&value.into(), &assignable_from(ty))
}

pub fn assert_not_assignable_from(
    value: impl Into<Value>,
    ty: ValueType,
) -> Result<(), AssertionError> {
    assert_that(&value.into(), &!assignable_from(ty))
}

pub fn assert_contains(actual: &str, expected: &str) -> Result<(), AssertionError> {
    assert_that(&Value::from(actual), &contains(expected))
}

pub fn assert_does_not_contain(actual: &str, expected: &str) -> Result<(), AssertionError> {
    assert_that(&Value::from(actual), &!contains(expected))
}

pub fn assert_starts_with(actual: &str, prefix: &str) -> Result<(), AssertionError> {
    assert_that(&Value::from(actual), &starts_with(prefix))
}

pub fn assert_does_not_start_with(actual: &str, prefix: &str) -> Result<(), AssertionError> {
    assert_that(&Value::from(actual), &!starts_with(prefix))
}

pub fn assert_ends_with(actual: &str, suffix: &str) -> Result<(), AssertionError> {
    assert_that(&Value::from(actual), &ends_with(suffix))
}

pub fn assert_does_not_end_with(actual: &str, suffix: &str) -> Result<(), AssertionError> {
    assert_that(&Value::from(actual), &!ends_with(suffix))
}

pub fn assert_equal_ignoring_case(actual: &str, expected: &str) -> Result<(), AssertionError> {
    assert_that(&Value::from(actual), &equal_to(expected).ignore_case())
}

pub fn assert_not_equal_ignoring_case(actual: &str, expected: &str) -> Result<(), AssertionError> {
    assert_that(&Value::from(actual), &!equal_to(expected).ignore_case())
}

/// Regex search, as with [`matches`]. An invalid pattern is a usage error.
pub fn assert_is_match(actual: &str, pattern: &str) -> Result<(), AssertionError> {
    assert_that(&Value::from(actual), &matches(pattern)?)
}

pub fn assert_does_not_match(actual: &str, pattern: &str) -> Result<(), AssertionError> {
    assert_that(&Value::from(actual), &!matches(pattern)?)
}

/// Panic unless `value` satisfies `constraint`.
///
/// ```
/// use tenet_constraint::{assert_that, starts_with};
///
/// assert_that!("Hello Test Driven Development!", starts_with("HELLO").ignore_case());
/// ```
///
/// A failing value panics with `assertion failed: ...`, a misapplied
/// constraint with `assertion misused: ...`. An optional trailing format
/// string is prepended to the message.
#[macro_export]
macro_rules! assert_that {
    ($value:expr, $constraint:expr $(,)?) => {
        if let Err(err) = $crate::assert_that(&$crate::Value::from($value), &$constraint) {
            panic!("{}", err);
        }
    };
    ($value:expr, $constraint:expr, $($arg:tt)+) => {
        if let Err(err) = $crate::assert_that(&$crate::Value::from($value), &$constraint) {
            panic!("{}: {}", format_args!($($arg)+), err);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::*;

    #[test]
    fn test_assert_that_ok() {
        assert!(assert_that(&Value::from(50), &is_not_null()).is_ok());
    }

    #[test]
    fn test_assert_that_failure_kind() {
        let err = assert_that(&Value::from("Hello"), &ends_with("World")).unwrap_err();
        assert!(err.is_failure());
        let message = err.to_string();
        assert!(message.starts_with("assertion failed: Expected: ending with \"World\""));
        assert!(message.contains("But was:  \"Hello\""));
    }

    #[test]
    fn test_assert_that_usage_kind() {
        let err = assert_that(&Value::from("not a number"), &is_nan()).unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn test_macro_passes() {
        crate::assert_that!(vec!["Hello!", "Hi!", "Hola!"], all(ends_with("!")));
        crate::assert_that!("Test", type_of(ValueType::String), "exact type of {}", "Test");
        crate::assert_that!(Value::Null, is_null());
    }

    #[test]
    fn test_classic_value_assertions() {
        assert!(assert_null(None::<i64>).is_ok());
        assert!(assert_not_null(50).is_ok());
        assert!(assert_true(5 + 5 == 10).is_ok());
        assert!(assert_false(2 + 5 == 10).is_ok());
        assert!(assert_nan(f64::NAN).is_ok());
        assert!(assert_empty("").is_ok());
        assert!(assert_not_empty(vec![1, 2, 3]).is_ok());
        assert!(assert_null(50).unwrap_err().is_failure());
        assert!(assert_nan("not a number").unwrap_err().is_usage());
    }

    #[test]
    fn test_classic_type_assertions() {
        assert!(assert_instance_of("Test", ValueType::String).is_ok());
        assert!(assert_not_instance_of("Test", ValueType::Int).is_ok());
        assert!(assert_assignable_from("Test", ValueType::String).is_ok());
        assert!(assert_not_assignable_from("Test", ValueType::Int).is_ok());
        assert!(assert_instance_of(5, ValueType::String).is_err());
    }

    #[test]
    fn test_classic_string_assertions() {
        let phrase = "Hello Test Driven Development!";
        assert!(assert_contains(phrase, "Test").is_ok());
        assert!(assert_does_not_contain(phrase, "Bye").is_ok());
        assert!(assert_starts_with(phrase, "Hello").is_ok());
        assert!(assert_does_not_start_with(phrase, "HELLO").is_ok());
        assert!(assert_ends_with(phrase, "Development!").is_ok());
        assert!(assert_does_not_end_with(phrase, "lo").is_ok());
        assert!(assert_equal_ignoring_case("Hello Unit Testing!", "Hello UNIT testing!").is_ok());
        assert!(assert_not_equal_ignoring_case("Hello Unit Testing!", "HELLO DEVELOPMENT!").is_ok());
        assert!(assert_is_match("Tit for tat!", "Ti.*tat!").is_ok());
        assert!(assert_does_not_match("Tit for tat!", "Its useless").is_ok());

        let err = assert_ends_with(phrase, "lo").unwrap_err();
        assert!(err.to_string().contains("Expected: ending with \"lo\""));
    }

    #[test]
    fn test_classic_invalid_pattern_is_usage() {
        assert!(assert_is_match("abc", "(oops").unwrap_err().is_usage());
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_macro_panics_on_failure() {
        crate::assert_that!(5, type_of(ValueType::String));
    }

    #[test]
    #[should_panic(expected = "phrase check: assertion misused")]
    fn test_macro_panics_on_misuse() {
        crate::assert_that!(true, is_empty(), "phrase check");
    }
}
