//! Constraint definitions and the fluent builder functions

use crate::error::UsageError;
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::ops::Not;
use tenet_core::{Value, ValueType};

/// A compiled regular expression with its case-folded twin.
///
/// Both forms are compiled up front so that `ignore_case` can be decided
/// when the constraint is evaluated without a second chance to fail.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    exact: Regex,
    folded: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, UsageError> {
        let invalid = |e: regex::Error| UsageError::InvalidPattern {
            pattern: source.to_string(),
            reason: e.to_string(),
        };
        let exact = Regex::new(source).map_err(invalid)?;
        let folded = RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .map_err(invalid)?;
        Ok(Self {
            source: source.to_string(),
            exact,
            folded,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Search (not full-match) semantics
    pub fn is_match(&self, haystack: &str, ignore_case: bool) -> bool {
        if ignore_case {
            self.folded.is_match(haystack)
        } else {
            self.exact.is_match(haystack)
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A composable predicate over a [`Value`].
///
/// Leaf variants test one condition. The boxed variants wrap other
/// constraints: modifiers (`IgnoreCase`, `Not`), quantifiers (`All`, `Any`)
/// and logical composites (`And`, `Or`). Every builder returns a new value,
/// nothing is mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Null,
    NotNull,
    True,
    False,
    NaN,
    Empty,
    NotEmpty,
    TypeOf(ValueType),
    InstanceOf(ValueType),
    AssignableFrom(ValueType),
    AssignableTo(ValueType),
    Contains(Value),
    StartsWith(String),
    EndsWith(String),
    Matches(Pattern),
    EqualTo(Value),
    GreaterThan(f64),
    LessThan(f64),
    AtLeast(f64),
    AtMost(f64),
    InRange { min: f64, max: f64 },
    HasLength(usize),
    IgnoreCase(Box<Constraint>),
    Not(Box<Constraint>),
    All(Box<Constraint>),
    Any(Box<Constraint>),
    And(Box<Constraint>, Box<Constraint>),
    Or(Box<Constraint>, Box<Constraint>),
}

impl Constraint {
    /// Compare strings case-insensitively anywhere below this node
    pub fn ignore_case(self) -> Constraint {
        Constraint::IgnoreCase(Box::new(self))
    }

    /// Logical negation
    pub fn negate(self) -> Constraint {
        Constraint::Not(Box::new(self))
    }

    pub fn and(self, other: Constraint) -> Constraint {
        Constraint::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Constraint) -> Constraint {
        Constraint::Or(Box::new(self), Box::new(other))
    }
}

impl Not for Constraint {
    type Output = Constraint;

    fn not(self) -> Constraint {
        self.negate()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Null => write!(f, "null"),
            Constraint::NotNull => write!(f, "not null"),
            Constraint::True => write!(f, "true"),
            Constraint::False => write!(f, "false"),
            Constraint::NaN => write!(f, "NaN"),
            Constraint::Empty => write!(f, "empty"),
            Constraint::NotEmpty => write!(f, "not empty"),
            Constraint::TypeOf(ty) => write!(f, "exactly of type {}", ty),
            Constraint::InstanceOf(ty) => write!(f, "instance of {}", ty),
            Constraint::AssignableFrom(ty) => write!(f, "assignable from {}", ty),
            Constraint::AssignableTo(ty) => write!(f, "assignable to {}", ty),
            Constraint::Contains(needle) => write!(f, "containing {}", needle),
            Constraint::StartsWith(prefix) => write!(f, "starting with {:?}", prefix),
            Constraint::EndsWith(suffix) => write!(f, "ending with {:?}", suffix),
            Constraint::Matches(pattern) => write!(f, "matching /{}/", pattern.as_str()),
            Constraint::EqualTo(expected) => write!(f, "equal to {}", expected),
            Constraint::GreaterThan(n) => write!(f, "greater than {}", n),
            Constraint::LessThan(n) => write!(f, "less than {}", n),
            Constraint::AtLeast(n) => write!(f, "at least {}", n),
            Constraint::AtMost(n) => write!(f, "at most {}", n),
            Constraint::InRange { min, max } => write!(f, "in range [{}, {}]", min, max),
            Constraint::HasLength(n) => write!(f, "length of {}", n),
            Constraint::IgnoreCase(inner) => write!(f, "{}, ignoring case", inner),
            Constraint::Not(inner) => write!(f, "not {}", inner),
            Constraint::All(inner) => write!(f, "all items {}", inner),
            Constraint::Any(inner) => write!(f, "some item {}", inner),
            Constraint::And(a, b) => write!(f, "{} and {}", a, b),
            Constraint::Or(a, b) => write!(f, "{} or {}", a, b),
        }
    }
}

pub fn is_null() -> Constraint {
    Constraint::Null
}

pub fn is_not_null() -> Constraint {
    Constraint::NotNull
}

pub fn is_true() -> Constraint {
    Constraint::True
}

pub fn is_false() -> Constraint {
    Constraint::False
}

/// Passes on a NaN float. Applying it to a non-numeric value is a usage error.
pub fn is_nan() -> Constraint {
    Constraint::NaN
}

pub fn is_empty() -> Constraint {
    Constraint::Empty
}

pub fn is_not_empty() -> Constraint {
    Constraint::NotEmpty
}

/// Exact runtime type equality
pub fn type_of(ty: ValueType) -> Constraint {
    Constraint::TypeOf(ty)
}

/// The value's type is `ty` or derives from it
pub fn instance_of(ty: ValueType) -> Constraint {
    Constraint::InstanceOf(ty)
}

/// A value of type `ty` could stand where the value's type is expected,
/// i.e. `ty` is the value's type or derives from it.
pub fn assignable_from(ty: ValueType) -> Constraint {
    Constraint::AssignableFrom(ty)
}

/// The value could stand where `ty` is expected.
pub fn assignable_to(ty: ValueType) -> Constraint {
    Constraint::AssignableTo(ty)
}

/// Substring for strings, element for lists, key for maps
pub fn contains(needle: impl Into<Value>) -> Constraint {
    Constraint::Contains(needle.into())
}

pub fn starts_with(prefix: impl Into<String>) -> Constraint {
    Constraint::StartsWith(prefix.into())
}

pub fn ends_with(suffix: impl Into<String>) -> Constraint {
    Constraint::EndsWith(suffix.into())
}

/// Regular-expression search. Rejects malformed patterns immediately.
pub fn matches(pattern: &str) -> Result<Constraint, UsageError> {
    Ok(Constraint::Matches(Pattern::new(pattern)?))
}

/// Deep equality; lists compare element-wise in order
pub fn equal_to(expected: impl Into<Value>) -> Constraint {
    Constraint::EqualTo(expected.into())
}

pub fn greater_than(n: impl Into<f64>) -> Constraint {
    Constraint::GreaterThan(n.into())
}

pub fn less_than(n: impl Into<f64>) -> Constraint {
    Constraint::LessThan(n.into())
}

pub fn at_least(n: impl Into<f64>) -> Constraint {
    Constraint::AtLeast(n.into())
}

pub fn at_most(n: impl Into<f64>) -> Constraint {
    Constraint::AtMost(n.into())
}

/// Inclusive on both ends. A reversed or NaN bound is rejected.
pub fn in_range(min: impl Into<f64>, max: impl Into<f64>) -> Result<Constraint, UsageError> {
    let (min, max) = (min.into(), max.into());
    if min.is_nan() || max.is_nan() || min > max {
        return Err(UsageError::InvalidRange { min, max });
    }
    Ok(Constraint::InRange { min, max })
}

pub fn has_length(n: usize) -> Constraint {
    Constraint::HasLength(n)
}

pub fn not(inner: Constraint) -> Constraint {
    inner.negate()
}

/// Every element must satisfy `inner`
pub fn all(inner: Constraint) -> Constraint {
    Constraint::All(Box::new(inner))
}

/// At least one element must satisfy `inner`
pub fn any(inner: Constraint) -> Constraint {
    Constraint::Any(Box::new(inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptions() {
        assert_eq!(is_not_null().to_string(), "not null");
        assert_eq!(
            starts_with("HELLO").ignore_case().to_string(),
            "starting with \"HELLO\", ignoring case"
        );
        assert_eq!(
            (!contains("Bye")).to_string(),
            "not containing \"Bye\""
        );
        assert_eq!(
            all(ends_with("!")).to_string(),
            "all items ending with \"!\""
        );
        assert_eq!(
            type_of(ValueType::String).to_string(),
            "exactly of type string"
        );
        assert_eq!(in_range(0, 180).unwrap().to_string(), "in range [0, 180]");
        assert_eq!(
            matches("Ti.*tat!").unwrap().to_string(),
            "matching /Ti.*tat!/"
        );
    }

    #[test]
    fn test_builders_wrap_without_mutation() {
        let base = equal_to("Hello");
        let folded = base.clone().ignore_case();
        assert_eq!(base, Constraint::EqualTo(Value::from("Hello")));
        assert!(matches!(folded, Constraint::IgnoreCase(ref inner) if **inner == base));
    }

    #[test]
    fn test_invalid_pattern_is_usage_error() {
        let err = matches("(unclosed").unwrap_err();
        assert!(matches!(err, UsageError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn test_reversed_range_is_usage_error() {
        assert_eq!(
            in_range(5, 1).unwrap_err(),
            UsageError::InvalidRange { min: 5.0, max: 1.0 }
        );
        assert!(in_range(f64::NAN, 1).is_err());
        assert!(in_range(2, 2).is_ok());
    }

    #[test]
    fn test_pattern_search_semantics() {
        let pattern = Pattern::new("Tit FOR").unwrap();
        assert!(!pattern.is_match("Tit for tat!", false));
        assert!(pattern.is_match("Tit for tat!", true));
    }

    #[test]
    fn test_constraint_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Constraint>();
    }
}
