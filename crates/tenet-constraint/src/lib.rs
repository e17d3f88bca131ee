//! Tenet Constraint - Composable assertion constraints
//!
//! Constraints are immutable predicate trees built with small builder
//! functions and modifiers, then evaluated against a dynamically typed
//! [`Value`]:
//!
//! ```
//! use tenet_constraint::{all, contains, evaluate, starts_with, Value};
//!
//! let phrase = Value::from("Hello Test Driven Development!");
//! assert!(evaluate(&contains("TEST").ignore_case(), &phrase).unwrap().passed());
//! assert!(evaluate(&!contains("Bye"), &phrase).unwrap().passed());
//!
//! let greetings = Value::from(vec!["Hello!", "Hi!", "Hola!"]);
//! assert!(evaluate(&all(starts_with("h")).ignore_case(), &greetings).unwrap().passed());
//! ```

mod assert;
mod constraint;
mod error;
mod evaluator;
mod report;

pub use assert::{
    assert_assignable_from, assert_contains, assert_does_not_contain, assert_does_not_end_with,
    assert_does_not_match, assert_does_not_start_with, assert_empty, assert_ends_with,
    assert_equal_ignoring_case, assert_false, assert_instance_of, assert_is_match, assert_nan,
    assert_not_assignable_from, assert_not_empty, assert_not_equal_ignoring_case,
    assert_not_instance_of, assert_not_null, assert_null, assert_starts_with, assert_that,
    assert_true,
};
pub use constraint::{
    all, any, assignable_from, assignable_to, at_least, at_most, contains, ends_with, equal_to,
    greater_than, has_length, in_range, instance_of, is_empty, is_false, is_nan, is_not_empty,
    is_not_null, is_null, is_true, less_than, matches, not, starts_with, type_of, Constraint,
    Pattern,
};
pub use error::{AssertionError, UsageError};
pub use evaluator::evaluate;
pub use report::{Evaluation, Failure};
pub use tenet_core::{Value, ValueType};
