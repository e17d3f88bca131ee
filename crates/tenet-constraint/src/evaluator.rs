//! Constraint evaluation engine

use crate::constraint::Constraint;
use crate::error::UsageError;
use crate::report::{Evaluation, Failure};
use std::borrow::Cow;
use tenet_core::Value;

/// Modifiers that apply to a whole subtree, resolved while evaluating
#[derive(Debug, Clone, Copy, Default)]
struct EvalContext {
    ignore_case: bool,
}

/// Apply `constraint` to `value`.
///
/// A value that does not satisfy the constraint yields
/// `Ok(Evaluation::Failed(..))`. `Err` is reserved for constraints that
/// cannot judge the value at all, such as `is_nan` on a string.
pub fn evaluate(constraint: &Constraint, value: &Value) -> Result<Evaluation, UsageError> {
    tracing::trace!(%constraint, value_type = %value.value_type(), "evaluating constraint");

    let result = eval(constraint, value, EvalContext::default());
    match &result {
        Ok(Evaluation::Failed(failure)) => {
            tracing::debug!(expected = %failure.expected, actual = %failure.actual, "constraint failed");
        }
        Err(err) => tracing::debug!(error = %err, "constraint misused"),
        Ok(Evaluation::Passed) => {}
    }
    result
}

fn eval(constraint: &Constraint, value: &Value, ctx: EvalContext) -> Result<Evaluation, UsageError> {
    if holds(constraint, value, ctx)? {
        Ok(Evaluation::Passed)
    } else {
        explain(constraint, value, ctx).map(Evaluation::Failed)
    }
}

/// Decide pass or fail without rendering anything
fn holds(constraint: &Constraint, value: &Value, ctx: EvalContext) -> Result<bool, UsageError> {
    match constraint {
        Constraint::IgnoreCase(inner) => holds(inner, value, EvalContext { ignore_case: true }),
        Constraint::Not(inner) => Ok(!holds(inner, value, ctx)?),

        Constraint::All(inner) => {
            for item in sequence_items(constraint, value)? {
                if !holds(inner, item.as_ref(), ctx)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Constraint::Any(inner) => {
            for item in sequence_items(constraint, value)? {
                if holds(inner, item.as_ref(), ctx)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }

        Constraint::And(a, b) => Ok(holds(a, value, ctx)? && holds(b, value, ctx)?),
        Constraint::Or(a, b) => Ok(holds(a, value, ctx)? || holds(b, value, ctx)?),

        _ => check_primitive(constraint, value, ctx),
    }
}

/// Build the failure for a constraint already known not to hold
fn explain(constraint: &Constraint, value: &Value, ctx: EvalContext) -> Result<Failure, UsageError> {
    let failure = match constraint {
        Constraint::IgnoreCase(inner) => Failure {
            expected: constraint.to_string(),
            ..explain(inner, value, EvalContext { ignore_case: true })?
        },

        Constraint::Not(inner) => Failure::new(constraint.to_string(), value.to_string())
            .with_detail(format!("but it satisfied: {}", inner)),

        Constraint::All(inner) => explain_all(constraint, inner, value, ctx)?,

        Constraint::Any(_) => {
            let count = sequence_items(constraint, value)?.len();
            Failure::new(constraint.to_string(), value.to_string())
                .with_detail(format!("none of {} item(s) matched", count))
        }

        Constraint::And(a, b) => {
            let (side, failed) = if holds(a, value, ctx)? {
                ("right", explain(b, value, ctx)?)
            } else {
                ("left", explain(a, value, ctx)?)
            };
            Failure::new(constraint.to_string(), failed.actual.clone())
                .with_detail(format!("{} side failed: {}", side, side_summary(&failed)))
        }

        Constraint::Or(a, b) => {
            let left = explain(a, value, ctx)?;
            let right = explain(b, value, ctx)?;
            Failure::new(constraint.to_string(), value.to_string()).with_detail(format!(
                "neither side was satisfied; left: {}; right: {}",
                side_summary(&left),
                side_summary(&right)
            ))
        }

        _ => Failure::new(constraint.to_string(), render_actual(constraint, value)),
    };
    Ok(failure)
}

/// One-line account of an operand's failure inside a composite
fn side_summary(failure: &Failure) -> String {
    let mut summary = format!("expected {} but was {}", failure.expected, failure.actual);
    if let Some(detail) = &failure.detail {
        summary.push_str(&format!(" ({})", detail));
    }
    summary
}

fn explain_all(
    constraint: &Constraint,
    inner: &Constraint,
    value: &Value,
    ctx: EvalContext,
) -> Result<Failure, UsageError> {
    let items = sequence_items(constraint, value)?;
    let mut first_failure: Option<(usize, Failure)> = None;
    let mut failed = 0;

    for (index, item) in items.iter().enumerate() {
        if !holds(inner, item.as_ref(), ctx)? {
            failed += 1;
            if first_failure.is_none() {
                first_failure = Some((index, explain(inner, item.as_ref(), ctx)?));
            }
        }
    }

    let mut failure = Failure::new(constraint.to_string(), value.to_string());
    if let Some((index, item_failure)) = first_failure {
        failure = failure.with_detail(format!(
            "{} of {} item(s) failed; first at index {}: {}",
            failed,
            items.len(),
            index,
            item_failure.actual
        ));
    }
    Ok(failure)
}

fn check_primitive(constraint: &Constraint, value: &Value, ctx: EvalContext) -> Result<bool, UsageError> {
    let passed = match constraint {
        Constraint::Null => value.is_null(),
        Constraint::NotNull => !value.is_null(),
        Constraint::True => value.as_bool() == Some(true),
        Constraint::False => value.as_bool() == Some(false),

        Constraint::NaN => match value {
            Value::Float(f) => f.is_nan(),
            Value::Int(_) => false,
            _ => return Err(not_numeric(constraint, value)),
        },

        Constraint::Empty => length_of(constraint, value)? == 0,
        Constraint::NotEmpty => length_of(constraint, value)? > 0,
        Constraint::HasLength(n) => length_of(constraint, value)? == *n,

        Constraint::TypeOf(ty) => value.value_type() == *ty,
        Constraint::InstanceOf(ty) | Constraint::AssignableTo(ty) => {
            value.value_type().is_subtype_of(*ty)
        }
        Constraint::AssignableFrom(ty) => ty.is_subtype_of(value.value_type()),

        Constraint::Contains(needle) => check_contains(constraint, needle, value, ctx)?,

        Constraint::StartsWith(prefix) => match string_subject(constraint, value)? {
            Some(s) => fold(s, ctx).starts_with(fold(prefix, ctx).as_str()),
            None => false,
        },
        Constraint::EndsWith(suffix) => match string_subject(constraint, value)? {
            Some(s) => fold(s, ctx).ends_with(fold(suffix, ctx).as_str()),
            None => false,
        },
        Constraint::Matches(pattern) => match string_subject(constraint, value)? {
            Some(s) => pattern.is_match(s, ctx.ignore_case),
            None => false,
        },

        Constraint::EqualTo(expected) => values_equal(value, expected, ctx),

        Constraint::GreaterThan(n) => numeric_subject(constraint, value)? > *n,
        Constraint::LessThan(n) => numeric_subject(constraint, value)? < *n,
        Constraint::AtLeast(n) => numeric_subject(constraint, value)? >= *n,
        Constraint::AtMost(n) => numeric_subject(constraint, value)? <= *n,
        Constraint::InRange { min, max } => {
            let n = numeric_subject(constraint, value)?;
            n >= *min && n <= *max
        }

        Constraint::IgnoreCase(_)
        | Constraint::Not(_)
        | Constraint::All(_)
        | Constraint::Any(_)
        | Constraint::And(..)
        | Constraint::Or(..) => return holds(constraint, value, ctx),
    };
    Ok(passed)
}

/// How a primitive shows the value it rejected
fn render_actual(constraint: &Constraint, value: &Value) -> String {
    match constraint {
        Constraint::TypeOf(_)
        | Constraint::InstanceOf(_)
        | Constraint::AssignableFrom(_)
        | Constraint::AssignableTo(_) => format!("{} ({})", value, value.value_type()),
        Constraint::Empty | Constraint::NotEmpty | Constraint::HasLength(_) => match value.len() {
            Some(len) => format!("{} (length {})", value, len),
            None => value.to_string(),
        },
        _ => value.to_string(),
    }
}

fn length_of(constraint: &Constraint, value: &Value) -> Result<usize, UsageError> {
    value.len().ok_or_else(|| UsageError::NoLength {
        constraint: constraint.to_string(),
        actual: value.value_type(),
    })
}

/// Elements a quantifier ranges over: list items, map values, or the
/// chars of a string.
fn sequence_items<'v>(
    constraint: &Constraint,
    value: &'v Value,
) -> Result<Vec<Cow<'v, Value>>, UsageError> {
    match value {
        Value::List(items) => Ok(items.iter().map(Cow::Borrowed).collect()),
        Value::Map(map) => Ok(map.values().map(Cow::Borrowed).collect()),
        Value::String(s) => Ok(s
            .chars()
            .map(|c| Cow::Owned(Value::String(c.to_string())))
            .collect()),
        other => Err(UsageError::NotASequence {
            constraint: constraint.to_string(),
            actual: other.value_type(),
        }),
    }
}

fn check_contains(
    constraint: &Constraint,
    needle: &Value,
    value: &Value,
    ctx: EvalContext,
) -> Result<bool, UsageError> {
    match value {
        Value::String(haystack) => match needle {
            Value::String(sub) => Ok(fold(haystack, ctx).contains(fold(sub, ctx).as_str())),
            other => Err(UsageError::Unsupported {
                constraint: constraint.to_string(),
                reason: format!("a string cannot contain a {}", other.value_type()),
            }),
        },
        Value::List(items) => Ok(items.iter().any(|item| values_equal(item, needle, ctx))),
        Value::Map(map) => match needle {
            Value::String(key) => {
                let key = fold(key, ctx);
                Ok(map.keys().any(|k| fold(k, ctx) == key))
            }
            other => Err(UsageError::Unsupported {
                constraint: constraint.to_string(),
                reason: format!("map keys are strings, not {}", other.value_type()),
            }),
        },
        Value::Null => Ok(false),
        other => Err(UsageError::NotASequence {
            constraint: constraint.to_string(),
            actual: other.value_type(),
        }),
    }
}

/// Strings pass through, null is a plain failure, anything else is misuse
fn string_subject<'v>(
    constraint: &Constraint,
    value: &'v Value,
) -> Result<Option<&'v str>, UsageError> {
    match value {
        Value::String(s) => Ok(Some(s.as_str())),
        Value::Null => Ok(None),
        other => Err(UsageError::NotAString {
            constraint: constraint.to_string(),
            actual: other.value_type(),
        }),
    }
}

fn numeric_subject(constraint: &Constraint, value: &Value) -> Result<f64, UsageError> {
    value.as_f64().ok_or_else(|| not_numeric(constraint, value))
}

fn not_numeric(constraint: &Constraint, value: &Value) -> UsageError {
    UsageError::NotNumeric {
        constraint: constraint.to_string(),
        actual: value.value_type(),
    }
}

/// Case-normalise when ignoring case. Upper-casing keeps `ß` and `SS` equal.
fn fold(s: &str, ctx: EvalContext) -> String {
    if ctx.ignore_case {
        s.to_uppercase()
    } else {
        s.to_string()
    }
}

/// Deep equality. Ints and floats compare numerically, NaN equals NaN,
/// strings honour the ignore-case modifier at every depth.
fn values_equal(actual: &Value, expected: &Value, ctx: EvalContext) -> bool {
    match (actual, expected) {
        (Value::String(a), Value::String(b)) => fold(a, ctx) == fold(b, ctx),
        (Value::Float(a), Value::Float(b)) if a.is_nan() && b.is_nan() => true,
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            match (actual, expected) {
                (Value::Int(a), Value::Int(b)) => a == b,
                _ => actual.as_f64() == expected.as_f64(),
            }
        }
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y, ctx))
        }
        (Value::Map(a), Value::Map(b)) => {
            a.len() == b.len()
                && a.iter().zip(b).all(|((ka, va), (kb, vb))| {
                    ka == kb && values_equal(va, vb, ctx)
                })
        }
        _ => actual == expected,
    }
}
