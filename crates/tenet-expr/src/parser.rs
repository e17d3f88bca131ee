//! Constraint expression parser

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tenet_constraint::{self as c, Constraint, UsageError, Value, ValueType};
use thiserror::Error;

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct ConstraintParser;

#[derive(Debug, Error)]
pub enum ExprError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Unknown type: {0}")]
    UnknownType(String),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error(transparent)]
    InvalidConstraint(#[from] UsageError),
}

/// Parse a constraint expression such as `starts with "hello" ignoring case`
pub fn parse_constraint(input: &str) -> Result<Constraint, ExprError> {
    let pairs = ConstraintParser::parse(Rule::constraint, input)
        .map_err(|e| ExprError::ParseError(e.to_string()))?;

    for pair in pairs {
        for inner in pair.into_inner() {
            if inner.as_rule() == Rule::expr {
                let constraint = build_expr(inner)?;
                tracing::trace!(input, %constraint, "parsed constraint expression");
                return Ok(constraint);
            }
        }
    }

    Err(ExprError::ParseError("empty expression".to_string()))
}

fn build_expr(pair: Pair<Rule>) -> Result<Constraint, ExprError> {
    let mut result: Option<Constraint> = None;
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::and_expr {
            let rhs = build_and(inner)?;
            result = Some(match result {
                Some(lhs) => lhs.or(rhs),
                None => rhs,
            });
        }
    }
    result.ok_or_else(|| ExprError::ParseError("missing operand".to_string()))
}

fn build_and(pair: Pair<Rule>) -> Result<Constraint, ExprError> {
    let mut result: Option<Constraint> = None;
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::unary {
            let rhs = build_unary(inner)?;
            result = Some(match result {
                Some(lhs) => lhs.and(rhs),
                None => rhs,
            });
        }
    }
    result.ok_or_else(|| ExprError::ParseError("missing operand".to_string()))
}

fn build_unary(pair: Pair<Rule>) -> Result<Constraint, ExprError> {
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::negation => return Ok(build_operand(inner)?.negate()),
            Rule::universal => return Ok(c::all(build_operand(inner)?)),
            Rule::existential => return Ok(c::any(build_operand(inner)?)),
            Rule::atom => return build_atom(inner),
            _ => {}
        }
    }
    Err(ExprError::ParseError("missing operand".to_string()))
}

/// The unary operand following a `not`/`all`/`any` keyword
fn build_operand(pair: Pair<Rule>) -> Result<Constraint, ExprError> {
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::unary {
            return build_unary(inner);
        }
    }
    Err(ExprError::ParseError("missing operand".to_string()))
}

fn build_atom(pair: Pair<Rule>) -> Result<Constraint, ExprError> {
    let mut constraint = None;
    let mut ignore_case = false;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::group => {
                for group_inner in inner.into_inner() {
                    if group_inner.as_rule() == Rule::expr {
                        constraint = Some(build_expr(group_inner)?);
                    }
                }
            }
            Rule::primitive => constraint = Some(build_primitive(inner)?),
            Rule::ignoring_case => ignore_case = true,
            _ => {}
        }
    }

    let constraint =
        constraint.ok_or_else(|| ExprError::ParseError("missing operand".to_string()))?;
    Ok(if ignore_case {
        constraint.ignore_case()
    } else {
        constraint
    })
}

fn build_primitive(pair: Pair<Rule>) -> Result<Constraint, ExprError> {
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| ExprError::ParseError("empty constraint".to_string()))?;

    let constraint = match inner.as_rule() {
        Rule::is_null => c::is_null(),
        Rule::is_not_null => c::is_not_null(),
        Rule::is_true => c::is_true(),
        Rule::is_false => c::is_false(),
        Rule::is_nan => c::is_nan(),
        Rule::is_empty => c::is_empty(),
        Rule::is_not_empty => c::is_not_empty(),
        Rule::is_type => c::type_of(type_operand(inner)?),
        Rule::is_instance => c::instance_of(type_operand(inner)?),
        Rule::is_assignable_from => c::assignable_from(type_operand(inner)?),
        Rule::is_assignable_to => c::assignable_to(type_operand(inner)?),
        Rule::contains => c::contains(literal_operand(inner)?),
        Rule::starts_with => c::starts_with(string_operand(inner)?),
        Rule::ends_with => c::ends_with(string_operand(inner)?),
        Rule::matches => c::matches(&string_operand(inner)?)?,
        Rule::equals => c::equal_to(literal_operand(inner)?),
        Rule::has_length => {
            let text = child(inner, Rule::integer)?;
            let n = text
                .as_str()
                .parse::<usize>()
                .map_err(|_| ExprError::InvalidNumber(text.as_str().to_string()))?;
            c::has_length(n)
        }
        Rule::between => {
            let bounds = inner
                .into_inner()
                .filter(|p| p.as_rule() == Rule::number)
                .map(|p| parse_f64(p.as_str()))
                .collect::<Result<Vec<_>, _>>()?;
            match bounds.as_slice() {
                [min, max] => c::in_range(*min, *max)?,
                _ => return Err(ExprError::ParseError("between needs two bounds".to_string())),
            }
        }
        Rule::comparison => build_comparison(inner)?,
        rule => return Err(ExprError::ParseError(format!("unexpected {:?}", rule))),
    };

    Ok(constraint)
}

fn build_comparison(pair: Pair<Rule>) -> Result<Constraint, ExprError> {
    let mut comparator = "";
    let mut bound = 0.0;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::comparator => comparator = inner.as_str(),
            Rule::number => bound = parse_f64(inner.as_str())?,
            _ => {}
        }
    }

    match comparator {
        ">" => Ok(c::greater_than(bound)),
        "<" => Ok(c::less_than(bound)),
        ">=" => Ok(c::at_least(bound)),
        "<=" => Ok(c::at_most(bound)),
        other => Err(ExprError::ParseError(format!("invalid comparator: {}", other))),
    }
}

fn child(pair: Pair<Rule>, rule: Rule) -> Result<Pair<Rule>, ExprError> {
    pair.into_inner()
        .find(|p| p.as_rule() == rule)
        .ok_or_else(|| ExprError::ParseError(format!("missing {:?}", rule)))
}

fn type_operand(pair: Pair<Rule>) -> Result<ValueType, ExprError> {
    let name = child(pair, Rule::type_name)?.as_str().to_string();
    name.parse().map_err(|_| ExprError::UnknownType(name))
}

fn string_operand(pair: Pair<Rule>) -> Result<String, ExprError> {
    Ok(string_content(child(pair, Rule::string)?))
}

fn literal_operand(pair: Pair<Rule>) -> Result<Value, ExprError> {
    parse_literal(child(pair, Rule::literal)?)
}

fn string_content(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .find(|p| matches!(p.as_rule(), Rule::sq_inner | Rule::dq_inner))
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

fn parse_literal(pair: Pair<Rule>) -> Result<Value, ExprError> {
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::string => return Ok(Value::String(string_content(inner))),
            Rule::number => return parse_number(inner.as_str()),
            Rule::kw_true => return Ok(Value::Bool(true)),
            Rule::kw_false => return Ok(Value::Bool(false)),
            Rule::kw_null => return Ok(Value::Null),
            Rule::list => {
                let items = inner
                    .into_inner()
                    .filter(|p| p.as_rule() == Rule::literal)
                    .map(parse_literal)
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(Value::List(items));
            }
            _ => {}
        }
    }

    Err(ExprError::ParseError("empty literal".to_string()))
}

/// Integers stay integers; anything with a fraction or exponent is a float
fn parse_number(text: &str) -> Result<Value, ExprError> {
    if text.contains(['.', 'e', 'E']) {
        parse_f64(text).map(Value::Float)
    } else {
        text.parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ExprError::InvalidNumber(text.to_string()))
    }
}

fn parse_f64(text: &str) -> Result<f64, ExprError> {
    text.parse::<f64>()
        .map_err(|_| ExprError::InvalidNumber(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenet_constraint::evaluate;

    fn check(expr: &str, value: impl Into<Value>) -> bool {
        let constraint = parse_constraint(expr).unwrap();
        evaluate(&constraint, &value.into()).unwrap().passed()
    }

    #[test]
    fn test_simple_primitives() {
        assert_eq!(parse_constraint("is null").unwrap(), c::is_null());
        assert_eq!(parse_constraint("is not null").unwrap(), c::is_not_null());
        assert_eq!(parse_constraint("is NaN").unwrap(), c::is_nan());
        assert_eq!(parse_constraint("is not empty").unwrap(), c::is_not_empty());
        assert_eq!(parse_constraint("  is true ").unwrap(), c::is_true());
    }

    #[test]
    fn test_type_constraints() {
        assert_eq!(
            parse_constraint("is type string").unwrap(),
            c::type_of(ValueType::String)
        );
        assert_eq!(
            parse_constraint("is instance of number").unwrap(),
            c::instance_of(ValueType::Number)
        );
        assert_eq!(
            parse_constraint("is assignable from int").unwrap(),
            c::assignable_from(ValueType::Int)
        );
        assert_eq!(
            parse_constraint("is assignable to sequence").unwrap(),
            c::assignable_to(ValueType::Sequence)
        );
    }

    #[test]
    fn test_unknown_type() {
        assert!(matches!(
            parse_constraint("is type widget"),
            Err(ExprError::UnknownType(name)) if name == "widget"
        ));
    }

    #[test]
    fn test_string_constraints() {
        assert_eq!(
            parse_constraint("starts with \"HELLO\" ignoring case").unwrap(),
            c::starts_with("HELLO").ignore_case()
        );
        assert_eq!(
            parse_constraint("not contains 'Bye'").unwrap(),
            c::not(c::contains("Bye"))
        );
        assert_eq!(
            parse_constraint("ends with '!'").unwrap(),
            c::ends_with("!")
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            parse_constraint("equals ['one', \"two\", 3, 4.5, true, null]").unwrap(),
            c::equal_to(Value::List(vec![
                Value::from("one"),
                Value::from("two"),
                Value::Int(3),
                Value::Float(4.5),
                Value::Bool(true),
                Value::Null,
            ]))
        );
        assert_eq!(parse_constraint("equals []").unwrap(), c::equal_to(Value::List(vec![])));
        assert_eq!(parse_constraint("contains -2").unwrap(), c::contains(-2));
    }

    #[test]
    fn test_numeric_constraints() {
        assert_eq!(parse_constraint("> 5").unwrap(), c::greater_than(5));
        assert_eq!(parse_constraint(">= 5").unwrap(), c::at_least(5));
        assert_eq!(parse_constraint("<= -1.5").unwrap(), c::at_most(-1.5));
        assert_eq!(
            parse_constraint("between 0 and 180").unwrap(),
            c::in_range(0, 180).unwrap()
        );
        assert_eq!(parse_constraint("has length 3").unwrap(), c::has_length(3));
    }

    #[test]
    fn test_quantifiers() {
        assert_eq!(
            parse_constraint("all starts with 'h' ignoring case").unwrap(),
            c::all(c::starts_with("h").ignore_case())
        );
        assert_eq!(
            parse_constraint("any equals 'b'").unwrap(),
            c::any(c::equal_to("b"))
        );
    }

    #[test]
    fn test_precedence() {
        // `and` binds tighter than `or`, `not` tighter than both
        assert_eq!(
            parse_constraint("is null or not is empty and has length 2").unwrap(),
            c::is_null().or(c::not(c::is_empty()).and(c::has_length(2)))
        );
        assert_eq!(
            parse_constraint("(is null or is empty) ignoring case").unwrap(),
            c::is_null().or(c::is_empty()).ignore_case()
        );
    }

    #[test]
    fn test_between_and_does_not_split() {
        assert_eq!(
            parse_constraint("between 1 and 2 and > 1.5").unwrap(),
            c::in_range(1, 2).unwrap().and(c::greater_than(1.5))
        );
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        assert!(matches!(
            parse_constraint("matches '(oops'"),
            Err(ExprError::InvalidConstraint(UsageError::InvalidPattern { .. }))
        ));
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        assert!(matches!(
            parse_constraint("between 5 and 1"),
            Err(ExprError::InvalidConstraint(UsageError::InvalidRange { .. }))
        ));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(parse_constraint(""), Err(ExprError::ParseError(_))));
        assert!(matches!(parse_constraint("is nul"), Err(ExprError::ParseError(_))));
        assert!(matches!(parse_constraint("starts with 5"), Err(ExprError::ParseError(_))));
        assert!(matches!(parse_constraint("isnull"), Err(ExprError::ParseError(_))));
        assert!(matches!(parse_constraint("is null and"), Err(ExprError::ParseError(_))));
    }

    #[test]
    fn test_parsed_constraints_evaluate() {
        assert!(check("matches 'Ti.*tat!'", "Tit for tat!"));
        assert!(check("matches 'Tit FOR' ignoring case", "Tit for tat!"));
        assert!(check(
            "all matches 'never' ignoring case",
            vec!["Never say never", "It's never too late", "Nevermore!"]
        ));
        assert!(check(
            "equals ['one', 'two', 'three'] ignoring case",
            vec!["ONE", "Two", "THRee"]
        ));
        assert!(check("not is type string", 5));
        assert!(!check("is empty", "nonempty"));
    }
}
