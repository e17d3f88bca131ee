//! Tenet Expr - Textual constraint language
//!
//! Parses human-readable expressions such as
//! `all starts with "h" ignoring case` or `is not null and > 0`
//! into [`Constraint`](tenet_constraint::Constraint) trees.

mod parser;

pub use parser::{parse_constraint, ExprError};
