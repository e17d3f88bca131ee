//! Tenet Core - Foundational types for the Tenet constraint engine
//!
//! This crate provides the types that all other Tenet crates depend on:
//! - `Value` - The dynamically typed subject of a constraint
//! - `ValueType` - Runtime type lattice used by the type constraints
//! - Error types and Result alias

mod error;
mod types;
mod value;

pub use error::{Result, TenetError};
pub use types::ValueType;
pub use value::Value;
