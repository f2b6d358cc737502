//! Standard function library
//!
//! Functions receive already-evaluated arguments. The array functions take
//! their per-element logic as a string expression, which they evaluate
//! through [`ParserState::evaluate`](crate::ParserState::evaluate) with extra
//! bindings: `_item_` (current element), `_index_` (its position) and, for
//! `reduce`, `_curr_` (the accumulator).

pub mod array;
pub mod datetime;
pub mod string;

use crate::error::{ExpressionError, Result};
use crate::model::Value;
use crate::registry::Registry;

/// Register all standard functions
pub fn register_standard_functions(registry: &mut Registry) {
    array::register_array_functions(registry);
    string::register_string_functions(registry);
    datetime::register_datetime_functions(registry);
}

/// Argument at `index`, `Null` when absent
fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).map(Value::force).unwrap_or_default()
}

/// String argument at `index`
fn string_arg(name: &str, args: &[Value], index: usize) -> Result<String> {
    match arg(args, index) {
        Value::String(s) => Ok(s),
        other => Err(ExpressionError::function(
            name,
            format!("argument {} must be a string, got {}", index + 1, other.type_name()),
        )),
    }
}

/// Numeric argument at `index`
fn number_arg(name: &str, args: &[Value], index: usize) -> Result<f64> {
    match arg(args, index) {
        Value::Number(n) => Ok(n),
        other => Err(ExpressionError::function(
            name,
            format!("argument {} must be a number, got {}", index + 1, other.type_name()),
        )),
    }
}
