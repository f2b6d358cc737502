//! Logical operators
//!
//! Both operands are evaluated before an operator runs, so `and`/`or` do not
//! short-circuit; they combine truthiness into a boolean.

use crate::error::Result;
use crate::model::Value;
use crate::model::coercion::is_truthy;
use crate::registry::Registry;

/// Precedence of `or`
pub const DISJUNCTION: u32 = 1;
/// Precedence of `and`
pub const CONJUNCTION: u32 = 2;

/// Register `and`, `or` and unary `!`
pub fn register_logical_operators(registry: &mut Registry) {
    registry.register_operator("and", CONJUNCTION, and);
    registry.register_operator("or", DISJUNCTION, or);
    registry.register_unary_operator("!", not);
}

pub fn and(left: &Value, right: &Value) -> Result<Value> {
    Ok(Value::Boolean(is_truthy(left) && is_truthy(right)))
}

pub fn or(left: &Value, right: &Value) -> Result<Value> {
    Ok(Value::Boolean(is_truthy(left) || is_truthy(right)))
}

pub fn not(operand: &Value) -> Result<Value> {
    Ok(Value::Boolean(!is_truthy(operand)))
}
