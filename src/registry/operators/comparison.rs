//! Equality and ordering operators

use crate::error::Result;
use crate::model::Value;
use crate::model::coercion::{compare, loose_equals};
use crate::registry::Registry;
use std::cmp::Ordering;

/// Precedence of `==` and `!=`
pub const EQUALITY: u32 = 3;
/// Precedence of `<`, `>`, `<=` and `>=`
pub const RELATIONAL: u32 = 4;

/// Register `== != < > <= >=`
pub fn register_comparison_operators(registry: &mut Registry) {
    registry.register_operator("==", EQUALITY, equals);
    registry.register_operator("!=", EQUALITY, not_equals);
    registry.register_operator("<", RELATIONAL, less_than);
    registry.register_operator(">", RELATIONAL, greater_than);
    registry.register_operator("<=", RELATIONAL, less_or_equal);
    registry.register_operator(">=", RELATIONAL, greater_or_equal);
}

pub fn equals(left: &Value, right: &Value) -> Result<Value> {
    Ok(Value::Boolean(loose_equals(left, right)))
}

pub fn not_equals(left: &Value, right: &Value) -> Result<Value> {
    Ok(Value::Boolean(!loose_equals(left, right)))
}

pub fn less_than(left: &Value, right: &Value) -> Result<Value> {
    Ok(ordered(left, right, |o| o == Ordering::Less))
}

pub fn greater_than(left: &Value, right: &Value) -> Result<Value> {
    Ok(ordered(left, right, |o| o == Ordering::Greater))
}

pub fn less_or_equal(left: &Value, right: &Value) -> Result<Value> {
    Ok(ordered(left, right, |o| o != Ordering::Greater))
}

pub fn greater_or_equal(left: &Value, right: &Value) -> Result<Value> {
    Ok(ordered(left, right, |o| o != Ordering::Less))
}

// unordered pairs (anything involving NaN) compare false
fn ordered(left: &Value, right: &Value, accept: impl Fn(Ordering) -> bool) -> Value {
    Value::Boolean(compare(&left.force(), &right.force()).is_some_and(accept))
}
