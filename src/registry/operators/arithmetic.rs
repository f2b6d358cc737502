//! Arithmetic operators and numeric negation

use crate::error::Result;
use crate::model::Value;
use crate::model::coercion::to_number;
use crate::registry::Registry;

/// Precedence of `+` and `-`
pub const ADDITIVE: u32 = 5;
/// Precedence of `*`, `/` and `%`
pub const MULTIPLICATIVE: u32 = 6;
/// Precedence of `^`
pub const POWER: u32 = 7;

/// Register `+ - * / % ^` and unary `-`
pub fn register_arithmetic_operators(registry: &mut Registry) {
    registry.register_operator("+", ADDITIVE, add);
    registry.register_operator("-", ADDITIVE, subtract);
    registry.register_operator("*", MULTIPLICATIVE, multiply);
    registry.register_operator("/", MULTIPLICATIVE, divide);
    registry.register_operator("%", MULTIPLICATIVE, remainder);
    registry.register_operator("^", POWER, power);
    registry.register_unary_operator("-", negate);
}

/// String concatenation when either side is textual, numeric addition otherwise
pub fn add(left: &Value, right: &Value) -> Result<Value> {
    let (left, right) = (left.force(), right.force());
    let textual = |v: &Value| matches!(v, Value::String(_) | Value::Array(_) | Value::Object(_));
    if textual(&left) || textual(&right) {
        return Ok(Value::String(format!("{left}{right}")));
    }
    Ok(Value::Number(to_number(&left) + to_number(&right)))
}

/// Numeric subtraction
pub fn subtract(left: &Value, right: &Value) -> Result<Value> {
    Ok(Value::Number(to_number(left) - to_number(right)))
}

/// Numeric multiplication
pub fn multiply(left: &Value, right: &Value) -> Result<Value> {
    Ok(Value::Number(to_number(left) * to_number(right)))
}

/// IEEE division; dividing by zero yields an infinity or `NaN`
pub fn divide(left: &Value, right: &Value) -> Result<Value> {
    Ok(Value::Number(to_number(left) / to_number(right)))
}

/// Truncated remainder, taking the sign of the dividend
pub fn remainder(left: &Value, right: &Value) -> Result<Value> {
    Ok(Value::Number(to_number(left) % to_number(right)))
}

/// Exponentiation
pub fn power(left: &Value, right: &Value) -> Result<Value> {
    Ok(Value::Number(to_number(left).powf(to_number(right))))
}

/// Numeric negation
pub fn negate(operand: &Value) -> Result<Value> {
    Ok(Value::Number(-to_number(operand)))
}
