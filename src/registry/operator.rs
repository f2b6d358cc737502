//! Binary and unary operator extension points

use crate::error::Result;
use crate::model::Value;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Infix operator applied to two already-evaluated operands
pub trait BinaryOperator: Send + Sync {
    /// Apply the operator
    fn apply(&self, left: &Value, right: &Value) -> Result<Value>;
}

impl<F> BinaryOperator for F
where
    F: Fn(&Value, &Value) -> Result<Value> + Send + Sync,
{
    fn apply(&self, left: &Value, right: &Value) -> Result<Value> {
        self(left, right)
    }
}

/// Prefix operator applied to an already-evaluated operand
pub trait UnaryOperator: Send + Sync {
    /// Apply the operator
    fn apply(&self, operand: &Value) -> Result<Value>;
}

impl<F> UnaryOperator for F
where
    F: Fn(&Value) -> Result<Value> + Send + Sync,
{
    fn apply(&self, operand: &Value) -> Result<Value> {
        self(operand)
    }
}

/// Operator symbol to binary implementation
pub type OperatorMap = FxHashMap<String, Arc<dyn BinaryOperator>>;

/// Operator symbol to unary implementation
pub type UnaryOperatorMap = FxHashMap<String, Arc<dyn UnaryOperator>>;

/// Operator symbol to precedence (higher binds tighter, absent means 0)
pub type PrecedenceMap = FxHashMap<String, u32>;
