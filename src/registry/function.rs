//! Function extension point

use crate::error::{ExpressionError, Result};
use crate::model::Value;
use crate::parser::ParserState;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A callable registered under a function name
///
/// Receives the state of the running evaluation followed by the evaluated
/// arguments, in source order. Whatever it returns, `Null` included, is the
/// value of the call.
pub trait ExpressionFunction: Send + Sync {
    /// Invoke the function
    fn call(&self, state: &ParserState<'_>, args: &[Value]) -> Result<Value>;
}

impl<F> ExpressionFunction for F
where
    F: Fn(&ParserState<'_>, &[Value]) -> Result<Value> + Send + Sync,
{
    fn call(&self, state: &ParserState<'_>, args: &[Value]) -> Result<Value> {
        self(state, args)
    }
}

/// Function name to implementation
pub type FunctionMap = FxHashMap<String, Arc<dyn ExpressionFunction>>;

/// Check that `args` holds between `min` and `max` arguments
pub fn check_arity(name: &str, args: &[Value], min: usize, max: Option<usize>) -> Result<()> {
    let actual = args.len();
    if actual < min || max.is_some_and(|max| actual > max) {
        return Err(ExpressionError::InvalidArity {
            name: name.to_string(),
            min,
            max,
            actual,
        });
    }
    Ok(())
}
