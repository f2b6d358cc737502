//! Array functions driven by string expressions

use super::{arg, string_arg};
use crate::error::{ExpressionError, Result};
use crate::model::Value;
use crate::model::coercion::is_truthy;
use crate::parser::ParserState;
use crate::registry::{Registry, check_arity};

const ITEM: &str = "_item_";
const INDEX: &str = "_index_";
const ACCUMULATOR: &str = "_curr_";

/// Register `unique`, `filter`, `map`, `find`, `some`, `every` and `reduce`
pub fn register_array_functions(registry: &mut Registry) {
    registry.register_function("unique", unique);
    registry.register_function("filter", filter);
    registry.register_function("map", map);
    registry.register_function("find", find);
    registry.register_function("some", some);
    registry.register_function("every", every);
    registry.register_function("reduce", reduce);
}

/// `unique(array[, keyExpr])`: first occurrence of each element (or of each key)
pub fn unique(state: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("unique", args, 1, Some(2))?;
    let items = array_arg("unique", args)?;
    let key_expression = match args.get(1) {
        Some(_) => Some(string_arg("unique", args, 1)?),
        None => None,
    };

    let mut seen: Vec<Value> = Vec::new();
    let mut kept = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        let key = match &key_expression {
            Some(expression) => state.evaluate(expression, bindings(&item, index))?,
            None => item.clone(),
        };
        if !seen.contains(&key) {
            seen.push(key);
            kept.push(item);
        }
    }
    Ok(Value::Array(kept))
}

/// `filter(array, predicate)`: elements for which the predicate is truthy
pub fn filter(state: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    let (items, predicate) = iteration_args("filter", args)?;
    let mut kept = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        if is_truthy(&state.evaluate(&predicate, bindings(&item, index))?) {
            kept.push(item);
        }
    }
    Ok(Value::Array(kept))
}

/// `map(array, expression)`: the expression evaluated for every element
pub fn map(state: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    let (items, expression) = iteration_args("map", args)?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| state.evaluate(&expression, bindings(item, index)))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

/// `find(array, predicate)`: first matching element, `Null` if none
pub fn find(state: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    let (items, predicate) = iteration_args("find", args)?;
    for (index, item) in items.into_iter().enumerate() {
        if is_truthy(&state.evaluate(&predicate, bindings(&item, index))?) {
            return Ok(item);
        }
    }
    Ok(Value::Null)
}

/// `some(array, predicate)`: whether any element matches
pub fn some(state: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    let (items, predicate) = iteration_args("some", args)?;
    for (index, item) in items.iter().enumerate() {
        if is_truthy(&state.evaluate(&predicate, bindings(item, index))?) {
            return Ok(Value::Boolean(true));
        }
    }
    Ok(Value::Boolean(false))
}

/// `every(array, predicate)`: whether all elements match; true for an empty array
pub fn every(state: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    let (items, predicate) = iteration_args("every", args)?;
    for (index, item) in items.iter().enumerate() {
        if !is_truthy(&state.evaluate(&predicate, bindings(item, index))?) {
            return Ok(Value::Boolean(false));
        }
    }
    Ok(Value::Boolean(true))
}

/// `reduce(array, expression, initial)`: fold with `_curr_` as the accumulator
pub fn reduce(state: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("reduce", args, 3, Some(3))?;
    let items = array_arg("reduce", args)?;
    let expression = string_arg("reduce", args, 1)?;

    let mut accumulator = arg(args, 2);
    for (index, item) in items.iter().enumerate() {
        let [item, index] = bindings(item, index);
        accumulator =
            state.evaluate(&expression, [item, index, (ACCUMULATOR, accumulator)])?;
    }
    Ok(accumulator)
}

fn iteration_args(name: &str, args: &[Value]) -> Result<(Vec<Value>, String)> {
    check_arity(name, args, 2, Some(2))?;
    Ok((array_arg(name, args)?, string_arg(name, args, 1)?))
}

fn array_arg(name: &str, args: &[Value]) -> Result<Vec<Value>> {
    match arg(args, 0) {
        Value::Array(items) => Ok(items),
        other => Err(ExpressionError::function(
            name,
            format!("argument 1 must be an array, got {}", other.type_name()),
        )),
    }
}

fn bindings(item: &Value, index: usize) -> [(&'static str, Value); 2] {
    [(ITEM, item.clone()), (INDEX, Value::from(index))]
}
