//! String functions and regular-expression matching

use super::{arg, string_arg};
use crate::error::{ExpressionError, Result};
use crate::model::Value;
use crate::parser::ParserState;
use crate::registry::{Registry, check_arity};
use regex::Regex;

/// Register `regex`, `length`, `upper`, `lower`, `trim`, `concat`, `join` and `split`
pub fn register_string_functions(registry: &mut Registry) {
    registry.register_function("regex", matches_pattern);
    registry.register_function("length", length);
    registry.register_function("upper", upper);
    registry.register_function("lower", lower);
    registry.register_function("trim", trim);
    registry.register_function("concat", concat);
    registry.register_function("join", join);
    registry.register_function("split", split);
}

/// `regex(text, pattern[, flags])`: whether `pattern` matches `text`
///
/// Flags: `i` case-insensitive, `m` multi-line, `s` dot matches newline,
/// `y` match only at the start of `text`. `g` and `u` are accepted and
/// change nothing for a single test.
pub fn matches_pattern(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("regex", args, 2, Some(3))?;
    let text = arg(args, 0).to_string();
    let pattern = string_arg("regex", args, 1)?;
    let flags = match args.get(2) {
        Some(_) => string_arg("regex", args, 2)?,
        None => String::new(),
    };

    let regex = compile(&pattern, &flags)?;
    Ok(Value::Boolean(regex.is_match(&text)))
}

fn compile(pattern: &str, flags: &str) -> Result<Regex> {
    let mut inline = String::new();
    let mut sticky = false;
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' if !inline.contains(flag) => inline.push(flag),
            'i' | 'm' | 's' | 'g' | 'u' => {}
            'y' => sticky = true,
            other => {
                return Err(ExpressionError::function(
                    "regex",
                    format!("unsupported flag '{other}'"),
                ));
            }
        }
    }

    let mut source = if sticky {
        format!(r"\A(?:{pattern})")
    } else {
        pattern.to_string()
    };
    if !inline.is_empty() {
        source = format!("(?{inline}){source}");
    }
    Regex::new(&source).map_err(|e| ExpressionError::function("regex", e.to_string()))
}

/// `length(value)`: characters of a string, elements of an array, entries of an object
pub fn length(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("length", args, 1, Some(1))?;
    match arg(args, 0) {
        Value::String(s) => Ok(Value::from(s.chars().count())),
        Value::Array(items) => Ok(Value::from(items.len())),
        Value::Object(map) => Ok(Value::from(map.len())),
        other => Err(ExpressionError::function(
            "length",
            format!("{} has no length", other.type_name()),
        )),
    }
}

pub fn upper(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("upper", args, 1, Some(1))?;
    Ok(Value::String(string_arg("upper", args, 0)?.to_uppercase()))
}

pub fn lower(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("lower", args, 1, Some(1))?;
    Ok(Value::String(string_arg("lower", args, 0)?.to_lowercase()))
}

pub fn trim(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("trim", args, 1, Some(1))?;
    Ok(Value::String(string_arg("trim", args, 0)?.trim().to_string()))
}

/// `concat(...)`: string forms of all arguments joined together
pub fn concat(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("concat", args, 1, None)?;
    Ok(Value::String(args.iter().map(Value::to_string).collect()))
}

/// `join(array[, separator])`, separator defaults to `,`
pub fn join(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("join", args, 1, Some(2))?;
    let separator = match args.get(1) {
        Some(_) => string_arg("join", args, 1)?,
        None => ",".to_string(),
    };
    match arg(args, 0) {
        Value::Array(items) => Ok(Value::String(
            items
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(&separator),
        )),
        other => Err(ExpressionError::function(
            "join",
            format!("argument 1 must be an array, got {}", other.type_name()),
        )),
    }
}

/// `split(text, separator)`; an empty separator splits into characters
pub fn split(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("split", args, 2, Some(2))?;
    let text = string_arg("split", args, 0)?;
    let separator = string_arg("split", args, 1)?;
    let parts: Vec<Value> = if separator.is_empty() {
        text.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        text.split(separator.as_str()).map(Value::from).collect()
    };
    Ok(Value::Array(parts))
}
