//! Recursive-descent grammar with precedence climbing
//!
//! The grammar evaluates while it parses; there is no intermediate tree.
//!
//! ```text
//! expression := unary (binop expression)*      -- climbing on binop precedence
//! unary      := unop unary | factor
//! factor     := "(" expression ")" | number | string | "true" | "false"
//!             | array | object | path | call | identifier
//! array      := "[" (expression ("," expression)*)? "]"
//! object     := "{" entry ("," entry)* "}"
//! entry      := identifier ":" expression | spread
//! call       := name "(" (expression ","?)* ")"   -- no "," directly before ")"
//! ```
//!
//! After an operator of precedence `p`, the right operand is parsed with a
//! minimum precedence of `p + 1`, so equal-precedence chains fold to the
//! left and tighter operators bind into the right operand first. Every
//! production consumes tokens monotonically; there is no backtracking.
//!
//! Nesting depth is bounded only by the host stack unless a limit is
//! configured, in which case every nested expression and every prefix
//! operator counts one level.

use super::state::ParserState;
use crate::error::{ExpressionError, Result};
use crate::model::{ObjectMap, Value, path};
use crate::registry::{ExpressionFunction, Registry};
use std::sync::Arc;

const SPREAD: &str = "...";
const PUNCTUATION: &str = "-+*/():,<>!=%^[]{}";

/// Grammar bound to the registry of one engine
pub(crate) struct Grammar<'r> {
    registry: &'r Registry,
    max_depth: Option<usize>,
}

impl<'r> Grammar<'r> {
    pub(crate) fn new(registry: &'r Registry, max_depth: Option<usize>) -> Self {
        Self {
            registry,
            max_depth,
        }
    }

    /// Parse and evaluate an expression whose operators bind at least as tight as `min_precedence`
    pub(crate) fn parse_expression(
        &self,
        state: &mut ParserState<'_>,
        min_precedence: u32,
    ) -> Result<Value> {
        self.nested(state, |state| {
            let left = self.parse_unary_factor(state)?;
            self.climb(state, left, min_precedence)
        })
    }

    /// Fold binary operators into `left` while they bind at least as tight as `min_precedence`
    fn climb(
        &self,
        state: &mut ParserState<'_>,
        mut left: Value,
        min_precedence: u32,
    ) -> Result<Value> {
        while let Some(token) = state.current() {
            let Some(operator) = self.registry.binary_operator(token) else {
                break;
            };
            let precedence = self.registry.precedence(token);
            if precedence < min_precedence {
                break;
            }
            state.advance();
            let right = self.parse_expression(state, precedence.saturating_add(1))?;
            left = operator.apply(&left, &right)?;
        }
        Ok(left)
    }

    fn parse_unary_factor(&self, state: &mut ParserState<'_>) -> Result<Value> {
        let token = state.current().ok_or_else(|| ExpressionError::invalid(None))?;
        self.parse_unary_factor_as(state, token)
    }

    /// Unary production for the current token, read as `token`
    fn parse_unary_factor_as(&self, state: &mut ParserState<'_>, token: &str) -> Result<Value> {
        match self.registry.unary_operator(token) {
            Some(operator) => {
                state.advance();
                let operand = self.nested(state, |state| self.parse_unary_factor(state))?;
                operator.apply(&operand)
            }
            None => self.parse_factor_as(state, token),
        }
    }

    /// Factor production for the current token, read as `token`
    ///
    /// `token` differs from the cursor token only for spread entries, where
    /// the marker has been stripped.
    fn parse_factor_as(&self, state: &mut ParserState<'_>, token: &str) -> Result<Value> {
        if token == "(" {
            state.advance();
            let value = self.parse_expression(state, 0)?;
            state.expect(")")?;
            return Ok(value);
        }
        if let Some(number) = numeric_literal(token) {
            state.advance();
            return Ok(Value::Number(number));
        }
        if let Some(text) = unquote(token) {
            state.advance();
            return Ok(Value::String(text.to_string()));
        }
        match token {
            "true" | "false" => {
                state.advance();
                return Ok(Value::Boolean(token == "true"));
            }
            "[" => return self.parse_array(state),
            "{" => {
                state.advance();
                return self.parse_object(state);
            }
            _ => {}
        }
        if token.contains(['.', '[']) {
            state.advance();
            return Ok(path::resolve(state.variables(), token));
        }
        if let Some(function) = self.registry.function(token) {
            return self.parse_call(state, token, function);
        }
        if self.registry.contains_binary(token) || is_punctuation(token) {
            return Err(ExpressionError::invalid(Some(token)));
        }
        state.advance();
        match lookup(state, token) {
            // an unregistered name used as a call is malformed, not a missing value
            Err(ExpressionError::MissingVariable { .. }) if state.check("(") => {
                Err(ExpressionError::invalid(Some(token)))
            }
            resolved => resolved,
        }
    }

    fn parse_array(&self, state: &mut ParserState<'_>) -> Result<Value> {
        state.advance();
        let mut items = Vec::new();
        while !state.check("]") {
            items.push(self.parse_expression(state, 0)?);
            match state.current() {
                Some(",") => {
                    state.advance();
                    // a comma must be followed by another element
                    if state.check("]") {
                        return Err(ExpressionError::invalid(Some("]")));
                    }
                }
                Some("]") => {}
                other => return Err(ExpressionError::invalid(other)),
            }
        }
        state.advance();
        Ok(Value::Array(items))
    }

    /// Object entries; the opening brace is already consumed
    fn parse_object(&self, state: &mut ParserState<'_>) -> Result<Value> {
        let mut object = ObjectMap::new();
        loop {
            let key = state
                .current()
                .ok_or_else(|| ExpressionError::invalid_object(None))?;

            if key.contains(SPREAD) {
                let operand = key.replacen(SPREAD, "", 1);
                let value = self.nested(state, |state| {
                    let left = self.parse_unary_factor_as(state, &operand)?;
                    self.climb(state, left, 0)
                })?;
                spread_into(&mut object, value, key)?;
            } else {
                if !is_identifier(key) {
                    return Err(ExpressionError::invalid_object(Some(key)));
                }
                state.advance();
                if !state.check(":") {
                    return Err(ExpressionError::invalid_object(state.current()));
                }
                state.advance();
                if matches!(state.current(), None | Some("}" | ",")) {
                    return Err(ExpressionError::invalid_object(state.current()));
                }
                let value = self.parse_expression(state, 0)?;
                object.insert(key.to_string(), value);
            }

            match state.current() {
                Some("}") => break,
                Some(",") => state.advance(),
                other => return Err(ExpressionError::invalid_object(other)),
            }
        }
        state.advance();
        Ok(Value::Object(object))
    }

    fn parse_call(
        &self,
        state: &mut ParserState<'_>,
        name: &str,
        function: &Arc<dyn ExpressionFunction>,
    ) -> Result<Value> {
        state.advance();
        state.expect("(")?;
        let mut args = Vec::new();
        while !state.check(")") {
            args.push(self.parse_expression(state, 0)?);
            // separators are optional, but a comma must be followed by an argument
            if state.check(",") {
                state.advance();
                if state.check(")") {
                    return Err(ExpressionError::invalid(Some(")")));
                }
            }
        }
        state.advance();
        log::trace!("calling {name} with {} argument(s)", args.len());
        function.call(state, &args)
    }

    fn nested<'a, T>(
        &self,
        state: &mut ParserState<'a>,
        parse: impl FnOnce(&mut ParserState<'a>) -> Result<T>,
    ) -> Result<T> {
        state.descend(self.max_depth)?;
        let result = parse(state);
        state.ascend();
        result
    }
}

/// Resolve a bare identifier, forcing getter bindings
///
/// A stored `Null` resolves to `Null`; only an unbound name or a getter
/// yielding nothing is missing.
fn lookup(state: &ParserState<'_>, name: &str) -> Result<Value> {
    match state.variables().get(name) {
        None => Err(ExpressionError::missing_variable(name)),
        Some(Value::Lazy(getter)) => match getter() {
            Value::Null => Err(ExpressionError::missing_variable(name)),
            value => Ok(value),
        },
        Some(value) => Ok(value.clone()),
    }
}

/// Shallow-merge a spread operand into the object being built
fn spread_into(object: &mut ObjectMap, value: Value, token: &str) -> Result<()> {
    match value {
        Value::Object(entries) => object.extend(entries),
        Value::Array(items) => {
            object.extend(items.into_iter().enumerate().map(|(i, v)| (i.to_string(), v)))
        }
        Value::Null => {}
        _ => return Err(ExpressionError::invalid_object(Some(token))),
    }
    Ok(())
}

/// Decimal literal value of a token, if it is one
fn numeric_literal(token: &str) -> Option<f64> {
    let first = token.chars().next()?;
    if !(first.is_ascii_digit() || first == '.') {
        return None;
    }
    if !token
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    token.parse::<f64>().ok()
}

/// Content of a token quoted with matching `"` or `'`, taken verbatim
fn unquote(token: &str) -> Option<&str> {
    let quote = token.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    if token.len() >= 2 && token.ends_with(quote) {
        Some(&token[1..token.len() - 1])
    } else {
        None
    }
}

/// Whether a token is made only of operator or structural characters
fn is_punctuation(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| PUNCTUATION.contains(c))
}

/// Whether a token can name an object key
fn is_identifier(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
}
