//! Per-evaluation parser state
//!
//! A [`ParserState`] is created fresh for every `evaluate` call and dropped
//! when it returns. It owns the token cursor and the merged variable
//! bindings, so nothing leaks between calls. Registered functions receive it
//! by shared reference, which lets them read the bindings or evaluate a
//! nested expression against them.

use crate::engine::ExpressionParser;
use crate::error::{ExpressionError, Result};
use crate::model::{Value, VariableMap};

/// Token cursor plus the variable bindings of one evaluation
pub struct ParserState<'a> {
    tokens: Vec<&'a str>,
    position: usize,
    variables: VariableMap,
    engine: &'a ExpressionParser,
    depth: usize,
}

impl<'a> ParserState<'a> {
    pub(crate) fn new(
        engine: &'a ExpressionParser,
        tokens: Vec<&'a str>,
        variables: VariableMap,
    ) -> Self {
        Self {
            tokens,
            position: 0,
            variables,
            engine,
            depth: 0,
        }
    }

    /// Token at the cursor, `None` once the cursor is past the end
    #[inline]
    pub fn current(&self) -> Option<&'a str> {
        self.tokens.get(self.position).copied()
    }

    /// Move the cursor one token forward. Never fails; reading past the end yields `None`.
    #[inline]
    pub fn advance(&mut self) {
        self.position += 1;
    }

    /// Whether the current token is exactly `expected`
    #[inline]
    pub fn check(&self, expected: &str) -> bool {
        self.current() == Some(expected)
    }

    /// Consume the current token if it is `expected`, otherwise fail with an invalid expression
    pub fn expect(&mut self, expected: &str) -> Result<()> {
        if self.check(expected) {
            self.advance();
            Ok(())
        } else {
            Err(ExpressionError::invalid(self.current()))
        }
    }

    /// Whether every token has been consumed
    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Cursor position (token index)
    pub fn position(&self) -> usize {
        self.position
    }

    /// All tokens of this evaluation
    pub fn tokens(&self) -> &[&'a str] {
        &self.tokens
    }

    /// Merged bindings in effect for this evaluation
    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }

    /// The engine running this evaluation
    pub fn engine(&self) -> &'a ExpressionParser {
        self.engine
    }

    /// Evaluate a nested expression with this evaluation's bindings plus `extra`
    ///
    /// `extra` wins on name collisions. The nested evaluation gets its own
    /// state; this one is not touched.
    pub fn evaluate<I, K>(&self, expression: &str, extra: I) -> Result<Value>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut variables = self.variables.clone();
        variables.extend(extra.into_iter().map(|(k, v)| (k.into(), v)));
        self.engine.evaluate_in(expression, variables)
    }

    /// Enter one level of nesting, failing once `limit` is exceeded
    pub(crate) fn descend(&mut self, limit: Option<usize>) -> Result<()> {
        self.depth += 1;
        match limit {
            Some(limit) if self.depth > limit => Err(ExpressionError::NestingTooDeep { limit }),
            _ => Ok(()),
        }
    }

    /// Leave one level of nesting
    pub(crate) fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl std::fmt::Debug for ParserState<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserState")
            .field("tokens", &self.tokens)
            .field("position", &self.position)
            .field("variables", &self.variables.keys().collect::<Vec<_>>())
            .finish()
    }
}
