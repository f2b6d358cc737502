//! Expression engine - the main entry point for evaluation
//!
//! An [`ExpressionParser`] owns its registry, default variables and tokenizer.
//! Configuration takes `&mut self` and evaluation takes `&self`, so a
//! configured engine can be shared across threads by reference while the
//! borrow checker rules out reconfiguring it mid-evaluation. Hosts that need
//! to reconfigure a shared engine use [`SharedExpressionParser`].

use crate::error::{ExpressionError, Result};
use crate::model::{Value, VariableMap};
use crate::parser::grammar::Grammar;
use crate::parser::{ParserState, Tokenizer};
use crate::registry::{
    FunctionMap, OperatorMap, PrecedenceMap, Registry, UnaryOperatorMap, create_standard_registry,
};
use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;

/// Construction options, all optional
///
/// Everything except `unary_operators` can be loaded from JSON or any other
/// serde format:
///
/// ```json
/// { "variables": { "x": 4 }, "pattern": "&&|\\|\\|", "max_depth": 256 }
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Default variable bindings for every evaluation
    pub variables: VariableMap,
    /// Extra tokenizer alternative, tried after all built-in ones
    pub pattern: Option<String>,
    /// Initial operator precedence table
    pub operator_precedence: PrecedenceMap,
    /// Maximum nesting depth; unbounded when `None`
    pub max_depth: Option<usize>,
    /// Initial unary operators
    #[serde(skip)]
    pub unary_operators: UnaryOperatorMap,
}

impl std::fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserOptions")
            .field("variables", &self.variables)
            .field("pattern", &self.pattern)
            .field("operator_precedence", &self.operator_precedence)
            .field("max_depth", &self.max_depth)
            .field(
                "unary_operators",
                &self.unary_operators.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Configurable expression evaluator
#[derive(Clone, Debug, Default)]
pub struct ExpressionParser {
    variables: VariableMap,
    registry: Registry,
    tokenizer: Tokenizer,
    max_depth: Option<usize>,
}

impl ExpressionParser {
    /// Create an engine with no functions, operators or variables
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine from construction options
    ///
    /// Fails only if `options.pattern` is not a valid regular expression.
    pub fn with_options(options: ParserOptions) -> Result<Self> {
        Self::build(Registry::new(), options)
    }

    /// Create an engine preloaded with the standard operators and functions
    pub fn standard() -> Self {
        Self {
            registry: create_standard_registry(),
            ..Self::default()
        }
    }

    fn build(mut registry: Registry, options: ParserOptions) -> Result<Self> {
        let tokenizer = Tokenizer::new(options.pattern.as_deref())?;
        registry.set_operator_precedence(options.operator_precedence);
        registry.set_unary_operators(options.unary_operators);
        Ok(Self {
            variables: options.variables,
            registry,
            tokenizer,
            max_depth: options.max_depth,
        })
    }

    /// Merge functions; same-named entries are replaced
    pub fn set_functions(&mut self, functions: FunctionMap) {
        self.registry.set_functions(functions);
    }

    /// Merge binary operators; same-named entries are replaced
    pub fn set_operators(&mut self, operators: OperatorMap) {
        self.registry.set_operators(operators);
    }

    /// Merge unary operators; same-named entries are replaced
    pub fn set_unary_operators(&mut self, unary_operators: UnaryOperatorMap) {
        self.registry.set_unary_operators(unary_operators);
    }

    /// Merge operator precedence entries
    pub fn set_operator_precedence(&mut self, precedence: PrecedenceMap) {
        self.registry.set_operator_precedence(precedence);
    }

    /// Merge default variable bindings
    pub fn set_variables<I, K, V>(&mut self, variables: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.variables
            .extend(variables.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Register a single function
    pub fn register_function<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&ParserState<'_>, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.registry.register_function(name, function);
    }

    /// Register a single binary operator with its precedence
    pub fn register_operator<F>(&mut self, symbol: impl Into<String>, precedence: u32, operator: F)
    where
        F: Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.registry.register_operator(symbol, precedence, operator);
    }

    /// Register a single unary operator
    pub fn register_unary_operator<F>(&mut self, symbol: impl Into<String>, operator: F)
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.registry.register_unary_operator(symbol, operator);
    }

    /// Default variable bindings
    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }

    /// Registered functions and operators
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Split `text` into tokens with this engine's tokenizer
    pub fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.tokenizer.tokenize(text)
    }

    /// Evaluate an expression against the default variables
    pub fn evaluate(&self, expression: &str) -> Result<Value> {
        self.evaluate_in(expression, self.variables.clone())
    }

    /// Evaluate an expression with extra variables; they win over the defaults
    pub fn evaluate_with<I, K, V>(&self, expression: &str, variables: I) -> Result<Value>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut merged = self.variables.clone();
        merged.extend(variables.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.evaluate_in(expression, merged)
    }

    /// Evaluate against an already merged set of bindings
    pub(crate) fn evaluate_in(&self, expression: &str, variables: VariableMap) -> Result<Value> {
        let tokens = self.tokenizer.tokenize(expression);
        log::trace!("evaluating {expression:?} as {tokens:?}");

        let mut state = ParserState::new(self, tokens, variables);
        let grammar = Grammar::new(&self.registry, self.max_depth);
        let result = grammar
            .parse_expression(&mut state, 0)
            .and_then(|value| match state.current() {
                None => Ok(value),
                Some(trailing) => Err(ExpressionError::invalid(Some(trailing))),
            });

        if let Err(error) = &result {
            log::debug!("failed to evaluate {expression:?}: {error}");
        }
        result
    }
}

/// Create an engine with the standard operators and functions
pub fn create_parser() -> ExpressionParser {
    ExpressionParser::standard()
}

/// Create a standard engine, then apply `options` on top of it
///
/// Precedence and unary operators from `options` replace the standard
/// entries of the same name.
pub fn create_parser_with(options: ParserOptions) -> Result<ExpressionParser> {
    ExpressionParser::build(create_standard_registry(), options)
}

/// Engine behind a read/write lock, for hosts that reconfigure while sharing
///
/// Each configuration call takes the write lock; each evaluation holds the
/// read lock until it returns, so configuration never interleaves with a
/// running evaluation. Clones share the same engine.
#[derive(Clone, Debug, Default)]
pub struct SharedExpressionParser {
    inner: Arc<RwLock<ExpressionParser>>,
}

impl SharedExpressionParser {
    /// Share an engine
    pub fn new(parser: ExpressionParser) -> Self {
        Self {
            inner: Arc::new(RwLock::new(parser)),
        }
    }

    /// Evaluate under the read lock
    pub fn evaluate(&self, expression: &str) -> Result<Value> {
        self.inner.read().evaluate(expression)
    }

    /// Evaluate with extra variables under the read lock
    pub fn evaluate_with<I, K, V>(&self, expression: &str, variables: I) -> Result<Value>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.inner.read().evaluate_with(expression, variables)
    }

    /// Run `configure` under the write lock
    pub fn configure<R>(&self, configure: impl FnOnce(&mut ExpressionParser) -> R) -> R {
        configure(&mut self.inner.write())
    }

    /// Merge functions under the write lock
    pub fn set_functions(&self, functions: FunctionMap) {
        self.inner.write().set_functions(functions);
    }

    /// Merge binary operators under the write lock
    pub fn set_operators(&self, operators: OperatorMap) {
        self.inner.write().set_operators(operators);
    }

    /// Merge unary operators under the write lock
    pub fn set_unary_operators(&self, unary_operators: UnaryOperatorMap) {
        self.inner.write().set_unary_operators(unary_operators);
    }

    /// Merge precedence entries under the write lock
    pub fn set_operator_precedence(&self, precedence: PrecedenceMap) {
        self.inner.write().set_operator_precedence(precedence);
    }

    /// Merge default variables under the write lock
    pub fn set_variables<I, K, V>(&self, variables: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.inner.write().set_variables(variables);
    }
}

impl From<ExpressionParser> for SharedExpressionParser {
    fn from(parser: ExpressionParser) -> Self {
        Self::new(parser)
    }
}
