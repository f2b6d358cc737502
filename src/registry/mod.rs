//! Function and operator registry
//!
//! The registry holds the three extension points (functions, binary
//! operators, unary operators) and the precedence table. Every `set_*` call
//! is an additive merge: entries with the same name are replaced, all others
//! are kept. Parsing only reads the registry.

pub mod function;
pub mod functions;
pub mod operator;
pub mod operators;

pub use function::{ExpressionFunction, FunctionMap, check_arity};
pub use operator::{BinaryOperator, OperatorMap, PrecedenceMap, UnaryOperator, UnaryOperatorMap};

use crate::error::Result;
use crate::model::Value;
use crate::parser::ParserState;
use std::sync::Arc;

/// Functions, operators and precedence owned by one engine
#[derive(Clone, Default)]
pub struct Registry {
    functions: FunctionMap,
    operators: OperatorMap,
    unary_operators: UnaryOperatorMap,
    precedence: PrecedenceMap,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge functions into the registry
    pub fn set_functions(&mut self, functions: FunctionMap) {
        log::debug!("registering {} function(s)", functions.len());
        self.functions.extend(functions);
    }

    /// Merge binary operators into the registry
    pub fn set_operators(&mut self, operators: OperatorMap) {
        log::debug!("registering {} operator(s)", operators.len());
        self.operators.extend(operators);
    }

    /// Merge unary operators into the registry
    pub fn set_unary_operators(&mut self, unary_operators: UnaryOperatorMap) {
        log::debug!("registering {} unary operator(s)", unary_operators.len());
        self.unary_operators.extend(unary_operators);
    }

    /// Merge precedence entries into the registry
    pub fn set_operator_precedence(&mut self, precedence: PrecedenceMap) {
        self.precedence.extend(precedence);
    }

    /// Register a single function
    pub fn register_function<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&ParserState<'_>, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
    }

    /// Register a single binary operator together with its precedence
    pub fn register_operator<F>(&mut self, symbol: impl Into<String>, precedence: u32, operator: F)
    where
        F: Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        let symbol = symbol.into();
        self.precedence.insert(symbol.clone(), precedence);
        self.operators.insert(symbol, Arc::new(operator));
    }

    /// Register a single unary operator
    pub fn register_unary_operator<F>(&mut self, symbol: impl Into<String>, operator: F)
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.unary_operators.insert(symbol.into(), Arc::new(operator));
    }

    /// Get a function by name
    pub fn function(&self, name: &str) -> Option<&Arc<dyn ExpressionFunction>> {
        self.functions.get(name)
    }

    /// Get a binary operator by symbol
    pub fn binary_operator(&self, symbol: &str) -> Option<&Arc<dyn BinaryOperator>> {
        self.operators.get(symbol)
    }

    /// Get a unary operator by symbol
    pub fn unary_operator(&self, symbol: &str) -> Option<&Arc<dyn UnaryOperator>> {
        self.unary_operators.get(symbol)
    }

    /// Precedence of an operator symbol, 0 when none was set
    pub fn precedence(&self, symbol: &str) -> u32 {
        self.precedence.get(symbol).copied().unwrap_or(0)
    }

    /// Check if a function exists
    pub fn contains_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Check if a binary operator exists
    pub fn contains_binary(&self, symbol: &str) -> bool {
        self.operators.contains_key(symbol)
    }

    /// Check if a unary operator exists
    pub fn contains_unary(&self, symbol: &str) -> bool {
        self.unary_operators.contains_key(symbol)
    }

    /// All registered function names
    pub fn function_names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }

    /// All registered binary operator symbols
    pub fn binary_operator_symbols(&self) -> Vec<&str> {
        self.operators.keys().map(String::as_str).collect()
    }

    /// All registered unary operator symbols
    pub fn unary_operator_symbols(&self) -> Vec<&str> {
        self.unary_operators.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("functions", &self.function_names())
            .field("operators", &self.binary_operator_symbols())
            .field("unary_operators", &self.unary_operator_symbols())
            .field("precedence", &self.precedence)
            .finish()
    }
}

/// Create a registry holding the standard operators and functions
pub fn create_standard_registry() -> Registry {
    let mut registry = Registry::new();
    operators::register_standard_operators(&mut registry);
    functions::register_standard_functions(&mut registry);
    registry
}
