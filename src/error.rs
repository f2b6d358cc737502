//! Error types for expression evaluation
//!
//! Every failure unwinds out of [`ExpressionParser::evaluate`](crate::ExpressionParser::evaluate)
//! unchanged. Grammar violations and unresolved identifiers are raised by the
//! engine itself; the `Function`, `Operator` and `InvalidArity` variants are
//! what registered callables use to report their own domain errors.

use thiserror::Error;

/// Result type alias for expression operations
pub type Result<T> = std::result::Result<T, ExpressionError>;

/// Errors produced while configuring the engine or evaluating an expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// Grammar violation: unexpected or missing token, unbalanced grouping,
    /// trailing tokens, or a binary operator in value position
    #[error("Invalid expression{}", near.as_ref().map(|t| format!(" near '{t}'")).unwrap_or_default())]
    InvalidExpression {
        /// The offending token, `None` when the input ended early
        near: Option<String>,
    },

    /// Malformed object literal syntax
    #[error("Invalid object literal{}", near.as_ref().map(|t| format!(" near '{t}'")).unwrap_or_default())]
    InvalidObjectLiteral {
        /// The offending token, `None` when the input ended early
        near: Option<String>,
    },

    /// A bare identifier resolved to no value
    #[error("No value provided for variable {name}")]
    MissingVariable {
        /// Name of the identifier that could not be resolved
        name: String,
    },

    /// The caller-supplied tokenizer pattern failed to compile
    #[error("Invalid tokenizer pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The configured nesting limit was exceeded
    #[error("Expression nesting exceeds the limit of {limit}")]
    NestingTooDeep {
        /// Configured maximum nesting depth
        limit: usize,
    },

    /// A registered function was called with the wrong number of arguments
    #[error("Function '{name}' expects {min}-{} arguments, got {actual}", max.map_or("∞".to_string(), |n| n.to_string()))]
    InvalidArity {
        /// Function name
        name: String,
        /// Minimum arguments
        min: usize,
        /// Maximum arguments (None for unlimited)
        max: Option<usize>,
        /// Actual arguments provided
        actual: usize,
    },

    /// Domain error raised by a registered function
    #[error("Function '{name}' error: {message}")]
    Function {
        /// Function name
        name: String,
        /// Human-readable error message
        message: String,
    },

    /// Domain error raised by a registered operator
    #[error("Operator '{operator}' error: {message}")]
    Operator {
        /// Operator symbol
        operator: String,
        /// Human-readable error message
        message: String,
    },
}

impl ExpressionError {
    /// Invalid expression at the given token (or at end of input)
    pub fn invalid(near: Option<&str>) -> Self {
        Self::InvalidExpression {
            near: near.map(str::to_string),
        }
    }

    /// Invalid object literal at the given token (or at end of input)
    pub fn invalid_object(near: Option<&str>) -> Self {
        Self::InvalidObjectLiteral {
            near: near.map(str::to_string),
        }
    }

    /// Missing value for a bare identifier
    pub fn missing_variable(name: impl Into<String>) -> Self {
        Self::MissingVariable { name: name.into() }
    }

    /// Domain error for a registered function
    pub fn function(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Function {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Domain error for a registered operator
    pub fn operator(operator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Operator {
            operator: operator.into(),
            message: message.into(),
        }
    }

    /// Whether this is a grammar failure (as opposed to resolution or domain errors)
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidExpression { .. } | Self::InvalidObjectLiteral { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_expression_message_keeps_prefix() {
        assert_eq!(ExpressionError::invalid(None).to_string(), "Invalid expression");
        assert_eq!(
            ExpressionError::invalid(Some(")")).to_string(),
            "Invalid expression near ')'"
        );
    }

    #[test]
    fn missing_variable_names_the_identifier() {
        assert_eq!(
            ExpressionError::missing_variable("unknownVar").to_string(),
            "No value provided for variable unknownVar"
        );
    }

    #[test]
    fn arity_message_handles_unbounded_max() {
        let err = ExpressionError::InvalidArity {
            name: "concat".into(),
            min: 1,
            max: None,
            actual: 0,
        };
        assert_eq!(err.to_string(), "Function 'concat' expects 1-∞ arguments, got 0");
    }

    #[test]
    fn syntax_error_classification() {
        assert!(ExpressionError::invalid_object(Some("name")).is_syntax_error());
        assert!(!ExpressionError::missing_variable("x").is_syntax_error());
    }
}
