//! Configurable formula engine
//!
//! Turns a textual formula such as `(2 + 3) * 4 - x` or
//! `unique(products, "_item_.name")` into a [`Value`], against caller-supplied
//! variables, binary operators, unary operators and functions.
//!
//! The engine itself knows only literals, grouping, arrays, objects (with
//! spread), variable and path lookup, and function calls. Every operator and
//! function is registered: [`ExpressionParser::new`] starts empty, while
//! [`create_parser`] preloads the standard arithmetic, comparison and logical
//! operators plus the array, string, regex and date functions.
//!
//! ```
//! use formula_engine::{Value, create_parser};
//!
//! let parser = create_parser();
//! let value = parser.evaluate_with("(2 + 3) * 4 - x", [("x", 4)]).unwrap();
//! assert_eq!(value, Value::from(16));
//! ```

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod registry;

pub use engine::{
    ExpressionParser, ParserOptions, SharedExpressionParser, create_parser, create_parser_with,
};
pub use error::{ExpressionError, Result};
pub use model::{Getter, ObjectMap, Value, VariableMap};
pub use parser::{ParserState, Tokenizer};
pub use registry::{
    BinaryOperator, ExpressionFunction, FunctionMap, OperatorMap, PrecedenceMap, Registry,
    UnaryOperator, UnaryOperatorMap,
};
