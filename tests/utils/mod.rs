//! Shared helpers for integration tests

#![allow(dead_code)]

use formula_engine::{ExpressionError, ExpressionParser, Value, create_parser};
use std::sync::Once;

static LOGGER: Once = Once::new();

/// Route engine logs through env_logger; `RUST_LOG=formula_engine=trace` shows token streams
pub fn init_logging() {
    LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Standard engine with logging enabled
pub fn parser() -> ExpressionParser {
    init_logging();
    create_parser()
}

/// Value built from a JSON literal
pub fn json(value: serde_json::Value) -> Value {
    Value::from(value)
}

/// Evaluate with the standard engine and no variables
pub fn eval(expression: &str) -> Value {
    parser()
        .evaluate(expression)
        .unwrap_or_else(|e| panic!("{expression:?} failed: {e}"))
}

/// Evaluate with the standard engine, expecting failure
pub fn eval_err(expression: &str) -> ExpressionError {
    match parser().evaluate(expression) {
        Ok(value) => panic!("{expression:?} unexpectedly evaluated to {value:?}"),
        Err(e) => e,
    }
}

/// Assert a float result that must be negative zero
pub fn assert_negative_zero(value: &Value) {
    let n = value.as_f64().expect("number");
    assert!(n == 0.0 && n.is_sign_negative(), "expected -0, got {n}");
}
