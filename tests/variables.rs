//! Variable resolution, getter bindings and per-call isolation

mod utils;

use formula_engine::{ExpressionError, ParserOptions, Value, create_parser_with};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use utils::{eval_err, json, parser};

#[rstest]
#[case("unknownVar")]
#[case("5 + unknownVar")]
#[case("[1, unknownVar]")]
#[case("{ a: unknownVar }")]
fn undefined_variable_is_named(#[case] expression: &str) {
    let err = eval_err(expression);
    assert_eq!(err, ExpressionError::missing_variable("unknownVar"));
    assert_eq!(err.to_string(), "No value provided for variable unknownVar");
}

#[test]
fn null_binding_resolves_to_null() {
    let parser = parser();
    assert_eq!(parser.evaluate_with("nothing", [("nothing", Value::Null)]).unwrap(), Value::Null);
    assert_eq!(
        parser.evaluate_with("x", [("x", json(json!(null)))]).unwrap(),
        Value::Null
    );
}

#[test]
fn null_elements_reach_array_expressions() {
    let parser = parser();
    let vars = [("xs", json(json!([1, null, 2])))];
    assert_eq!(
        parser.evaluate_with(r#"map(xs, "_item_")"#, vars.clone()).unwrap(),
        json(json!([1, null, 2]))
    );
    assert_eq!(
        parser.evaluate_with(r#"filter(xs, "_item_")"#, vars.clone()).unwrap(),
        json(json!([1, 2]))
    );
    assert_eq!(
        parser.evaluate_with(r#"reduce(xs, "_item_", 0)"#, vars).unwrap(),
        Value::from(2)
    );
}

#[test]
fn calling_an_unregistered_name_is_invalid() {
    for expression in ["unknownFunction(5)", "add(", "add(5"] {
        assert!(
            matches!(eval_err(expression), ExpressionError::InvalidExpression { .. }),
            "{expression}"
        );
    }
    // without a following `(` the name is an ordinary missing variable
    assert_eq!(
        eval_err("add 5)").to_string(),
        "No value provided for variable add"
    );
}

#[rstest]
#[case("dynamicValue", Value::from(42))]
#[case("dynamicValue + 10", Value::from(52))]
#[case("dynamicValue * 2", Value::from(84))]
#[case("dynamicValue > 50", Value::from(false))]
#[case("-dynamicValue", Value::from(-42))]
#[case("!dynamicValue", Value::from(false))]
#[case("(dynamicValue + staticVar) * 2 - 4", Value::from(180))]
fn getters_are_forced_on_lookup(#[case] expression: &str, #[case] expected: Value) {
    let value = parser()
        .evaluate_with(
            expression,
            [
                ("dynamicValue", Value::lazy(|| Value::from(42))),
                ("staticVar", Value::from(50)),
            ],
        )
        .unwrap();
    assert_eq!(value, expected);
}

#[test]
fn getters_returning_structured_values() {
    let parser = parser();
    let vars = [
        ("getArray", Value::lazy(|| json(json!([1, 2, 3, 4])))),
        ("getUser", Value::lazy(|| json(json!({ "name": "John", "age": 30 })))),
        ("getMessage", Value::lazy(|| Value::from("Hello, World!"))),
        ("isActive", Value::lazy(|| Value::from(true))),
        ("isDisabled", Value::lazy(|| Value::from(false))),
        ("getCount", Value::lazy(|| Value::from(0))),
    ];
    assert_eq!(parser.evaluate_with("getArray", vars.clone()).unwrap(), json(json!([1, 2, 3, 4])));
    assert_eq!(
        parser.evaluate_with("getUser", vars.clone()).unwrap(),
        json(json!({ "name": "John", "age": 30 }))
    );
    assert_eq!(parser.evaluate_with("getMessage", vars.clone()).unwrap(), Value::from("Hello, World!"));
    assert_eq!(parser.evaluate_with("isActive and true", vars.clone()).unwrap(), Value::from(true));
    assert_eq!(parser.evaluate_with("isDisabled or false", vars.clone()).unwrap(), Value::from(false));
    assert_eq!(parser.evaluate_with("getCount == 0", vars).unwrap(), Value::from(true));
}

#[test]
fn getter_returning_null_is_missing() {
    let err = parser()
        .evaluate_with("getUndefined", [("getUndefined", Value::lazy(|| Value::Null))])
        .unwrap_err();
    assert_eq!(err.to_string(), "No value provided for variable getUndefined");
}

#[test]
fn getters_are_not_forced_along_paths() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let getter = Value::lazy(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        json(json!({ "value": 1 }))
    });

    let parser = parser();
    // the root is a getter, so the path cannot be followed
    let value = parser
        .evaluate_with("holder.value", [("holder", getter.clone())])
        .unwrap();
    assert_eq!(value, Value::Null);

    // a getter at the end of a path comes back unforced
    let mut inner = formula_engine::ObjectMap::new();
    inner.insert("lazy".into(), getter);
    let value = parser
        .evaluate_with("outer.lazy", [("outer", Value::Object(inner))])
        .unwrap();
    assert!(matches!(value, Value::Lazy(_)));

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn call_variables_override_defaults() {
    let parser = create_parser_with(ParserOptions {
        variables: [("x".to_string(), Value::from(5)), ("y".to_string(), Value::from(1))]
            .into_iter()
            .collect(),
        ..ParserOptions::default()
    })
    .unwrap();

    assert_eq!(parser.evaluate("x + y").unwrap(), Value::from(6));
    assert_eq!(parser.evaluate_with("x + y", [("x", 10)]).unwrap(), Value::from(11));
    assert_eq!(parser.evaluate("x + y").unwrap(), Value::from(6));
}

#[test]
fn evaluation_is_idempotent() {
    let mut parser = parser();
    parser.set_variables([("base", 2)]);
    let functions_before = parser.registry().function_names().len();
    let operators_before = parser.registry().binary_operator_symbols().len();

    let expression = "{ total: base * n, items: [n, n + 1], label: 'n' + n }";
    let first = parser.evaluate_with(expression, [("n", 3)]).unwrap();
    let second = parser.evaluate_with(expression, [("n", 3)]).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first,
        json(json!({ "total": 6, "items": [3, 4], "label": "n3" }))
    );
    assert_eq!(parser.registry().function_names().len(), functions_before);
    assert_eq!(parser.registry().binary_operator_symbols().len(), operators_before);
    assert_eq!(parser.variables().len(), 1);
    assert!(parser.variables().get("n").is_none());
}
