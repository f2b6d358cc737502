//! Registered functions: custom callables and the standard library

mod utils;

use formula_engine::{
    ExpressionError, ExpressionFunction, FunctionMap, ParserOptions, ParserState, Result, Value,
    create_parser_with,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use utils::{eval, json, parser};

fn products() -> Value {
    json(json!([
        { "name": "Product 1", "price": 150, "quantity": 2 },
        { "name": "Product 2", "price": 80, "quantity": 0 },
        { "name": "Product 3", "price": 200, "quantity": 5 },
        { "name": "Product 4", "price": 120, "quantity": 1 },
        { "name": "Product 4", "price": 120, "quantity": 1 }
    ]))
}

fn number(args: &[Value], index: usize) -> f64 {
    args.get(index).and_then(Value::as_f64).unwrap_or_default()
}

fn text_length(args: &[Value], index: usize) -> Value {
    Value::from(args.get(index).and_then(Value::as_str).map_or(0, |s| s.chars().count()))
}

#[test]
fn custom_functions_receive_evaluated_arguments() {
    let mut parser = create_parser_with(ParserOptions {
        variables: [("x".to_string(), Value::from(5))].into_iter().collect(),
        ..ParserOptions::default()
    })
    .unwrap();

    let mut functions = FunctionMap::default();
    functions.insert(
        "add".into(),
        Arc::new(|_: &ParserState<'_>, args: &[Value]| -> Result<Value> {
            Ok(Value::from(number(args, 0) + number(args, 1)))
        }) as Arc<dyn ExpressionFunction>,
    );
    functions.insert(
        "length".into(),
        Arc::new(|_: &ParserState<'_>, args: &[Value]| -> Result<Value> {
            Ok(text_length(args, 0))
        }) as Arc<dyn ExpressionFunction>,
    );
    functions.insert(
        "length_all".into(),
        Arc::new(|_: &ParserState<'_>, args: &[Value]| -> Result<Value> {
            Ok(Value::Array((0..args.len()).map(|i| text_length(args, i)).collect()))
        }) as Arc<dyn ExpressionFunction>,
    );
    parser.set_functions(functions);

    assert_eq!(parser.evaluate("add(1 + 1, 5) + x").unwrap(), Value::from(12));
    assert_eq!(parser.evaluate(r#"length("ADI") + 5"#).unwrap(), Value::from(8));
    assert_eq!(
        parser.evaluate(r#"length_all("ADI", "FA", "TK")"#).unwrap(),
        json(json!([3, 2, 2]))
    );
}

#[test]
fn argument_lists() {
    let mut parser = parser();
    parser.register_function("count", |_, args| Ok(Value::from(args.len())));

    assert_eq!(parser.evaluate("count()").unwrap(), Value::from(0));
    assert_eq!(parser.evaluate("count(1, [2, 3], { a: 4 })").unwrap(), Value::from(3));
    assert_eq!(parser.evaluate("count(count(1, 2))").unwrap(), Value::from(1));
    // separators between arguments are optional
    assert_eq!(parser.evaluate("count(1 2)").unwrap(), Value::from(2));
    assert_eq!(parser.evaluate("count(1, 2 3)").unwrap(), Value::from(3));

    for expression in ["count(1,)", "count(", "count(1", "count 1", "count(,1)"] {
        assert!(
            matches!(
                parser.evaluate(expression),
                Err(ExpressionError::InvalidExpression { .. })
            ),
            "{expression}"
        );
    }
}

#[test]
fn function_result_is_returned_as_is() {
    let mut parser = parser();
    parser.register_function("nothing", |_, _| Ok(Value::Null));
    parser.register_function("handle", |_, _| Ok(Value::opaque(7_u8)));
    parser.register_function("unwrap", |_, args| {
        let byte = args
            .first()
            .and_then(|v| v.downcast_ref::<u8>())
            .copied()
            .ok_or_else(|| ExpressionError::function("unwrap", "not a handle"))?;
        Ok(Value::from(i32::from(byte)))
    });

    assert_eq!(parser.evaluate("nothing()").unwrap(), Value::Null);
    assert_eq!(parser.evaluate("unwrap(handle()) + 1").unwrap(), Value::from(8));
    assert_eq!(
        parser.evaluate("unwrap(1)"),
        Err(ExpressionError::function("unwrap", "not a handle"))
    );
}

#[test]
fn functions_can_read_bindings_and_evaluate() {
    let mut parser = parser();
    parser.register_function("has", |state, args| {
        let name = args.first().and_then(Value::as_str).unwrap_or_default();
        Ok(Value::from(state.variables().contains_key(name)))
    });
    parser.register_function("twice", |state, args| {
        let expression = args.first().and_then(Value::as_str).unwrap_or_default();
        let once = state.evaluate(expression, [("k", Value::from(2))])?;
        state.evaluate("v + v", [("v", once)])
    });

    assert_eq!(parser.evaluate_with("has('x')", [("x", 1)]).unwrap(), Value::from(true));
    assert_eq!(parser.evaluate("has('x')").unwrap(), Value::from(false));
    assert_eq!(
        parser.evaluate_with("twice('k * y')", [("y", 5)]).unwrap(),
        Value::from(20)
    );
}

#[test]
fn array_methods() {
    let parser = parser();
    let vars = [("products", products())];

    assert_eq!(
        parser
            .evaluate_with("unique(xs)", [("xs", json(json!([1, 1, 4, 5, 6, 6, 7, 7, 8, 8])))])
            .unwrap(),
        json(json!([1, 4, 5, 6, 7, 8]))
    );
    assert_eq!(
        parser.evaluate_with(r#"unique(products, "_item_.name")"#, vars.clone()).unwrap(),
        json(json!([
            { "name": "Product 1", "price": 150, "quantity": 2 },
            { "name": "Product 2", "price": 80, "quantity": 0 },
            { "name": "Product 3", "price": 200, "quantity": 5 },
            { "name": "Product 4", "price": 120, "quantity": 1 }
        ]))
    );
    assert_eq!(
        parser
            .evaluate_with(
                r#"filter(products, "_item_.price > 100 and _item_.quantity > 0")"#,
                vars.clone()
            )
            .unwrap(),
        json(json!([
            { "name": "Product 1", "price": 150, "quantity": 2 },
            { "name": "Product 3", "price": 200, "quantity": 5 },
            { "name": "Product 4", "price": 120, "quantity": 1 },
            { "name": "Product 4", "price": 120, "quantity": 1 }
        ]))
    );
    assert_eq!(
        parser.evaluate_with(r#"map(products, "_item_.name")"#, vars.clone()).unwrap(),
        json(json!(["Product 1", "Product 2", "Product 3", "Product 4", "Product 4"]))
    );
    assert_eq!(
        parser.evaluate_with(r#"find(products, "_item_.price > 0")"#, vars.clone()).unwrap(),
        json(json!({ "name": "Product 1", "price": 150, "quantity": 2 }))
    );
    assert_eq!(
        parser.evaluate_with(r#"some(products, "_item_.price == 200")"#, vars.clone()).unwrap(),
        Value::from(true)
    );
    assert_eq!(
        parser.evaluate_with(r#"every(products, "_item_.price > 100")"#, vars.clone()).unwrap(),
        Value::from(false)
    );
    assert_eq!(
        parser.evaluate_with(r#"reduce(products, "_curr_ + _item_.price", 0)"#, vars).unwrap(),
        Value::from(670)
    );
}

#[test]
fn regex() {
    assert_eq!(eval(r#"regex("ddd212sdf", "\d\w\d")"#), Value::from(true));
    assert_eq!(eval(r#"regex("ddd212sdf", "\d\w\d", "y")"#), Value::from(false));
}

#[test]
fn dates() {
    assert_eq!(eval(r#"date_day(date("2020-01-01"))"#), Value::from(1));
    assert_eq!(eval(r#"date_month(date("2020-01-01"))"#), Value::from(1));
    assert_eq!(eval(r#"date_year(date("2020-01-01"))"#), Value::from(2020));
    assert_eq!(eval(r#"date_format("DD-MM-YYYY", "2020-01-01")"#), Value::from("01-01-2020"));
    assert_eq!(
        eval(r#"date_format("DD-MM-YYYY", date_plus(1, "day", "2020-01-05"))"#),
        Value::from("06-01-2020")
    );
    assert_eq!(
        eval(r#"date_format("DD-MM-YYYY", date_plus(-1, "day", "2020-01-05"))"#),
        Value::from("04-01-2020")
    );
    assert_eq!(
        eval(r#"date_format("DD-MM-YYYY", date_minus(1, "day", "2020-01-05"))"#),
        Value::from("04-01-2020")
    );
    assert_eq!(
        eval(r#"date_format("DD-MM-YYYY", date_minus(-1, "day", "2020-01-05"))"#),
        Value::from("06-01-2020")
    );
}

#[test]
fn domain_errors_propagate_unchanged() {
    let mut parser = parser();
    parser.register_function("fail", |_, _| Err(ExpressionError::function("fail", "boom")));
    assert_eq!(
        parser.evaluate("1 + fail()"),
        Err(ExpressionError::function("fail", "boom"))
    );
    assert_eq!(
        parser.evaluate("fail()").unwrap_err().to_string(),
        "Function 'fail' error: boom"
    );
}
