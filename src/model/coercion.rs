//! Dynamic coercions shared by the standard operators and functions
//!
//! The engine itself never coerces; these helpers give the standard library
//! the usual dynamic-language behavior (truthiness, numeric conversion of
//! strings and booleans, numeric-or-lexical ordering).

use super::value::Value;
use std::cmp::Ordering;

/// Truthiness: `false`, `0`, `NaN`, `""` and `null` are falsy, everything else is truthy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Number(n) => !(*n == 0.0 || n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Boolean(b) => *b,
        Value::Array(_) | Value::Object(_) | Value::Opaque(_) => true,
        Value::Lazy(getter) => is_truthy(&getter()),
    }
}

/// Numeric conversion; values with no numeric reading become `NaN`
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Number(n) => *n,
        Value::Boolean(b) => f64::from(u8::from(*b)),
        Value::String(s) => parse_numeric_string(s),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => parse_numeric_string(&single.to_string()),
            _ => f64::NAN,
        },
        Value::Object(_) | Value::Opaque(_) => f64::NAN,
        Value::Lazy(getter) => to_number(&getter()),
    }
}

fn parse_numeric_string(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).map_or(f64::NAN, |n| n as f64);
    }
    // f64::from_str also accepts "inf" and "nan", which are not numeric literals here
    if trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        trimmed.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Equality with numeric coercion between numbers, numeric strings and booleans
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Lazy(getter), other) | (other, Value::Lazy(getter)) => {
            loose_equals(&getter(), other)
        }
        (Value::Number(_), Value::String(_) | Value::Boolean(_))
        | (Value::String(_) | Value::Boolean(_), Value::Number(_))
        | (Value::String(_), Value::Boolean(_))
        | (Value::Boolean(_), Value::String(_)) => to_number(left) == to_number(right),
        _ => left == right,
    }
}

/// Ordering used by `<`, `>`, `<=`, `>=`: lexical for two strings, numeric otherwise
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => to_number(left).partial_cmp(&to_number(right)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Null, false)]
    #[case(Value::from(0), false)]
    #[case(Value::from(f64::NAN), false)]
    #[case(Value::from(""), false)]
    #[case(Value::from("hello"), true)]
    #[case(Value::from(-1), true)]
    #[case(Value::Array(vec![]), true)]
    #[case(Value::object(Vec::<(String, Value)>::new()), true)]
    fn truthiness(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_truthy(&value), expected);
    }

    #[rstest]
    #[case(Value::from(true), 1.0)]
    #[case(Value::from(false), 0.0)]
    #[case(Value::from("5"), 5.0)]
    #[case(Value::from(" 2.5 "), 2.5)]
    #[case(Value::from(""), 0.0)]
    #[case(Value::from("0x1F"), 31.0)]
    #[case(Value::Null, 0.0)]
    #[case(Value::Array(vec![Value::from("7")]), 7.0)]
    fn numeric_conversion(#[case] value: Value, #[case] expected: f64) {
        assert_eq!(to_number(&value), expected);
    }

    #[test]
    fn non_numeric_strings_are_nan() {
        assert!(to_number(&Value::from("inf")).is_nan());
        assert!(to_number(&Value::from("abc")).is_nan());
        assert!(to_number(&Value::Array(vec![Value::from(1), Value::from(2)])).is_nan());
    }

    #[test]
    fn loose_equality_coerces_scalars_only() {
        assert!(loose_equals(&Value::from(5), &Value::from("5")));
        assert!(loose_equals(&Value::from(1), &Value::from(true)));
        assert!(!loose_equals(&Value::from("a"), &Value::from(0)));
        assert!(loose_equals(
            &Value::Array(vec![Value::from(1)]),
            &Value::Array(vec![Value::from(1)])
        ));
    }

    #[test]
    fn comparison_is_lexical_for_strings() {
        assert_eq!(compare(&Value::from("b"), &Value::from("a")), Some(Ordering::Greater));
        assert_eq!(compare(&Value::from("10"), &Value::from(9)), Some(Ordering::Greater));
        assert_eq!(compare(&Value::from("x"), &Value::from(1)), None);
    }
}
