//! Numeric checks. Unlike the text checks these accept raw `Number` (and,
//! for `is_boolean`, `Bool`) values as well as their textual forms, so they
//! work with both normalized and type-preserved declarations.

use serde_json::Value;

use super::{float_bounds, int_arg, int_bounds, require_args};
use crate::error::{ChainError, ChainResult};
use crate::value::{as_f64, as_i64};

/// Whether the value is an integer, within optional `{ "min": _, "max": _ }`
/// bounds. Accepts a raw integral number or text that parses as one.
pub fn is_int(value: &Value, args: &[Value]) -> ChainResult<bool> {
    let (min, max) = int_bounds("is_int", args)?;
    let Some(n) = as_i64(value) else {
        return Ok(false);
    };
    Ok(min.is_none_or(|m| n >= m) && max.is_none_or(|m| n <= m))
}

/// Whether the value is a finite float, within optional bounds. Any raw
/// number qualifies; text must parse to something finite.
pub fn is_float(value: &Value, args: &[Value]) -> ChainResult<bool> {
    let (min, max) = float_bounds("is_float", args)?;
    let Some(f) = as_f64(value) else {
        return Ok(false);
    };
    Ok(min.is_none_or(|m| f >= m) && max.is_none_or(|m| f <= m))
}

/// Whether the value is numeric in the plain decimal sense: optional sign,
/// digits, at most one decimal point with digits after it. No exponents.
pub fn is_numeric(value: &Value, _args: &[Value]) -> ChainResult<bool> {
    match value {
        Value::Number(_) => Ok(true),
        Value::String(s) => Ok(numeric_text(s)),
        _ => Ok(false),
    }
}

fn numeric_text(s: &str) -> bool {
    let rest = s.strip_prefix(['+', '-']).unwrap_or(s);
    match rest.split_once('.') {
        None => !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()),
        Some((int_part, frac)) => {
            !frac.is_empty()
                && frac.bytes().all(|b| b.is_ascii_digit())
                && int_part.bytes().all(|b| b.is_ascii_digit())
        }
    }
}

/// Whether the value is an integer divisible by the (non-zero) divisor.
pub fn is_divisible_by(value: &Value, args: &[Value]) -> ChainResult<bool> {
    require_args("is_divisible_by", args, 1)?;
    let divisor = int_arg("is_divisible_by", args, 0, "divisor")?;
    if divisor == 0 {
        return Err(ChainError::invalid_argument(
            "is_divisible_by",
            "divisor must be non-zero",
        ));
    }
    Ok(as_i64(value).is_some_and(|n| n % divisor == 0))
}

/// Whether the value is a valid port number (0–65535).
pub fn is_port(value: &Value, _args: &[Value]) -> ChainResult<bool> {
    match value {
        Value::Number(n) => Ok(n.as_u64().is_some_and(|p| p <= 65535)),
        Value::String(s) => Ok(!s.is_empty() && s.parse::<u16>().is_ok()),
        _ => Ok(false),
    }
}

/// Whether the value is a boolean: a raw `Bool`, or one of the texts
/// `"true"`, `"false"`, `"0"`, `"1"`.
pub fn is_boolean(value: &Value, _args: &[Value]) -> ChainResult<bool> {
    match value {
        Value::Bool(_) => Ok(true),
        Value::String(s) => Ok(matches!(s.as_str(), "true" | "false" | "0" | "1")),
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("17"), true)]
    #[case(json!(17), true)]
    #[case(json!("-3"), true)]
    #[case(json!("017"), true)]
    #[case(json!("17.5"), false)]
    #[case(json!(17.5), false)]
    #[case(json!("seventeen"), false)]
    #[case(json!(""), false)]
    #[case(json!(true), false)]
    fn is_int_cases(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_int(&value, &[]).unwrap(), expected);
    }

    #[test]
    fn is_int_honours_bounds() {
        let bounds = [json!({"min": 18, "max": 120})];
        assert!(is_int(&json!("18"), &bounds).unwrap());
        assert!(!is_int(&json!("17"), &bounds).unwrap());
        assert!(!is_int(&json!("121"), &bounds).unwrap());
        assert!(is_int(&json!("17"), &[json!({"max": 17})]).unwrap());
        assert!(is_int(&json!("17"), &[json!({"min": "x"})]).is_err());
    }

    #[rstest]
    #[case(json!("17.5"), true)]
    #[case(json!(".5"), true)]
    #[case(json!("1e3"), true)]
    #[case(json!(17), true)]
    #[case(json!("nan"), false)]
    #[case(json!("inf"), false)]
    #[case(json!(""), false)]
    fn is_float_cases(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_float(&value, &[]).unwrap(), expected);
    }

    #[test]
    fn is_float_honours_bounds() {
        let bounds = [json!({"min": 0.5, "max": 1.5})];
        assert!(is_float(&json!("1.0"), &bounds).unwrap());
        assert!(!is_float(&json!("0.4"), &bounds).unwrap());
    }

    #[rstest]
    #[case("17", true)]
    #[case("-17.5", true)]
    #[case("+.5", true)]
    #[case("5.", false)]
    #[case(".", false)]
    #[case("1e3", false)]
    #[case("", false)]
    #[case("1,000", false)]
    fn is_numeric_cases(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_numeric(&json!(text), &[]).unwrap(), expected);
    }

    #[test]
    fn divisibility() {
        assert!(is_divisible_by(&json!("12"), &[json!(3)]).unwrap());
        assert!(!is_divisible_by(&json!("13"), &[json!(3)]).unwrap());
        assert!(!is_divisible_by(&json!("x"), &[json!(3)]).unwrap());
        assert!(is_divisible_by(&json!("12"), &[json!(0)]).is_err());
        assert!(is_divisible_by(&json!("12"), &[]).is_err());
    }

    #[rstest]
    #[case(json!("8080"), true)]
    #[case(json!("0"), true)]
    #[case(json!("65535"), true)]
    #[case(json!("65536"), false)]
    #[case(json!(8080), true)]
    #[case(json!(-1), false)]
    #[case(json!(""), false)]
    #[case(json!("http"), false)]
    fn is_port_cases(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_port(&value, &[]).unwrap(), expected);
    }

    #[rstest]
    #[case(json!(true), true)]
    #[case(json!("true"), true)]
    #[case(json!("0"), true)]
    #[case(json!("yes"), false)]
    #[case(json!(1), false)]
    fn is_boolean_cases(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_boolean(&value, &[]).unwrap(), expected);
    }
}
