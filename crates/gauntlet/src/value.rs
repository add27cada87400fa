//! Coercion helpers shared by the chain engine and the operation catalog.
//!
//! Chains hold [`serde_json::Value`]s. Unless a declaration opts out, values
//! are normalized to text on entry with [`to_text`], which mirrors how form
//! and query-string data arrives in practice: everything is a string until an
//! operation says otherwise.

use serde_json::Value;

/// Human-readable type name for error messages.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalizes a value to its textual form.
///
/// * `Null` becomes the empty string
/// * strings are kept as-is
/// * numbers and booleans use their display form
/// * arrays and objects are rendered as compact JSON
pub fn to_text(value: &Value) -> Value {
    match value {
        Value::Null => Value::String(String::new()),
        Value::String(_) => value.clone(),
        Value::Bool(b) => Value::String(b.to_string()),
        Value::Number(n) => Value::String(n.to_string()),
        // serializing a Value cannot fail
        Value::Array(_) | Value::Object(_) => {
            Value::String(serde_json::to_string(value).unwrap_or_default())
        }
    }
}

/// Whether a value counts as absent for `optional` / `default_value`.
///
/// Only `Null` and the empty string qualify; `0`, `false`, `[]` and `{}` are
/// all present values.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Coerces a value to an integer: a raw integral number, or text that parses
/// as one.
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Coerces a value to a finite float: a raw number, or text that parses as
/// one. Text spellings of NaN and the infinities are rejected.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
