//! Text checks. All of these require text input: a non-text value simply
//! fails the check, it is never an error.

use std::collections::HashMap;
use std::sync::OnceLock;

use parking_lot::Mutex;
use regex::Regex;
use serde_json::Value;

use super::{array_arg, length_bounds, require_args, str_arg};
use crate::error::{ChainError, ChainResult};
use crate::value::{is_empty_value, to_text};

/// Compiled patterns kept for reuse; one entry is evicted when full.
const MAX_CACHED_PATTERNS: usize = 100;

static PATTERN_CACHE: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();

fn cached_regex(op: &str, pattern: &str) -> ChainResult<Regex> {
    let cache = PATTERN_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock();
    if let Some(re) = cache.get(pattern) {
        return Ok(re.clone());
    }
    let re = Regex::new(pattern)
        .map_err(|e| ChainError::invalid_argument(op, format!("invalid pattern: {e}")))?;
    if cache.len() >= MAX_CACHED_PATTERNS
        && let Some(key) = cache.keys().next().cloned()
    {
        cache.remove(&key);
    }
    cache.insert(pattern.to_string(), re.clone());
    Ok(re)
}

/// Whether the text contains the needle.
pub fn contains(value: &Value, args: &[Value]) -> ChainResult<bool> {
    require_args("contains", args, 1)?;
    let needle = str_arg("contains", args, 0, "needle")?;
    Ok(value.as_str().is_some_and(|text| text.contains(needle)))
}

/// Whether the value equals the expected argument. Text values compare
/// against the argument's textual form; anything else compares raw.
pub fn equals(value: &Value, args: &[Value]) -> ChainResult<bool> {
    require_args("equals", args, 1)?;
    let expected = &args[0];
    if let Some(text) = value.as_str() {
        let expected_text = to_text(expected);
        return Ok(expected_text.as_str() == Some(text));
    }
    Ok(value == expected)
}

/// Whether the text matches the regex pattern. Patterns are compiled once
/// and cached process-wide; an invalid pattern is an argument error.
pub fn matches(value: &Value, args: &[Value]) -> ChainResult<bool> {
    require_args("matches", args, 1)?;
    let pattern = str_arg("matches", args, 0, "pattern")?;
    let Some(text) = value.as_str() else {
        return Ok(false);
    };
    let re = cached_regex("matches", pattern)?;
    Ok(re.is_match(text))
}

/// Whether the text's character count falls within optional
/// `{ "min": _, "max": _ }` bounds.
pub fn is_length(value: &Value, args: &[Value]) -> ChainResult<bool> {
    let (min, max) = length_bounds("is_length", args)?;
    let Some(text) = value.as_str() else {
        return Ok(false);
    };
    let len = text.chars().count();
    Ok(len >= min && max.is_none_or(|m| len <= m))
}

/// Like [`is_length`], but counts bytes.
pub fn is_byte_length(value: &Value, args: &[Value]) -> ChainResult<bool> {
    let (min, max) = length_bounds("is_byte_length", args)?;
    let Some(text) = value.as_str() else {
        return Ok(false);
    };
    let len = text.len();
    Ok(len >= min && max.is_none_or(|m| len <= m))
}

/// Whether the value is absent: `Null` or the empty string.
pub fn is_empty(value: &Value, _args: &[Value]) -> ChainResult<bool> {
    Ok(is_empty_value(value))
}

/// Whether the value occurs in the argument list. Candidates match either
/// raw or through their textual form.
pub fn is_in(value: &Value, args: &[Value]) -> ChainResult<bool> {
    require_args("is_in", args, 1)?;
    let list = array_arg("is_in", args, 0, "list")?;
    Ok(list
        .iter()
        .any(|candidate| candidate == value || &to_text(candidate) == value))
}

/// Whether the text equals its own lowercase form.
pub fn is_lowercase(value: &Value, _args: &[Value]) -> ChainResult<bool> {
    Ok(value.as_str().is_some_and(|text| text == text.to_lowercase()))
}

/// Whether the text equals its own uppercase form.
pub fn is_uppercase(value: &Value, _args: &[Value]) -> ChainResult<bool> {
    Ok(value.as_str().is_some_and(|text| text == text.to_uppercase()))
}

/// Whether the text is non-empty ASCII letters only.
pub fn is_alpha(value: &Value, _args: &[Value]) -> ChainResult<bool> {
    Ok(value
        .as_str()
        .is_some_and(|text| !text.is_empty() && text.bytes().all(|b| b.is_ascii_alphabetic())))
}

/// Whether the text is non-empty ASCII letters and digits only.
pub fn is_alphanumeric(value: &Value, _args: &[Value]) -> ChainResult<bool> {
    Ok(value
        .as_str()
        .is_some_and(|text| !text.is_empty() && text.bytes().all(|b| b.is_ascii_alphanumeric())))
}

/// Whether the text is non-empty and entirely ASCII.
pub fn is_ascii(value: &Value, _args: &[Value]) -> ChainResult<bool> {
    Ok(value
        .as_str()
        .is_some_and(|text| !text.is_empty() && text.is_ascii()))
}

/// Whether the text is a hexadecimal number, with an optional `0x`/`0h`
/// prefix.
pub fn is_hexadecimal(value: &Value, _args: &[Value]) -> ChainResult<bool> {
    Ok(value.as_str().is_some_and(|text| {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .or_else(|| text.strip_prefix("0h"))
            .or_else(|| text.strip_prefix("0H"))
            .unwrap_or(text);
        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit())
    }))
}

/// Whether every character of the text occurs in the allowed set.
pub fn is_whitelisted(value: &Value, args: &[Value]) -> ChainResult<bool> {
    require_args("is_whitelisted", args, 1)?;
    let allowed = str_arg("is_whitelisted", args, 0, "chars")?;
    Ok(value
        .as_str()
        .is_some_and(|text| text.chars().all(|c| allowed.contains(c))))
}
