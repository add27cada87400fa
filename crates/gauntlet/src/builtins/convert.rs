//! Transforms. Text transforms pass non-text values through untouched;
//! parsing transforms yield `Value::Null` for data they cannot convert and
//! keep already-converted raw values as they are. Only malformed arguments
//! error.

use serde_json::Value;

use super::{opt_bool_arg, opt_int_arg, opt_str_arg, require_args, str_arg};
use crate::error::{ChainError, ChainResult};

fn trimmed(value: &Value, chars: Option<&str>, start: bool, end: bool) -> Value {
    let Some(text) = value.as_str() else {
        return value.clone();
    };
    let keep = |c: char| chars.map_or_else(|| c.is_whitespace(), |set| set.contains(c));
    let out = match (start, end) {
        (true, true) => text.trim_matches(keep),
        (true, false) => text.trim_start_matches(keep),
        (false, true) => text.trim_end_matches(keep),
        (false, false) => text,
    };
    Value::String(out.to_string())
}

/// Trims whitespace, or the characters given as the optional first argument,
/// from both ends.
pub fn trim(value: &Value, args: &[Value]) -> ChainResult<Value> {
    let chars = opt_str_arg("trim", args, 0, "chars")?;
    Ok(trimmed(value, chars, true, true))
}

/// Like [`trim`], left end only.
pub fn ltrim(value: &Value, args: &[Value]) -> ChainResult<Value> {
    let chars = opt_str_arg("ltrim", args, 0, "chars")?;
    Ok(trimmed(value, chars, true, false))
}

/// Like [`trim`], right end only.
pub fn rtrim(value: &Value, args: &[Value]) -> ChainResult<Value> {
    let chars = opt_str_arg("rtrim", args, 0, "chars")?;
    Ok(trimmed(value, chars, false, true))
}

/// Lowercases text.
pub fn to_lowercase(value: &Value, _args: &[Value]) -> ChainResult<Value> {
    Ok(value
        .as_str()
        .map_or_else(|| value.clone(), |text| Value::String(text.to_lowercase())))
}

/// Uppercases text.
pub fn to_uppercase(value: &Value, _args: &[Value]) -> ChainResult<Value> {
    Ok(value
        .as_str()
        .map_or_else(|| value.clone(), |text| Value::String(text.to_uppercase())))
}

/// Keeps only the characters that occur in the allowed set.
pub fn whitelist(value: &Value, args: &[Value]) -> ChainResult<Value> {
    require_args("whitelist", args, 1)?;
    let allowed = str_arg("whitelist", args, 0, "chars")?;
    Ok(value.as_str().map_or_else(
        || value.clone(),
        |text| Value::String(text.chars().filter(|c| allowed.contains(*c)).collect()),
    ))
}

/// Removes every character that occurs in the banned set.
pub fn blacklist(value: &Value, args: &[Value]) -> ChainResult<Value> {
    require_args("blacklist", args, 1)?;
    let banned = str_arg("blacklist", args, 0, "chars")?;
    Ok(value.as_str().map_or_else(
        || value.clone(),
        |text| Value::String(text.chars().filter(|c| !banned.contains(*c)).collect()),
    ))
}

/// Replaces every occurrence of the first argument with the second.
pub fn replace(value: &Value, args: &[Value]) -> ChainResult<Value> {
    require_args("replace", args, 2)?;
    let from = str_arg("replace", args, 0, "from")?;
    let to = str_arg("replace", args, 1, "to")?;
    Ok(value.as_str().map_or_else(
        || value.clone(),
        |text| Value::String(text.replace(from, to)),
    ))
}

/// HTML-escapes the characters `& " ' < > / \` and the backtick.
pub fn escape(value: &Value, _args: &[Value]) -> ChainResult<Value> {
    let Some(text) = value.as_str() else {
        return Ok(value.clone());
    };
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            other => out.push(other),
        }
    }
    Ok(Value::String(out))
}

/// Reverses [`escape`]. The ampersand entity is restored last so escaped
/// entities inside the text do not double-expand.
pub fn unescape(value: &Value, _args: &[Value]) -> ChainResult<Value> {
    let Some(text) = value.as_str() else {
        return Ok(value.clone());
    };
    let out = text
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#x2F;", "/")
        .replace("&#x5C;", "\\")
        .replace("&#96;", "`")
        .replace("&amp;", "&");
    Ok(Value::String(out))
}

/// Converts to an integer number. Text parses as an integer (or truncates
/// through a float); an optional radix argument (2–36) switches to
/// `from_str_radix`. Raw integral numbers pass through, raw floats truncate.
pub fn to_int(value: &Value, args: &[Value]) -> ChainResult<Value> {
    let radix = opt_int_arg("to_int", args, 0, "radix")?;
    if let Some(r) = radix
        && !(2..=36).contains(&r)
    {
        return Err(ChainError::invalid_argument(
            "to_int",
            format!("radix {r} out of range"),
        ));
    }
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
        Value::Number(n) => Ok(n
            .as_f64()
            .map(truncate_to_i64)
            .map_or(Value::Null, |t| Value::Number(t.into()))),
        Value::String(s) => {
            let text = s.trim();
            let parsed = match radix {
                Some(r) => i64::from_str_radix(text, r as u32).ok(),
                None => text
                    .parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().filter(|f| f.is_finite()).map(truncate_to_i64)),
            };
            Ok(parsed.map_or(Value::Null, |n| Value::Number(n.into())))
        }
        _ => Ok(Value::Null),
    }
}

fn truncate_to_i64(f: f64) -> i64 {
    f.trunc() as i64
}

/// Converts to a float number. Raw numbers pass through; text parses,
/// rejecting non-finite spellings; everything else is `Null`.
pub fn to_float(value: &Value, _args: &[Value]) -> ChainResult<Value> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(s) => Ok(s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number)),
        _ => Ok(Value::Null),
    }
}

/// Converts to a boolean. By default any non-empty text except `"0"` and
/// `"false"` is `true`; pass `true` as the first argument for strict mode,
/// where only `"1"` and `"true"` qualify. Raw booleans pass through.
pub fn to_boolean(value: &Value, args: &[Value]) -> ChainResult<Value> {
    let strict = opt_bool_arg("to_boolean", args, 0, "strict")?.unwrap_or(false);
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::String(s) => Ok(Value::Bool(if strict {
            s == "1" || s == "true"
        } else {
            !s.is_empty() && s != "0" && s != "false"
        })),
        _ => Ok(Value::Null),
    }
}

/// Parses text as JSON; unparseable text becomes `Null`. Non-text values
/// pass through, already being structured.
pub fn to_json(value: &Value, _args: &[Value]) -> ChainResult<Value> {
    let Some(text) = value.as_str() else {
        return Ok(value.clone());
    };
    Ok(serde_json::from_str(text).unwrap_or(Value::Null))
}

/// Normalizes any value to its textual form (see [`crate::value::to_text`]).
pub fn to_text(value: &Value, _args: &[Value]) -> ChainResult<Value> {
    Ok(crate::value::to_text(value))
}

/// Normalizes date text: RFC 3339 input is re-emitted as RFC 3339, plain
/// dates as `%Y-%m-%d`. An optional `strftime` format argument parses
/// non-standard date spellings. Unparseable text becomes `Null`.
#[cfg(feature = "temporal")]
pub fn to_date(value: &Value, args: &[Value]) -> ChainResult<Value> {
    let format = opt_str_arg("to_date", args, 0, "format")?;
    let Some(text) = value.as_str() else {
        return Ok(Value::Null);
    };
    if let Some(format) = format {
        return Ok(chrono::NaiveDate::parse_from_str(text, format)
            .map_or(Value::Null, |d| Value::String(d.format("%Y-%m-%d").to_string())));
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Ok(Value::String(dt.to_rfc3339()));
    }
    Ok(chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_or(Value::Null, |d| Value::String(d.format("%Y-%m-%d").to_string())))
}
