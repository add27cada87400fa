//! The builtin operation catalog, organized by category.
//!
//! Every function here is a thin wrapper with the registry callable shape:
//! checks are `fn(&Value, &[Value]) -> ChainResult<bool>`, transforms are
//! `fn(&Value, &[Value]) -> ChainResult<Value>`. Rule logic is delegated to
//! ecosystem crates (regex, base64, url, uuid, chrono); nothing here parses a
//! format by hand.
//!
//! Two error regimes apply throughout: a value that merely fails the rule is
//! `Ok(false)` (or `Value::Null` for an unconvertible transform input), while
//! malformed *arguments* are [`ChainError::InvalidArgument`] and propagate to
//! the caller. Operations that take no arguments ignore surplus ones.

pub mod convert;
pub mod format;
pub mod numeric;
pub mod string;

use serde_json::{Map, Value};

use crate::error::{ChainError, ChainResult};
use crate::value::value_type_name;

/// Helper to check the exact argument count.
pub(crate) fn require_args(op: &str, args: &[Value], expected: usize) -> ChainResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ChainError::invalid_argument(
            op,
            format!("expected {expected} arguments, got {}", args.len()),
        ))
    }
}

/// Helper to get a mandatory string argument.
pub(crate) fn str_arg<'a>(
    op: &str,
    args: &'a [Value],
    index: usize,
    name: &str,
) -> ChainResult<&'a str> {
    args.get(index)
        .ok_or_else(|| {
            ChainError::invalid_argument(op, format!("missing argument '{name}' at position {index}"))
        })?
        .as_str()
        .ok_or_else(|| {
            ChainError::invalid_argument(
                op,
                format!(
                    "argument '{name}' must be a string, got {}",
                    value_type_name(&args[index])
                ),
            )
        })
}

/// Helper to get an optional string argument: absent is fine, a present
/// non-string is not.
pub(crate) fn opt_str_arg<'a>(
    op: &str,
    args: &'a [Value],
    index: usize,
    name: &str,
) -> ChainResult<Option<&'a str>> {
    match args.get(index) {
        None => Ok(None),
        Some(arg) => arg.as_str().map(Some).ok_or_else(|| {
            ChainError::invalid_argument(
                op,
                format!(
                    "argument '{name}' must be a string, got {}",
                    value_type_name(arg)
                ),
            )
        }),
    }
}

/// Helper to get a mandatory integer argument.
pub(crate) fn int_arg(op: &str, args: &[Value], index: usize, name: &str) -> ChainResult<i64> {
    let arg = args.get(index).ok_or_else(|| {
        ChainError::invalid_argument(op, format!("missing argument '{name}' at position {index}"))
    })?;
    arg.as_i64().ok_or_else(|| {
        ChainError::invalid_argument(
            op,
            format!(
                "argument '{name}' must be an integer, got {}",
                value_type_name(arg)
            ),
        )
    })
}

/// Helper to get an optional integer argument.
pub(crate) fn opt_int_arg(
    op: &str,
    args: &[Value],
    index: usize,
    name: &str,
) -> ChainResult<Option<i64>> {
    match args.get(index) {
        None => Ok(None),
        Some(arg) => arg.as_i64().map(Some).ok_or_else(|| {
            ChainError::invalid_argument(
                op,
                format!(
                    "argument '{name}' must be an integer, got {}",
                    value_type_name(arg)
                ),
            )
        }),
    }
}

/// Helper to get an optional boolean argument.
pub(crate) fn opt_bool_arg(
    op: &str,
    args: &[Value],
    index: usize,
    name: &str,
) -> ChainResult<Option<bool>> {
    match args.get(index) {
        None => Ok(None),
        Some(arg) => arg.as_bool().map(Some).ok_or_else(|| {
            ChainError::invalid_argument(
                op,
                format!(
                    "argument '{name}' must be a boolean, got {}",
                    value_type_name(arg)
                ),
            )
        }),
    }
}

/// Helper to get a mandatory array argument.
pub(crate) fn array_arg<'a>(
    op: &str,
    args: &'a [Value],
    index: usize,
    name: &str,
) -> ChainResult<&'a Vec<Value>> {
    args.get(index)
        .ok_or_else(|| {
            ChainError::invalid_argument(op, format!("missing argument '{name}' at position {index}"))
        })?
        .as_array()
        .ok_or_else(|| {
            ChainError::invalid_argument(
                op,
                format!(
                    "argument '{name}' must be an array, got {}",
                    value_type_name(&args[index])
                ),
            )
        })
}

/// Helper to get an optional object argument, used for bounds options.
pub(crate) fn opt_object_arg<'a>(
    op: &str,
    args: &'a [Value],
    index: usize,
    name: &str,
) -> ChainResult<Option<&'a Map<String, Value>>> {
    match args.get(index) {
        None => Ok(None),
        Some(arg) => arg.as_object().map(Some).ok_or_else(|| {
            ChainError::invalid_argument(
                op,
                format!(
                    "argument '{name}' must be an object, got {}",
                    value_type_name(arg)
                ),
            )
        }),
    }
}

fn bound_field(op: &str, bounds: &Map<String, Value>, key: &str) -> ChainResult<Option<i64>> {
    match bounds.get(key) {
        None => Ok(None),
        Some(v) => v.as_i64().map(Some).ok_or_else(|| {
            ChainError::invalid_argument(
                op,
                format!("bound '{key}' must be an integer, got {}", value_type_name(v)),
            )
        }),
    }
}

/// Parses an optional `{ "min": _, "max": _ }` first argument into length
/// bounds. Missing fields default to an unbounded side.
pub(crate) fn length_bounds(op: &str, args: &[Value]) -> ChainResult<(usize, Option<usize>)> {
    let Some(bounds) = opt_object_arg(op, args, 0, "bounds")? else {
        return Ok((0, None));
    };
    let min = match bound_field(op, bounds, "min")? {
        None => 0,
        Some(v) => usize::try_from(v)
            .map_err(|_| ChainError::invalid_argument(op, "bound 'min' must be non-negative"))?,
    };
    let max = match bound_field(op, bounds, "max")? {
        None => None,
        Some(v) => Some(
            usize::try_from(v)
                .map_err(|_| ChainError::invalid_argument(op, "bound 'max' must be non-negative"))?,
        ),
    };
    Ok((min, max))
}

/// Parses an optional `{ "min": _, "max": _ }` first argument into signed
/// integer bounds.
pub(crate) fn int_bounds(op: &str, args: &[Value]) -> ChainResult<(Option<i64>, Option<i64>)> {
    let Some(bounds) = opt_object_arg(op, args, 0, "bounds")? else {
        return Ok((None, None));
    };
    Ok((
        bound_field(op, bounds, "min")?,
        bound_field(op, bounds, "max")?,
    ))
}

/// Parses an optional `{ "min": _, "max": _ }` first argument into float
/// bounds; integer fields are widened.
pub(crate) fn float_bounds(op: &str, args: &[Value]) -> ChainResult<(Option<f64>, Option<f64>)> {
    let Some(bounds) = opt_object_arg(op, args, 0, "bounds")? else {
        return Ok((None, None));
    };
    let field = |key: &str| -> ChainResult<Option<f64>> {
        match bounds.get(key) {
            None => Ok(None),
            Some(v) => v.as_f64().map(Some).ok_or_else(|| {
                ChainError::invalid_argument(
                    op,
                    format!("bound '{key}' must be a number, got {}", value_type_name(v)),
                )
            }),
        }
    };
    Ok((field("min")?, field("max")?))
}
