//! Structured-format checks, delegating to ecosystem parsers. The `network`
//! feature gates the URL/IP checks, `temporal` gates UUID and date checks.

#[cfg(feature = "network")]
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use base64::Engine as _;
use base64::engine::general_purpose;
use serde_json::Value;

#[cfg(any(feature = "network", feature = "temporal"))]
use super::opt_int_arg;
use super::opt_bool_arg;
#[cfg(feature = "temporal")]
use super::opt_str_arg;
#[cfg(any(feature = "network", feature = "temporal"))]
use crate::error::ChainError;
use crate::error::ChainResult;

/// Whether the text parses as a JSON object or array. Primitives are
/// excluded on purpose: a bare `"17"` is valid JSON but rarely what a
/// payload check means.
pub fn is_json(value: &Value, _args: &[Value]) -> ChainResult<bool> {
    let Some(text) = value.as_str() else {
        return Ok(false);
    };
    Ok(serde_json::from_str::<Value>(text).is_ok_and(|parsed| parsed.is_object() || parsed.is_array()))
}

/// Whether the text decodes as base64. Pass `true` as the first argument for
/// the URL-safe alphabet (padding optional there).
pub fn is_base64(value: &Value, args: &[Value]) -> ChainResult<bool> {
    let url_safe = opt_bool_arg("is_base64", args, 0, "url_safe")?.unwrap_or(false);
    let Some(text) = value.as_str() else {
        return Ok(false);
    };
    if text.is_empty() {
        return Ok(false);
    }
    let decoded = if url_safe {
        general_purpose::URL_SAFE_NO_PAD.decode(text.trim_end_matches('='))
    } else {
        general_purpose::STANDARD.decode(text)
    };
    Ok(decoded.is_ok())
}

/// Whether the text parses as an absolute URL with a host.
#[cfg(feature = "network")]
pub fn is_url(value: &Value, _args: &[Value]) -> ChainResult<bool> {
    let Some(text) = value.as_str() else {
        return Ok(false);
    };
    Ok(url::Url::parse(text).is_ok_and(|u| u.has_host()))
}

/// Whether the text is an IP address. An optional first argument pins the
/// version to `4` or `6`; no argument accepts either.
#[cfg(feature = "network")]
pub fn is_ip(value: &Value, args: &[Value]) -> ChainResult<bool> {
    let version = opt_int_arg("is_ip", args, 0, "version")?;
    let Some(text) = value.as_str() else {
        return Ok(false);
    };
    match version {
        None => Ok(text.parse::<IpAddr>().is_ok()),
        Some(4) => Ok(text.parse::<Ipv4Addr>().is_ok()),
        Some(6) => Ok(text.parse::<Ipv6Addr>().is_ok()),
        Some(other) => Err(ChainError::invalid_argument(
            "is_ip",
            format!("unsupported ip version {other}"),
        )),
    }
}

/// Whether the text is a UUID, optionally of a specific version (1–8).
#[cfg(feature = "temporal")]
pub fn is_uuid(value: &Value, args: &[Value]) -> ChainResult<bool> {
    let version = opt_int_arg("is_uuid", args, 0, "version")?;
    if let Some(v) = version
        && !(1..=8).contains(&v)
    {
        return Err(ChainError::invalid_argument(
            "is_uuid",
            format!("unsupported uuid version {v}"),
        ));
    }
    let Some(text) = value.as_str() else {
        return Ok(false);
    };
    Ok(uuid::Uuid::parse_str(text).is_ok_and(|u| match version {
        None => true,
        Some(v) => i64::try_from(u.get_version_num()) == Ok(v),
    }))
}

/// Whether the text is a calendar date in the given `strftime` format
/// (default `%Y-%m-%d`). A format the text does not satisfy simply fails
/// the check.
#[cfg(feature = "temporal")]
pub fn is_date(value: &Value, args: &[Value]) -> ChainResult<bool> {
    let format = opt_str_arg("is_date", args, 0, "format")?.unwrap_or("%Y-%m-%d");
    let Some(text) = value.as_str() else {
        return Ok(false);
    };
    Ok(chrono::NaiveDate::parse_from_str(text, format).is_ok())
}

/// Whether the text is an RFC 3339 timestamp.
#[cfg(feature = "temporal")]
pub fn is_rfc3339(value: &Value, _args: &[Value]) -> ChainResult<bool> {
    let Some(text) = value.as_str() else {
        return Ok(false);
    };
    Ok(chrono::DateTime::parse_from_rfc3339(text).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(r#"{"a": 1}"#, true)]
    #[case("[1, 2]", true)]
    #[case("17", false)]
    #[case("null", false)]
    #[case("{broken", false)]
    fn is_json_cases(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_json(&json!(text), &[]).unwrap(), expected);
    }

    #[test]
    fn base64_standard_and_url_safe() {
        assert!(is_base64(&json!("aGVsbG8="), &[]).unwrap());
        assert!(!is_base64(&json!("not base64!"), &[]).unwrap());
        assert!(!is_base64(&json!(""), &[]).unwrap());
        // '-' and '_' only decode with the url-safe alphabet
        assert!(!is_base64(&json!("a-b_"), &[]).unwrap());
        assert!(is_base64(&json!("a-b_"), &[json!(true)]).unwrap());
        assert!(is_base64(&json!("aGVsbG8="), &[json!(true)]).unwrap());
        assert!(is_base64(&json!("x"), &[json!("yes")]).is_err());
    }

    #[cfg(feature = "network")]
    #[rstest]
    #[case("https://example.com/path?q=1", true)]
    #[case("ftp://files.example.com", true)]
    #[case("example.com", false)]
    #[case("not a url", false)]
    fn is_url_cases(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_url(&json!(text), &[]).unwrap(), expected);
    }

    #[cfg(feature = "network")]
    #[test]
    fn ip_versions() {
        assert!(is_ip(&json!("192.168.0.1"), &[]).unwrap());
        assert!(is_ip(&json!("::1"), &[]).unwrap());
        assert!(is_ip(&json!("192.168.0.1"), &[json!(4)]).unwrap());
        assert!(!is_ip(&json!("::1"), &[json!(4)]).unwrap());
        assert!(is_ip(&json!("::1"), &[json!(6)]).unwrap());
        assert!(!is_ip(&json!("999.0.0.1"), &[]).unwrap());
        assert!(is_ip(&json!("::1"), &[json!(5)]).is_err());
    }

    #[cfg(feature = "temporal")]
    #[test]
    fn uuid_versions() {
        let v1 = "6c84fb90-12c4-11e1-840d-7b25c5ee775a";
        assert!(is_uuid(&json!(v1), &[]).unwrap());
        assert!(is_uuid(&json!(v1), &[json!(1)]).unwrap());
        assert!(!is_uuid(&json!(v1), &[json!(4)]).unwrap());
        assert!(!is_uuid(&json!("not-a-uuid"), &[]).unwrap());
        assert!(is_uuid(&json!(v1), &[json!(9)]).is_err());
    }

    #[cfg(feature = "temporal")]
    #[test]
    fn date_formats() {
        assert!(is_date(&json!("2024-02-29"), &[]).unwrap());
        assert!(!is_date(&json!("2023-02-29"), &[]).unwrap());
        assert!(!is_date(&json!("29/02/2024"), &[]).unwrap());
        assert!(is_date(&json!("29/02/2024"), &[json!("%d/%m/%Y")]).unwrap());
        assert!(is_date(&json!("x"), &[json!(5)]).is_err());
    }

    #[cfg(feature = "temporal")]
    #[test]
    fn rfc3339_timestamps() {
        assert!(is_rfc3339(&json!("2024-02-29T12:00:00Z"), &[]).unwrap());
        assert!(is_rfc3339(&json!("2024-02-29T12:00:00+02:00"), &[]).unwrap());
        assert!(!is_rfc3339(&json!("2024-02-29"), &[]).unwrap());
        assert!(!is_rfc3339(&json!(42), &[]).unwrap());
    }
}
