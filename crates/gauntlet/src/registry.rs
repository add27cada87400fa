//! Registry of named checks and transforms.
//!
//! The engine stays generic over two callable shapes; the registry maps
//! stable string ids onto them so chains can dispatch operations by name
//! ([`crate::chain::Chain::run`] / [`crate::chain::Chain::run_transform`]).
//! [`Registry::builtin`] preloads the operation catalog from
//! [`crate::builtins`]; [`Registry::new`] starts empty for callers that want
//! full control over the id space.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::builtins;
use crate::error::ChainResult;

/// A registered check: inspects a value against its arguments and reports a
/// pass/fail verdict. Argument problems are errors; a failing value is
/// `Ok(false)`.
pub type CheckFn = fn(&Value, &[Value]) -> ChainResult<bool>;

/// A registered transform: produces the replacement value. Data that cannot
/// be converted yields `Value::Null` rather than an error.
pub type TransformFn = fn(&Value, &[Value]) -> ChainResult<Value>;

/// Named tables of checks and transforms.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    checks: HashMap<String, CheckFn>,
    transforms: HashMap<String, TransformFn>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry preloaded with the builtin operation catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_string_checks();
        registry.register_numeric_checks();
        registry.register_format_checks();
        registry.register_transforms();
        registry
    }

    /// The process-wide shared builtin registry, built on first use.
    /// [`crate::chain::Chain::new`] hands this to every chain.
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<Registry>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Self::builtin())).clone()
    }

    /// Registers a check under `id`, replacing any previous entry.
    pub fn register_check(&mut self, id: impl Into<String>, check: CheckFn) {
        self.checks.insert(id.into(), check);
    }

    /// Registers a transform under `id`, replacing any previous entry.
    pub fn register_transform(&mut self, id: impl Into<String>, transform: TransformFn) {
        self.transforms.insert(id.into(), transform);
    }

    /// Looks up a check by id.
    pub fn check(&self, id: &str) -> Option<CheckFn> {
        self.checks.get(id).copied()
    }

    /// Looks up a transform by id.
    pub fn transform(&self, id: &str) -> Option<TransformFn> {
        self.transforms.get(id).copied()
    }

    /// Whether a check is registered under `id`.
    pub fn has_check(&self, id: &str) -> bool {
        self.checks.contains_key(id)
    }

    /// Whether a transform is registered under `id`.
    pub fn has_transform(&self, id: &str) -> bool {
        self.transforms.contains_key(id)
    }

    /// All registered check ids, sorted.
    pub fn check_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.checks.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// All registered transform ids, sorted.
    pub fn transform_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    // Registration blocks for each catalog category.

    fn register_string_checks(&mut self) {
        self.register_check("contains", builtins::string::contains);
        self.register_check("equals", builtins::string::equals);
        self.register_check("matches", builtins::string::matches);
        self.register_check("is_length", builtins::string::is_length);
        self.register_check("is_byte_length", builtins::string::is_byte_length);
        self.register_check("is_empty", builtins::string::is_empty);
        self.register_check("is_in", builtins::string::is_in);
        self.register_check("is_lowercase", builtins::string::is_lowercase);
        self.register_check("is_uppercase", builtins::string::is_uppercase);
        self.register_check("is_alpha", builtins::string::is_alpha);
        self.register_check("is_alphanumeric", builtins::string::is_alphanumeric);
        self.register_check("is_ascii", builtins::string::is_ascii);
        self.register_check("is_hexadecimal", builtins::string::is_hexadecimal);
        self.register_check("is_whitelisted", builtins::string::is_whitelisted);
    }

    fn register_numeric_checks(&mut self) {
        self.register_check("is_int", builtins::numeric::is_int);
        self.register_check("is_float", builtins::numeric::is_float);
        self.register_check("is_numeric", builtins::numeric::is_numeric);
        self.register_check("is_divisible_by", builtins::numeric::is_divisible_by);
        self.register_check("is_port", builtins::numeric::is_port);
        self.register_check("is_boolean", builtins::numeric::is_boolean);
    }

    fn register_format_checks(&mut self) {
        self.register_check("is_json", builtins::format::is_json);
        self.register_check("is_base64", builtins::format::is_base64);
        #[cfg(feature = "network")]
        {
            self.register_check("is_url", builtins::format::is_url);
            self.register_check("is_ip", builtins::format::is_ip);
        }
        #[cfg(feature = "temporal")]
        {
            self.register_check("is_uuid", builtins::format::is_uuid);
            self.register_check("is_date", builtins::format::is_date);
            self.register_check("is_rfc3339", builtins::format::is_rfc3339);
        }
    }

    fn register_transforms(&mut self) {
        self.register_transform("trim", builtins::convert::trim);
        self.register_transform("ltrim", builtins::convert::ltrim);
        self.register_transform("rtrim", builtins::convert::rtrim);
        self.register_transform("to_lowercase", builtins::convert::to_lowercase);
        self.register_transform("to_uppercase", builtins::convert::to_uppercase);
        self.register_transform("whitelist", builtins::convert::whitelist);
        self.register_transform("blacklist", builtins::convert::blacklist);
        self.register_transform("replace", builtins::convert::replace);
        self.register_transform("escape", builtins::convert::escape);
        self.register_transform("unescape", builtins::convert::unescape);
        self.register_transform("to_int", builtins::convert::to_int);
        self.register_transform("to_float", builtins::convert::to_float);
        self.register_transform("to_boolean", builtins::convert::to_boolean);
        self.register_transform("to_json", builtins::convert::to_json);
        self.register_transform("to_text", builtins::convert::to_text);
        #[cfg(feature = "temporal")]
        self.register_transform("to_date", builtins::convert::to_date);
    }
}
