//! Error types for chain construction and registry dispatch.
//!
//! A failing check is *not* an error: it is recorded in the chain's results
//! with `error: true` and the chain keeps running. [`ChainError`] covers the
//! other kind of failure, where the caller misused the API (an empty or
//! duplicate label, an unknown catalog id, a malformed argument list). Those
//! are propagated immediately via `?` instead of being accumulated.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type ChainResult<T> = Result<T, ChainError>;

/// Errors raised by chain operations and catalog dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// A value was declared with an empty label.
    #[error("chain labels must be non-empty")]
    EmptyLabel,

    /// A value was declared with a label that already has results.
    #[error("duplicate chain label: {label}")]
    DuplicateLabel {
        /// The offending label.
        label: String,
    },

    /// A check id was dispatched that no registry entry matches.
    #[error("unknown check: {id}")]
    UnknownCheck {
        /// The id that failed to resolve.
        id: String,
    },

    /// A transform id was dispatched that no registry entry matches.
    #[error("unknown transform: {id}")]
    UnknownTransform {
        /// The id that failed to resolve.
        id: String,
    },

    /// A catalog operation received arguments it cannot work with.
    #[error("invalid argument to {op}: {reason}")]
    InvalidArgument {
        /// The catalog operation that rejected its arguments.
        op: String,
        /// What was wrong with them.
        reason: String,
    },
}

impl ChainError {
    /// Shorthand for [`ChainError::InvalidArgument`], used by the operation
    /// catalog.
    pub fn invalid_argument(op: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            op: op.into(),
            reason: reason.into(),
        }
    }
}
