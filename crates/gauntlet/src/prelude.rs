//! Prelude module for convenient imports.
//!
//! A single `use gauntlet::prelude::*;` brings in the chain, its options and
//! state types, the result types, the registry, and the error alias.

// ============================================================================
// CHAIN: engine, options, run state
// ============================================================================

pub use crate::chain::{Chain, DeclareOptions, Resume, RunState};

// ============================================================================
// ERRORS
// ============================================================================

pub use crate::error::{ChainError, ChainResult};

// ============================================================================
// RESULTS: accumulator and views
// ============================================================================

pub use crate::results::{LabelResult, Outcome, Results};

// ============================================================================
// REGISTRY: named dispatch
// ============================================================================

pub use crate::registry::{CheckFn, Registry, TransformFn};
