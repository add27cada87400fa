//! # gauntlet
//!
//! A stateful, fluent validation-chain engine: declare labeled values, run
//! checks and transforms against them, steer the flow with modifiers
//! (`optional`, `not`, `bail`, branches), and collect a structured per-label
//! report at the end.
//!
//! ## Quick Start
//!
//! ```rust
//! use gauntlet::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> ChainResult<()> {
//!     let mut chain = Chain::new();
//!
//!     chain
//!         .declare("username", "  Ada_99  ")?
//!         .run_transform("trim", &[])?
//!         .run("is_length", &[json!({ "min": 3, "max": 20 })])?
//!         .with_message("3 to 20 characters");
//!
//!     chain
//!         .declare("age", 17)?
//!         .run("is_int", &[json!({ "min": 18 })])?
//!         .with_message("adults only");
//!
//!     chain.declare("nickname", "")?.optional().run("is_alpha", &[])?;
//!
//!     assert_eq!(chain.error_count(), 1);
//!     assert_eq!(chain.values()["username"], json!("Ada_99"));
//!     assert!(chain.errors().contains_key("age"));
//!     Ok(())
//! }
//! ```
//!
//! ## Pieces
//!
//! - [`chain::Chain`] — the engine: declarations, the gates (skip, suspend,
//!   bail), invert, messages, and the derived views
//! - [`results::Results`] — the per-label accumulator with disambiguated
//!   outcome keys and the serialized report shape
//! - [`registry::Registry`] — named dispatch for checks and transforms
//! - [`builtins`] — the bundled operation catalog (string, numeric, format,
//!   convert), thin wrappers over ecosystem parsers
//!
//! ## Features
//!
//! - `network` *(default)* — `is_url` (url crate) and `is_ip`
//! - `temporal` *(default)* — `is_uuid` (uuid crate), `is_date`,
//!   `is_rfc3339` and `to_date` (chrono)

pub mod builtins;
pub mod chain;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod results;
pub mod value;
