//! The chain engine: declare labeled values, run checks and transforms
//! against them, steer execution with modifiers, and read the accumulated
//! results.
//!
//! A [`Chain`] is a long-lived, single-threaded object. Checks and transforms
//! are opaque callables: either closures handed in at the call site
//! ([`Chain::check`], [`Chain::transform`]) or registry entries dispatched by
//! id ([`Chain::run`], [`Chain::run_transform`]). A failing check is recorded
//! and the chain keeps going; only contract violations (bad labels, unknown
//! ids, malformed arguments) surface as [`ChainError`].
//!
//! # Examples
//!
//! ```
//! use gauntlet::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> ChainResult<()> {
//! let mut chain = Chain::new();
//! chain
//!     .declare("age", 17)?
//!     .run("is_int", &[])?
//!     .run("is_int", &[json!({ "min": 18 })])?
//!     .with_message("must be an adult");
//!
//! assert_eq!(chain.error_count(), 1);
//! assert_eq!(chain.values()["age"], json!("17"));
//! # Ok(())
//! # }
//! ```

mod state;

pub use state::{Resume, RunState};

use std::mem;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{ChainError, ChainResult};
use crate::registry::Registry;
use crate::results::{LabelResult, Results};
use crate::value;

/// Name recorded for anonymous checks.
const DEFAULT_CHECK_NAME: &str = "custom";

// ============================================================================
// DECLARE OPTIONS
// ============================================================================

/// Per-declaration options for [`Chain::declare_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclareOptions {
    /// Store the value as given instead of normalizing it to text.
    pub preserve_type: bool,
    /// Lift a bail before the declaration's gate is evaluated.
    pub unbail: bool,
}

impl DeclareOptions {
    /// Default options: normalize to text, keep any bail in place.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            preserve_type: false,
            unbail: false,
        }
    }

    /// Keeps the declared value's type instead of normalizing to text.
    #[must_use]
    pub const fn with_preserved_type(mut self) -> Self {
        self.preserve_type = true;
        self
    }

    /// Lifts a bail before the gate is evaluated.
    #[must_use]
    pub const fn with_unbail(mut self) -> Self {
        self.unbail = true;
        self
    }
}

// ============================================================================
// CHAIN
// ============================================================================

/// The value currently being operated on.
#[derive(Debug, Clone, Default)]
struct ChainInput {
    label: Option<String>,
    value: Value,
}

/// Control state and accumulated results.
#[derive(Debug, Clone, Default)]
struct ChainStatus {
    state: RunState,
    invert_next: bool,
    last_check: Option<String>,
    results: Results,
}

/// A stateful validation chain.
///
/// Construct one per logical validation run; a chain is `Send` but holds no
/// interior locking, so concurrent validations should each use their own
/// instance.
#[derive(Debug, Clone)]
pub struct Chain {
    registry: Arc<Registry>,
    input: ChainInput,
    status: ChainStatus,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    /// Creates a chain backed by the shared builtin registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Registry::shared())
    }

    /// Creates a chain backed by a caller-supplied registry.
    #[must_use]
    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            input: ChainInput::default(),
            status: ChainStatus::default(),
        }
    }

    /// The registry this chain dispatches `run` / `run_transform` through.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    /// Declares a new labeled value with default options: the value is
    /// normalized to text and an active bail is left in place.
    ///
    /// # Errors
    ///
    /// [`ChainError::EmptyLabel`] for an empty label,
    /// [`ChainError::DuplicateLabel`] when the label already has results.
    pub fn declare(
        &mut self,
        label: impl Into<String>,
        value: impl Into<Value>,
    ) -> ChainResult<&mut Self> {
        self.declare_with(label, value, DeclareOptions::new())
    }

    /// Declares a new labeled value.
    ///
    /// Order of effects: an optional unbail first, then the bailed/suspended
    /// gate, then the per-label skip is cleared, then the label is validated.
    /// The skip-clear precedes validation, so a duplicate label still clears
    /// a pending skip.
    ///
    /// # Errors
    ///
    /// [`ChainError::EmptyLabel`] for an empty label,
    /// [`ChainError::DuplicateLabel`] when the label already has results.
    pub fn declare_with(
        &mut self,
        label: impl Into<String>,
        value: impl Into<Value>,
        options: DeclareOptions,
    ) -> ChainResult<&mut Self> {
        if options.unbail {
            self.status.state = self.status.state.unbail();
        }
        if self.status.state.is_halted() {
            return Ok(self);
        }
        self.status.state = self.status.state.clear_skip();

        let label = label.into();
        if label.is_empty() {
            return Err(ChainError::EmptyLabel);
        }
        if self.status.results.contains_label(&label) {
            return Err(ChainError::DuplicateLabel { label });
        }

        let value = value.into();
        let value = if options.preserve_type {
            value
        } else {
            value::to_text(&value)
        };
        debug!(label = %label, "declared chain value");
        self.status.last_check = None;
        self.status.invert_next = false;
        self.status.results.seed(label.clone(), value.clone());
        self.input = ChainInput {
            label: Some(label),
            value,
        };
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Checks and transforms
    // ------------------------------------------------------------------

    /// Runs a named check closure against the current value and records the
    /// outcome. A `true` verdict records `error: false` and vice versa; a
    /// pending `not()` swaps that. An empty name falls back to `"custom"`.
    pub fn check<F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: FnOnce(&Value) -> bool,
    {
        // infallible closure, the dispatch error path is unreachable
        let _ = self.record_check(name, |value| Ok(f(value)));
        self
    }

    /// Runs an anonymous check closure, recorded under `"custom"`.
    pub fn custom<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&Value) -> bool,
    {
        self.check(DEFAULT_CHECK_NAME, f)
    }

    /// Replaces the current value (and the label's stored value) with the
    /// closure's output. Transforms record no outcome.
    pub fn transform<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&Value) -> Value,
    {
        // infallible closure, the dispatch error path is unreachable
        let _ = self.apply_transform(|value| Ok(f(value)));
        self
    }

    /// Dispatches a registered check by id.
    ///
    /// # Errors
    ///
    /// [`ChainError::UnknownCheck`] when the id is not registered — raised
    /// even while the chain is gated. Argument errors reported by the
    /// callable propagate as [`ChainError::InvalidArgument`].
    pub fn run(&mut self, id: &str, args: &[Value]) -> ChainResult<&mut Self> {
        let Some(check) = self.registry.check(id) else {
            return Err(ChainError::UnknownCheck { id: id.to_string() });
        };
        self.record_check(id, |value| check(value, args))
    }

    /// Dispatches a registered transform by id.
    ///
    /// # Errors
    ///
    /// [`ChainError::UnknownTransform`] when the id is not registered —
    /// raised even while the chain is gated. Argument errors reported by the
    /// callable propagate as [`ChainError::InvalidArgument`].
    pub fn run_transform(&mut self, id: &str, args: &[Value]) -> ChainResult<&mut Self> {
        let Some(transform) = self.registry.transform(id) else {
            return Err(ChainError::UnknownTransform { id: id.to_string() });
        };
        self.apply_transform(|value| transform(value, args))
    }

    /// Generic wrapper every check funnels through.
    ///
    /// Consumes `invert_next` before anything else: once a check is
    /// attempted, a pending invert is spent whether or not the gate lets the
    /// callable run. With no declared label the attempt is otherwise a no-op.
    /// The label's entry is seeded if absent before the gate applies, so
    /// views stay consistent even for gated attempts.
    fn record_check<F>(&mut self, name: &str, exec: F) -> ChainResult<&mut Self>
    where
        F: FnOnce(&Value) -> ChainResult<bool>,
    {
        let invert = mem::take(&mut self.status.invert_next);
        let Some(label) = self.input.label.clone() else {
            return Ok(self);
        };
        self.status.results.seed_if_absent(&label, &self.input.value);
        if !self.status.state.is_active() {
            return Ok(self);
        }

        let name = if name.is_empty() {
            DEFAULT_CHECK_NAME
        } else {
            name
        };
        let verdict = exec(&self.input.value)?;
        let error = if invert { verdict } else { !verdict };
        if let Some(key) = self.status.results.record(&label, name, error) {
            trace!(label = %label, check = %key, error, "recorded check outcome");
            self.status.last_check = Some(key);
        }
        Ok(self)
    }

    /// Generic wrapper every transform funnels through. Same label and gate
    /// handling as [`Self::record_check`], without touching `invert_next` or
    /// `last_check`.
    fn apply_transform<F>(&mut self, exec: F) -> ChainResult<&mut Self>
    where
        F: FnOnce(&Value) -> ChainResult<Value>,
    {
        let Some(label) = self.input.label.clone() else {
            return Ok(self);
        };
        self.status.results.seed_if_absent(&label, &self.input.value);
        if !self.status.state.is_active() {
            return Ok(self);
        }

        let next = exec(&self.input.value)?;
        trace!(label = %label, "applied transform");
        self.input.value = next.clone();
        self.status.results.set_value(&label, next);
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Modifiers
    // ------------------------------------------------------------------

    /// Skips the rest of the current label when its value is absent (`Null`
    /// or `""`). Skipped checks and transforms record nothing until the next
    /// declaration.
    pub fn optional(&mut self) -> &mut Self {
        if value::is_empty_value(&self.input.value) {
            self.status.state = self.status.state.skip();
        }
        self
    }

    /// Inverts the outcome of the next check attempt. No-op while bailed or
    /// suspended.
    pub fn not(&mut self) -> &mut Self {
        if !self.status.state.is_halted() {
            self.status.invert_next = true;
        }
        self
    }

    /// Stops the chain if any failure has been recorded so far. Bailing
    /// while suspended collapses the suspension but keeps its resume state.
    /// Inert when no failures exist.
    pub fn bail(&mut self) -> &mut Self {
        let errors = self.error_count();
        if errors > 0 && !self.status.state.is_bailed() {
            self.status.state = self.status.state.bail();
            debug!(errors, "chain bailed");
        }
        self
    }

    /// Lifts a bail, restoring the state it interrupted (a pre-bail skip
    /// stays in force). No-op when not bailed.
    pub fn unbail(&mut self) -> &mut Self {
        if self.status.state.is_bailed() {
            self.status.state = self.status.state.unbail();
            debug!("chain bail lifted");
        }
        self
    }

    /// Suspends the chain until [`Self::end_branch`] when the predicate
    /// rejects the current value. The predicate is not evaluated while
    /// bailed or suspended.
    pub fn branch_if<F>(&mut self, pred: F) -> &mut Self
    where
        F: FnOnce(&Value) -> bool,
    {
        if self.status.state.is_halted() {
            return self;
        }
        if !pred(&self.input.value) {
            self.status.state = self.status.state.suspend();
        }
        self
    }

    /// Like [`Self::branch_if`], but the predicate also sees the current
    /// values view, so a branch can depend on other labels.
    pub fn branch_if_values<F>(&mut self, pred: F) -> &mut Self
    where
        F: FnOnce(&Value, &IndexMap<String, Value>) -> bool,
    {
        if self.status.state.is_halted() {
            return self;
        }
        let values = self.status.results.values();
        if !pred(&self.input.value, &values) {
            self.status.state = self.status.state.suspend();
        }
        self
    }

    /// Closes a branch opened by [`Self::branch_if`], restoring the state
    /// the suspension covered. No-op when not suspended.
    pub fn end_branch(&mut self) -> &mut Self {
        self.status.state = self.status.state.resume_branch();
        self
    }

    /// Attaches a message to the most recent outcome, provided the chain is
    /// active and that outcome failed. Passing checks never carry messages.
    pub fn with_message(&mut self, message: impl Into<Value>) -> &mut Self {
        if let Some((label, key)) = self.last_failing_target() {
            self.status.results.set_message(&label, &key, message.into());
        }
        self
    }

    /// Like [`Self::with_message`], but the message is produced from the
    /// current value. The closure only runs when a message will actually be
    /// attached.
    pub fn with_message_fn<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&Value) -> Value,
    {
        if let Some((label, key)) = self.last_failing_target() {
            let message = f(&self.input.value);
            self.status.results.set_message(&label, &key, message);
        }
        self
    }

    fn last_failing_target(&self) -> Option<(String, String)> {
        if !self.status.state.is_active() {
            return None;
        }
        let label = self.input.label.as_deref()?;
        let key = self.status.last_check.as_deref()?;
        self.status
            .results
            .outcome(label, key)
            .is_some_and(|o| o.error)
            .then(|| (label.to_string(), key.to_string()))
    }

    /// Adds result entries without running anything through the chain,
    /// bypassing every gate. Existing labels are only replaced when
    /// `overwrite` is set; replacement drops that label's outcomes. Seeded
    /// labels count as declared for duplicate detection.
    pub fn seed_values<I, K>(&mut self, values: I, overwrite: bool) -> &mut Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (label, value) in values {
            let label = label.into();
            if overwrite || !self.status.results.contains_label(&label) {
                self.status.results.seed(label, value);
            }
        }
        self
    }

    /// Hands the current value to a closure for a side effect (logging,
    /// capturing a copy). Gated like a check: nothing happens unless the
    /// chain is active.
    pub fn peek<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&Value),
    {
        if self.status.state.is_active() {
            f(&self.input.value);
        }
        self
    }

    /// Replaces an absent current value (`Null` or `""`) with `value`, both
    /// in the input and in the label's stored entry. Gated like a transform.
    pub fn default_value(&mut self, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        // infallible closure, the dispatch error path is unreachable
        let _ = self.apply_transform(|current| {
            Ok(if value::is_empty_value(current) {
                value
            } else {
                current.clone()
            })
        });
        self
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Total failing outcomes across all labels.
    pub fn error_count(&self) -> usize {
        self.status.results.error_count()
    }

    /// Labels with at least one failure, reduced to their failing outcomes.
    pub fn errors(&self) -> IndexMap<String, LabelResult> {
        self.status.results.errors()
    }

    /// Final value of every label, in declaration order.
    pub fn values(&self) -> IndexMap<String, Value> {
        self.status.results.values()
    }

    /// The full accumulator.
    pub fn results(&self) -> &Results {
        &self.status.results
    }

    /// The value currently being operated on.
    pub fn value(&self) -> &Value {
        &self.input.value
    }

    /// The label currently being operated on.
    pub fn label(&self) -> Option<&str> {
        self.input.label.as_deref()
    }

    /// Disambiguated key of the most recently executed check.
    pub fn last_check(&self) -> Option<&str> {
        self.status.last_check.as_deref()
    }

    /// Where execution currently stands.
    pub fn run_state(&self) -> RunState {
        self.status.state
    }

    /// Resets input and status to the constructed state. The registry is
    /// kept, so previously registered callables stay available.
    pub fn clear_results(&mut self) -> &mut Self {
        debug!("chain results cleared");
        self.input = ChainInput::default();
        self.status = ChainStatus::default();
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn declare_normalizes_to_text() {
        let mut chain = Chain::new();
        chain.declare("age", 17).unwrap();
        assert_eq!(chain.value(), &json!("17"));
        chain.declare("tags", json!(["a", 1])).unwrap();
        assert_eq!(chain.value(), &json!(r#"["a",1]"#));
        chain.declare("gone", Value::Null).unwrap();
        assert_eq!(chain.value(), &json!(""));
    }

    #[test]
    fn declare_with_preserved_type_keeps_the_raw_value() {
        let mut chain = Chain::new();
        chain
            .declare_with("age", 17, DeclareOptions::new().with_preserved_type())
            .unwrap();
        assert_eq!(chain.value(), &json!(17));
        assert_eq!(chain.values()["age"], json!(17));
    }

    #[test]
    fn empty_and_duplicate_labels_are_rejected() {
        let mut chain = Chain::new();
        assert_eq!(chain.declare("", "x").unwrap_err(), ChainError::EmptyLabel);
        chain.declare("name", "ada").unwrap();
        assert_eq!(
            chain.declare("name", "other").unwrap_err(),
            ChainError::DuplicateLabel {
                label: "name".into()
            }
        );
    }

    #[test]
    fn seeded_labels_collide_with_later_declares() {
        let mut chain = Chain::new();
        chain.seed_values([("raw", json!({"a": 1}))], false);
        assert_eq!(
            chain.declare("raw", "x").unwrap_err(),
            ChainError::DuplicateLabel { label: "raw".into() }
        );
    }

    #[test]
    fn duplicate_label_error_still_clears_a_pending_skip() {
        let mut chain = Chain::new();
        chain.declare("a", "").unwrap();
        chain.optional();
        assert!(chain.run_state().is_skipped());
        assert!(chain.declare("a", "x").is_err());
        assert!(chain.run_state().is_active());
    }

    #[test]
    fn declare_while_bailed_is_a_gated_no_op() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain.check("fails", |_| false).bail();
        chain.declare("b", "y").unwrap();
        assert!(!chain.results().contains_label("b"));
        assert_eq!(chain.label(), Some("a"));
    }

    #[test]
    fn declare_with_unbail_reactivates_the_chain() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain.check("fails", |_| false).bail();
        chain
            .declare_with("b", "y", DeclareOptions::new().with_unbail())
            .unwrap();
        assert!(chain.results().contains_label("b"));
        assert!(chain.run_state().is_active());
    }

    #[test]
    fn check_records_the_negated_verdict() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain.check("passes", |_| true).check("fails", |_| false);
        assert_eq!(
            chain.results().outcome("a", "passes").map(|o| o.error),
            Some(false)
        );
        assert_eq!(
            chain.results().outcome("a", "fails").map(|o| o.error),
            Some(true)
        );
        assert_eq!(chain.last_check(), Some("fails"));
    }

    #[test]
    fn custom_and_empty_names_fall_back() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain.custom(|_| false).check("", |_| false);
        assert!(chain.results().outcome("a", "custom_0").is_some());
        assert!(chain.results().outcome("a", "custom_1").is_some());
    }

    #[test]
    fn check_without_a_label_is_a_no_op() {
        let mut chain = Chain::new();
        chain.check("anything", |_| false);
        assert!(chain.results().is_empty());
        assert_eq!(chain.last_check(), None);
    }

    #[test]
    fn not_inverts_exactly_one_check() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain
            .not()
            .check("inverted", |_| true)
            .check("straight", |_| true);
        assert_eq!(
            chain.results().outcome("a", "inverted").map(|o| o.error),
            Some(true)
        );
        assert_eq!(
            chain.results().outcome("a", "straight").map(|o| o.error),
            Some(false)
        );
    }

    #[test]
    fn invert_is_spent_by_a_gated_check_attempt() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain
            .not()
            .branch_if(|_| false)
            .check("swallowed", |_| true)
            .end_branch()
            .check("after", |_| true);
        assert!(chain.results().outcome("a", "swallowed").is_none());
        assert_eq!(
            chain.results().outcome("a", "after").map(|o| o.error),
            Some(false)
        );
    }

    #[test]
    fn optional_skips_the_rest_of_an_absent_label() {
        let mut chain = Chain::new();
        chain.declare("phone", "").unwrap();
        chain
            .optional()
            .check("never_runs", |_| false)
            .transform(|_| json!("mutated"));
        assert_eq!(chain.results().get("phone").unwrap().outcome_count(), 0);
        assert_eq!(chain.values()["phone"], json!(""));
        chain.declare("name", "ada").unwrap();
        chain.check("runs", |_| true);
        assert!(chain.results().outcome("name", "runs").is_some());
    }

    #[test]
    fn optional_leaves_present_values_alone() {
        let mut chain = Chain::new();
        chain.declare("phone", "555").unwrap();
        chain.optional().check("runs", |_| true);
        assert!(chain.results().outcome("phone", "runs").is_some());
    }

    #[test]
    fn bail_freezes_results_until_unbail() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain.check("fails", |_| false).bail();
        let frozen = chain.results().clone();
        chain
            .check("ignored", |_| false)
            .transform(|_| json!("mutated"))
            .optional();
        assert_eq!(chain.results(), &frozen);
        chain.unbail().check("counted", |_| true);
        assert!(chain.results().outcome("a", "counted").is_some());
    }

    #[test]
    fn bail_without_errors_is_inert() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain.check("passes", |_| true).bail();
        assert!(chain.run_state().is_active());
    }

    #[test]
    fn unbail_restores_a_skip_that_predated_the_bail() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain.check("fails", |_| false);
        chain.declare("b", "").unwrap();
        chain.optional().bail();
        assert!(chain.run_state().is_bailed());
        chain.unbail();
        assert!(chain.run_state().is_skipped());
        chain.check("still_skipped", |_| false);
        assert_eq!(chain.results().get("b").unwrap().outcome_count(), 0);
    }

    #[test]
    fn branch_swallows_checks_until_end_branch() {
        let mut chain = Chain::new();
        chain.declare("mode", "basic").unwrap();
        chain
            .branch_if(|v| v == &json!("advanced"))
            .check("inside", |_| false)
            .end_branch()
            .check("outside", |_| true);
        assert!(chain.results().outcome("mode", "inside").is_none());
        assert!(chain.results().outcome("mode", "outside").is_some());
        assert_eq!(chain.error_count(), 0);
    }

    #[test]
    fn taken_branches_run_their_checks() {
        let mut chain = Chain::new();
        chain.declare("mode", "advanced").unwrap();
        chain
            .branch_if(|v| v == &json!("advanced"))
            .check("inside", |_| false)
            .end_branch();
        assert_eq!(chain.error_count(), 1);
    }

    #[test]
    fn branch_if_values_sees_other_labels() {
        let mut chain = Chain::new();
        chain.declare("country", "US").unwrap();
        chain.declare("zip", "90210").unwrap();
        chain
            .branch_if_values(|_, values| values["country"] == json!("US"))
            .check("us_zip", |v| v.as_str().is_some_and(|s| s.len() == 5))
            .end_branch();
        assert!(chain.results().outcome("zip", "us_zip").is_some());
    }

    #[test]
    fn branch_predicate_is_not_evaluated_while_suspended() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain
            .branch_if(|_| false)
            .branch_if(|_| panic!("must not run"))
            .end_branch();
        assert!(chain.run_state().is_active());
    }

    #[test]
    fn with_message_attaches_to_failing_outcomes_only() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain
            .check("passes", |_| true)
            .with_message("never stored")
            .check("fails", |_| false)
            .with_message("stored");
        assert_eq!(
            chain
                .results()
                .outcome("a", "passes")
                .and_then(|o| o.message.clone()),
            None
        );
        assert_eq!(
            chain
                .results()
                .outcome("a", "fails")
                .and_then(|o| o.message.clone()),
            Some(json!("stored"))
        );
    }

    #[test]
    fn with_message_is_gated_while_skipped() {
        let mut chain = Chain::new();
        chain.declare("a", "").unwrap();
        chain.check("fails", |_| false).optional().with_message("late");
        assert_eq!(
            chain
                .results()
                .outcome("a", "fails")
                .and_then(|o| o.message.clone()),
            None
        );
    }

    #[test]
    fn with_message_fn_runs_only_for_failures() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        let mut called = false;
        chain.check("passes", |_| true).with_message_fn(|_| {
            called = true;
            json!("unused")
        });
        assert!(!called);
        chain.check("fails", |_| false).with_message_fn(|v| {
            json!(format!("{v} was rejected"))
        });
        assert_eq!(
            chain
                .results()
                .outcome("a", "fails")
                .and_then(|o| o.message.clone()),
            Some(json!("\"x\" was rejected"))
        );
    }

    #[test]
    fn seed_values_bypasses_gates_and_respects_overwrite() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain.check("fails", |_| false).bail();
        chain.seed_values([("raw", json!({"kept": true}))], false);
        assert_eq!(chain.results().get("raw").unwrap().value(), &json!({"kept": true}));

        chain.seed_values([("raw", json!("replaced"))], false);
        assert_eq!(chain.results().get("raw").unwrap().value(), &json!({"kept": true}));
        chain.seed_values([("raw", json!("replaced"))], true);
        assert_eq!(chain.results().get("raw").unwrap().value(), &json!("replaced"));
    }

    #[test]
    fn seed_overwrite_drops_previous_outcomes() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain.check("fails", |_| false);
        assert_eq!(chain.error_count(), 1);
        chain.seed_values([("a", json!("fresh"))], true);
        assert_eq!(chain.error_count(), 0);
    }

    #[test]
    fn peek_is_gated() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        let mut seen = None;
        chain.peek(|v| seen = Some(v.clone()));
        assert_eq!(seen, Some(json!("x")));

        chain.check("fails", |_| false).bail();
        chain.peek(|_| panic!("must not run"));
    }

    #[test]
    fn default_value_fills_absent_values_only() {
        let mut chain = Chain::new();
        chain.declare("mode", "").unwrap();
        chain.default_value("standard");
        assert_eq!(chain.value(), &json!("standard"));
        assert_eq!(chain.values()["mode"], json!("standard"));

        chain.declare("name", "ada").unwrap();
        chain.default_value("anonymous");
        assert_eq!(chain.value(), &json!("ada"));
    }

    #[test]
    fn transforms_update_input_and_stored_value() {
        let mut chain = Chain::new();
        chain.declare("name", "  Ada  ").unwrap();
        chain
            .transform(|v| json!(v.as_str().unwrap_or_default().trim()))
            .transform(|v| json!(v.as_str().unwrap_or_default().to_lowercase()));
        assert_eq!(chain.value(), &json!("ada"));
        assert_eq!(chain.values()["name"], json!("ada"));
    }

    #[test]
    fn run_unknown_ids_error_even_while_bailed() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain.check("fails", |_| false).bail();
        assert_eq!(
            chain.run("no_such_check", &[]).unwrap_err(),
            ChainError::UnknownCheck {
                id: "no_such_check".into()
            }
        );
        assert_eq!(
            chain.run_transform("no_such_transform", &[]).unwrap_err(),
            ChainError::UnknownTransform {
                id: "no_such_transform".into()
            }
        );
    }

    #[test]
    fn gated_dispatch_does_not_invoke_the_callable() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        fn counting(_: &Value, _: &[Value]) -> ChainResult<bool> {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }

        let mut registry = Registry::new();
        registry.register_check("counting", counting);
        let mut chain = Chain::with_registry(Arc::new(registry));
        chain.declare("a", "").unwrap();
        chain.optional();
        chain.run("counting", &[]).unwrap();
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clear_results_returns_to_the_constructed_state() {
        let mut chain = Chain::new();
        chain.declare("a", "x").unwrap();
        chain.check("fails", |_| false).bail();
        chain.clear_results();
        assert!(chain.results().is_empty());
        assert_eq!(chain.label(), None);
        assert_eq!(chain.value(), &Value::Null);
        assert_eq!(chain.last_check(), None);
        assert!(chain.run_state().is_active());
        // the same label is declarable again after a reset
        chain.declare("a", "y").unwrap();
        assert_eq!(chain.values()["a"], json!("y"));
    }

    #[test]
    fn registry_survives_a_reset() {
        fn always(_: &Value, _: &[Value]) -> ChainResult<bool> {
            Ok(true)
        }
        let mut registry = Registry::new();
        registry.register_check("always", always);
        let mut chain = Chain::with_registry(Arc::new(registry));
        chain.clear_results();
        chain.declare("a", "x").unwrap();
        chain.run("always", &[]).unwrap();
        assert_eq!(chain.results().outcome("a", "always").map(|o| o.error), Some(false));
    }
}
