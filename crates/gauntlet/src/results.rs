//! The chain's result accumulator.
//!
//! Results are keyed by label in declaration order. Each label holds the
//! value as last seen by the chain plus one [`Outcome`] per check applied to
//! it, keyed by check id. Applying the same id twice under one label
//! disambiguates the keys with a numeric suffix so no outcome is lost.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;

// ============================================================================
// OUTCOME
// ============================================================================

/// The recorded result of a single check.
///
/// `error: false` means the check passed. A message is only ever attached to
/// a failing outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    /// Whether the check failed.
    pub error: bool,
    /// Caller-supplied context for a failure, attached via `with_message`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

impl Outcome {
    fn new(error: bool) -> Self {
        Self {
            error,
            message: None,
        }
    }
}

// ============================================================================
// LABEL RESULT
// ============================================================================

/// Everything recorded for one labeled value: the value itself and the
/// outcome of every check applied to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelResult {
    value: Value,
    #[serde(flatten)]
    outcomes: IndexMap<String, Outcome>,
    /// Base ids in application order, before suffix disambiguation.
    #[serde(skip)]
    applied: SmallVec<[String; 4]>,
    /// How many times each base id has been applied under this label.
    #[serde(skip)]
    counts: HashMap<String, usize>,
}

impl LabelResult {
    /// Creates an entry for a freshly declared value with no outcomes yet.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            outcomes: IndexMap::new(),
            applied: SmallVec::new(),
            counts: HashMap::new(),
        }
    }

    /// The value as last seen by the chain (transforms update it).
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    /// Looks up a single outcome by its (possibly suffixed) key.
    pub fn outcome(&self, key: &str) -> Option<&Outcome> {
        self.outcomes.get(key)
    }

    /// Iterates outcomes in the order they were recorded.
    pub fn outcomes(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.outcomes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of recorded outcomes.
    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Base check ids in application order, without suffixes.
    pub fn applied(&self) -> &[String] {
        &self.applied
    }

    /// Number of failing outcomes under this label.
    pub fn error_count(&self) -> usize {
        self.outcomes.values().filter(|o| o.error).count()
    }

    /// Whether any outcome under this label failed.
    pub fn has_errors(&self) -> bool {
        self.outcomes.values().any(|o| o.error)
    }

    /// Records an outcome for `id`, disambiguating repeated ids.
    ///
    /// The first application of an id is stored under the id itself. The
    /// second renames that plain entry to `id_0` (re-inserting it, so it
    /// moves after anything recorded in between) and stores itself as
    /// `id_1`; further applications append `id_2`, `id_3`, and so on.
    /// Returns the key the outcome was stored under.
    pub(crate) fn record(&mut self, id: &str, error: bool) -> String {
        let count = self
            .counts
            .entry(id.to_string())
            .and_modify(|c| *c += 1)
            .or_insert(1);
        let count = *count;
        self.applied.push(id.to_string());

        let key = if count == 1 {
            id.to_string()
        } else {
            if count == 2
                && let Some(first) = self.outcomes.shift_remove(id)
            {
                self.outcomes.insert(format!("{id}_0"), first);
            }
            format!("{id}_{}", count - 1)
        };
        self.outcomes.insert(key.clone(), Outcome::new(error));
        key
    }

    /// Attaches a message to an existing outcome. Returns `false` when the
    /// key is unknown.
    pub(crate) fn set_message(&mut self, key: &str, message: Value) -> bool {
        match self.outcomes.get_mut(key) {
            Some(outcome) => {
                outcome.message = Some(message);
                true
            }
            None => false,
        }
    }

    /// A view of this entry reduced to its failing outcomes, or `None` when
    /// every check passed. Bookkeeping fields are not carried into the view.
    fn failing_only(&self) -> Option<Self> {
        let failing: IndexMap<String, Outcome> = self
            .outcomes
            .iter()
            .filter(|(_, o)| o.error)
            .map(|(k, o)| (k.clone(), o.clone()))
            .collect();
        if failing.is_empty() {
            return None;
        }
        Some(Self {
            value: self.value.clone(),
            outcomes: failing,
            applied: SmallVec::new(),
            counts: HashMap::new(),
        })
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// All results accumulated by a chain, keyed by label in declaration order.
///
/// Serializes as a plain JSON object:
///
/// ```json
/// {
///   "age": {
///     "value": "17",
///     "is_int": { "error": false },
///     "is_int_even": { "error": true, "message": "must be even" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Results {
    entries: IndexMap<String, LabelResult>,
}

impl Results {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a fresh entry for `label`, replacing any existing entry
    /// (including its outcomes).
    pub(crate) fn seed(&mut self, label: impl Into<String>, value: Value) {
        self.entries.insert(label.into(), LabelResult::new(value));
    }

    /// Installs an entry for `label` only if none exists yet.
    pub(crate) fn seed_if_absent(&mut self, label: &str, value: &Value) {
        if !self.entries.contains_key(label) {
            self.entries
                .insert(label.to_string(), LabelResult::new(value.clone()));
        }
    }

    /// Whether any entry exists under `label`.
    pub fn contains_label(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Looks up the entry for `label`.
    pub fn get(&self, label: &str) -> Option<&LabelResult> {
        self.entries.get(label)
    }

    /// Number of labeled entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the accumulator holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in declaration order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LabelResult)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convenience lookup of a single outcome.
    pub fn outcome(&self, label: &str, key: &str) -> Option<&Outcome> {
        self.entries.get(label).and_then(|r| r.outcome(key))
    }

    pub(crate) fn record(&mut self, label: &str, id: &str, error: bool) -> Option<String> {
        self.entries.get_mut(label).map(|r| r.record(id, error))
    }

    pub(crate) fn set_value(&mut self, label: &str, value: Value) {
        if let Some(entry) = self.entries.get_mut(label) {
            entry.set_value(value);
        }
    }

    pub(crate) fn set_message(&mut self, label: &str, key: &str, message: Value) -> bool {
        self.entries
            .get_mut(label)
            .is_some_and(|r| r.set_message(key, message))
    }

    /// Total number of failing outcomes across all labels.
    pub fn error_count(&self) -> usize {
        self.entries.values().map(LabelResult::error_count).sum()
    }

    /// Labels that have at least one failing outcome, each reduced to its
    /// failing outcomes only.
    pub fn errors(&self) -> IndexMap<String, LabelResult> {
        self.entries
            .iter()
            .filter_map(|(label, entry)| {
                entry.failing_only().map(|view| (label.clone(), view))
            })
            .collect()
    }

    /// The final value of every label, in declaration order.
    pub fn values(&self) -> IndexMap<String, Value> {
        self.entries
            .iter()
            .map(|(label, entry)| (label.clone(), entry.value.clone()))
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
