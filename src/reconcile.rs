//! Entry reconciliation: partitioning expected and actual entries.
//!
//! Given an actual [`Mapping`] and an expected one, reconciliation walks the
//! expected entries once, looks each key up in the actual map by equality
//! (never by display string), and sorts it into one of:
//!
//! - **matching**: key present, values correspond
//! - **wrong value**: key present, values do not correspond
//! - **missing**: key absent from the actual map
//!
//! In exact mode the actual entries left over become **unexpected**. Every
//! failed comparison or diff-formatting call lands in the
//! [`ExceptionTrace`]; a failed comparison always classifies the entry as a
//! wrong value, never as a match.

use crate::correspondence::{Correspondence, ExceptionTrace};
use crate::error::UsageError;
use crate::mapping::{Mapping, unique_entries};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// How strictly the actual key set has to match the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Containment {
    /// Key sets must be identical.
    Exact,
    /// Expected keys must be a subset of the actual keys.
    AtLeast,
}

/// A key present on both sides whose values do not correspond.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDifference {
    pub key: Value,
    pub expected: Value,
    pub actual: Value,
    /// Output of the correspondence's diff formatter, when it produced one.
    pub diff: Option<String>,
}

/// The four-way partition produced by reconciliation.
#[derive(Debug, Clone)]
pub struct ReconciliationResult {
    pub mode: Containment,
    /// Entries of the expected map whose actual value corresponds, in expected order.
    pub matching: Mapping,
    /// In expected order.
    pub wrong_value: Vec<ValueDifference>,
    /// Expected entries whose key is absent, in expected order.
    pub missing: Mapping,
    /// Actual entries whose key was not expected, in actual order.
    /// `None` in [`Containment::AtLeast`] mode.
    pub unexpected: Option<Mapping>,
    pub exceptions: ExceptionTrace,
}

impl ReconciliationResult {
    /// Whether the content check passes.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.missing.is_empty()
            && self.wrong_value.is_empty()
            && self.unexpected.as_ref().is_none_or(Mapping::is_empty)
    }

    /// Unexpected entries, if the mode tracks them and there are any.
    #[must_use]
    pub fn unexpected_entries(&self) -> Option<&Mapping> {
        self.unexpected.as_ref().filter(|m| !m.is_empty())
    }
}

/// Every actual key must match exactly one expected key and vice versa.
#[must_use]
pub fn reconcile_exact(
    actual: &Mapping,
    expected: &Mapping,
    correspondence: &Correspondence,
) -> ReconciliationResult {
    reconcile(actual, expected, correspondence, Containment::Exact)
}

/// Every expected key must be present with a corresponding value; extra
/// actual keys are ignored.
#[must_use]
pub fn reconcile_at_least(
    actual: &Mapping,
    expected: &Mapping,
    correspondence: &Correspondence,
) -> ReconciliationResult {
    reconcile(actual, expected, correspondence, Containment::AtLeast)
}

/// Reconcile in the given mode.
#[must_use]
pub fn reconcile(
    actual: &Mapping,
    expected: &Mapping,
    correspondence: &Correspondence,
    mode: Containment,
) -> ReconciliationResult {
    let mut exceptions = ExceptionTrace::new();
    let mut matching = Mapping::new();
    let mut wrong_value = Vec::new();
    let mut missing = Mapping::new();

    for entry in expected {
        match actual.get(&entry.key) {
            None => {
                missing.insert(entry.key.clone(), entry.value.clone());
            }
            Some(actual_value) => {
                if correspondence.safe_compare(actual_value, &entry.value, &mut exceptions) {
                    matching.insert(entry.key.clone(), entry.value.clone());
                } else {
                    let diff =
                        correspondence.safe_format_diff(actual_value, &entry.value, &mut exceptions);
                    wrong_value.push(ValueDifference {
                        key: entry.key.clone(),
                        expected: entry.value.clone(),
                        actual: actual_value.clone(),
                        diff,
                    });
                }
            }
        }
    }

    let unexpected = match mode {
        Containment::Exact => Some(
            actual
                .iter()
                .filter(|e| !expected.contains_key(&e.key))
                .cloned()
                .collect::<Mapping>(),
        ),
        Containment::AtLeast => None,
    };

    log::debug!(
        "reconciled {} expected against {} actual entries ({mode:?}): {} matching, {} wrong value, {} missing, {} unexpected, {} exceptions",
        expected.len(),
        actual.len(),
        matching.len(),
        wrong_value.len(),
        missing.len(),
        unexpected.as_ref().map_or(0, Mapping::len),
        exceptions.len(),
    );

    ReconciliationResult {
        mode,
        matching,
        wrong_value,
        missing,
        unexpected,
        exceptions,
    }
}

/// Actual keys that are not expected, in actual order.
///
/// Computed for both modes; the ambiguity resolver needs them even when
/// at-least mode does not report them.
#[must_use]
pub fn extra_keys<'a>(actual: &'a Mapping, expected: &Mapping) -> Vec<&'a Value> {
    actual.keys().filter(|k| !expected.contains_key(k)).collect()
}

/// Check key order, assuming the content check already passed.
///
/// In exact mode the two key sequences must be identical. In at-least mode
/// the actual keys are first restricted to the expected ones.
#[must_use]
pub fn check_order(actual: &Mapping, expected: &Mapping, mode: Containment) -> bool {
    match mode {
        Containment::Exact => actual.keys().eq(expected.keys()),
        Containment::AtLeast => actual
            .keys()
            .filter(|k| expected.contains_key(k))
            .eq(expected.keys()),
    }
}

/// Turn a flat `key, value, key, value, ...` list into an expected mapping.
///
/// # Errors
///
/// [`UsageError::OddArgumentCount`] for an odd-length list, and
/// [`UsageError::DuplicateKeys`] naming every repeated key with its count,
/// in the order the keys first appear. `method` names the calling
/// assertion in that message.
pub fn expected_from_flat(args: Vec<Value>, method: &'static str) -> Result<Mapping, UsageError> {
    if args.len() % 2 != 0 {
        return Err(UsageError::OddArgumentCount(args.len()));
    }

    let mut pairs = Vec::with_capacity(args.len() / 2);
    let mut iter = args.into_iter();
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        pairs.push((key, value));
    }
    unique_entries(pairs, method)
}
