//! Failure reports: ordered lists of named facts.
//!
//! The order of facts is part of the contract. A containment failure is
//! always laid out as:
//!
//! 1. the headline, a name-only fact of the form
//!    `Not true that <actual> <relation> <expected>. It <clauses>`, where the
//!    clauses appear in the fixed order missing, unexpected, wrong value and
//!    are joined with "and";
//! 2. if any comparison failed, `additionally, one or more exceptions were
//!    thrown while comparing values` followed by `first exception`;
//! 3. if any diff formatting failed, the same pair for formatting diffs.

use crate::ambiguity::Annotations;
use crate::correspondence::{ExceptionTrace, Phase};
use crate::mapping::Mapping;
use crate::reconcile::{ReconciliationResult, extra_keys};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clause for expected entries whose key is absent.
pub const MISSING: &str = "is missing keys for the following entries";
/// Clause for actual entries whose key was not expected.
pub const UNEXPECTED: &str = "has the following entries with unexpected keys";
/// Clause for keys present on both sides with values that do not correspond.
pub const WRONG_VALUE: &str = "has the following entries with matching keys but different values";
/// Fact holding the rendered first recorded failure of a phase.
pub const FIRST_EXCEPTION: &str = "first exception";
/// Fact holding the number of recorded failures of a phase, when above one.
pub const TOTAL_EXCEPTIONS: &str = "total exceptions";

/// A named piece of a failure report. Facts without a value render as
/// their key alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub key: String,
    pub value: Option<String>,
}

impl Fact {
    pub fn new(key: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            key: key.into(),
            value: Some(value.to_string()),
        }
    }

    pub fn simple(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {value}", self.key),
            None => f.write_str(&self.key),
        }
    }
}

/// The ordered facts describing one failed assertion, plus the full trace
/// of correspondence failures behind the `first exception` facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    facts: Vec<Fact>,
    exceptions: ExceptionTrace,
}

impl FailureReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A report holding the given facts.
    #[must_use]
    pub fn of(facts: Vec<Fact>) -> Self {
        Self {
            facts,
            exceptions: ExceptionTrace::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, fact: Fact) -> Self {
        self.facts.push(fact);
        self
    }

    /// Attach a trace, appending its `additionally, ...` fact groups.
    #[must_use]
    pub fn with_exceptions(mut self, exceptions: ExceptionTrace) -> Self {
        self.facts.extend(exception_facts(&exceptions, true));
        self.with_trace(exceptions)
    }

    /// Attach a trace without adding any facts.
    #[must_use]
    pub fn with_trace(mut self, exceptions: ExceptionTrace) -> Self {
        self.exceptions = exceptions;
        self
    }

    #[must_use]
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    #[must_use]
    pub fn exceptions(&self) -> &ExceptionTrace {
        &self.exceptions
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.facts.iter().map(|f| f.key.as_str())
    }

    /// Value of the first fact named `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.facts
            .iter()
            .find(|f| f.key == key)
            .and_then(|f| f.value.as_deref())
    }

    /// Values of every fact named `key`, in report order.
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> {
        self.facts
            .iter()
            .filter(move |f| f.key == key)
            .filter_map(|f| f.value.as_deref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Serialize the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, fact) in self.facts.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{fact}")?;
        }
        Ok(())
    }
}

/// `Not true that <subject> <relation> <expected>`.
#[must_use]
pub fn headline(subject: &str, relation: &str, expected: &Mapping) -> String {
    format!("Not true that {subject} {relation} <{expected}>")
}

/// Report for a failed containment check.
///
/// Keys are annotated when they collide with another key that is missing,
/// extra or has a wrong value. Values inside wrong-value entries are
/// annotated only when `annotate_values` is set (plain equality checks).
#[must_use]
pub fn containment_failure(
    subject: &str,
    relation: &str,
    actual: &Mapping,
    expected: &Mapping,
    result: &ReconciliationResult,
    annotate_values: bool,
) -> FailureReport {
    let clauses = difference_clauses(actual, expected, result, annotate_values);
    let line = format!(
        "{}. It {}",
        headline(subject, relation, expected),
        clauses.join(" and ")
    );
    FailureReport::new()
        .with(Fact::simple(line))
        .with_exceptions(result.exceptions.clone())
}

/// Report for entries that match but appear in the wrong order.
#[must_use]
pub fn order_failure(subject: &str, relation: &str, expected: &Mapping) -> FailureReport {
    FailureReport::new().with(Fact::simple(headline(subject, relation, expected)))
}

/// Report for an exact check against an empty expectation.
#[must_use]
pub fn expected_empty(actual: &Mapping) -> FailureReport {
    FailureReport::of(vec![
        Fact::simple("expected to be empty"),
        Fact::new("but was", actual),
    ])
}

/// The missing, unexpected and wrong-value clauses, in that order, each
/// present only when its partition is non-empty.
#[must_use]
pub fn difference_clauses(
    actual: &Mapping,
    expected: &Mapping,
    result: &ReconciliationResult,
    annotate_values: bool,
) -> Vec<String> {
    let keys = Annotations::scan(
        result
            .missing
            .keys()
            .chain(extra_keys(actual, expected))
            .chain(result.wrong_value.iter().map(|d| &d.key)),
    );
    let values = if annotate_values {
        Annotations::scan(
            result
                .wrong_value
                .iter()
                .flat_map(|d| [&d.expected, &d.actual]),
        )
    } else {
        Annotations::none()
    };

    let mut clauses = Vec::new();
    if !result.missing.is_empty() {
        clauses.push(format!("{MISSING}: {}", render_entries(&result.missing, &keys)));
    }
    if let Some(unexpected) = result.unexpected_entries() {
        clauses.push(format!("{UNEXPECTED}: {}", render_entries(unexpected, &keys)));
    }
    if !result.wrong_value.is_empty() {
        let rendered: Vec<String> = result
            .wrong_value
            .iter()
            .map(|d| {
                let diff = d
                    .diff
                    .as_ref()
                    .map(|diff| format!(", diff: {diff}"))
                    .unwrap_or_default();
                format!(
                    "{}=(expected {} but got {}{diff})",
                    keys.render(&d.key),
                    values.render(&d.expected),
                    values.render(&d.actual),
                )
            })
            .collect();
        clauses.push(format!("{WRONG_VALUE}: {{{}}}", rendered.join(", ")));
    }
    clauses
}

/// One fact group per phase with recorded failures, compare first.
///
/// `additionally` prefixes the group header with "additionally, " for
/// reports where the failures are secondary to a mismatch.
#[must_use]
pub fn exception_facts(trace: &ExceptionTrace, additionally: bool) -> Vec<Fact> {
    let mut facts = Vec::new();
    for phase in [Phase::Compare, Phase::FormatDiff] {
        let Some(first) = trace.first(phase) else {
            continue;
        };
        let prefix = if additionally { "additionally, " } else { "" };
        facts.push(Fact::simple(format!(
            "{prefix}one or more exceptions were thrown while {}",
            phase.activity()
        )));
        facts.push(Fact::new(FIRST_EXCEPTION, first));
        let count = trace.count(phase);
        if count > 1 {
            facts.push(Fact::new(TOTAL_EXCEPTIONS, count));
        }
    }
    facts
}

fn render_entries(entries: &Mapping, keys: &Annotations) -> String {
    let rendered: Vec<String> = entries
        .iter()
        .map(|e| format!("{}={}", keys.render(&e.key), e.value))
        .collect();
    format!("{{{}}}", rendered.join(", "))
}
