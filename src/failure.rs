//! Reporting collaborators.
//!
//! An assertion that does not hold builds an [`AssertionFailure`] and hands
//! it to the [`FailureStrategy`] it was created with. The strategy decides
//! what a failure means for the host: [`PanicStrategy`] panics (the normal
//! behaviour inside `#[test]` functions), [`ExpectFailure`] records it so a
//! test can inspect the report.
//!
//! # Example
//!
//! ```
//! use mapfacts::{ExpectFailure, mapping};
//!
//! let expect = ExpectFailure::new();
//! expect.that(&mapping! { "jan" => 1 }).contains_key("feb");
//!
//! let failure = expect.failure().expect("assertion should have failed");
//! assert_eq!(failure.report().value("expected to contain"), Some("feb"));
//! ```

use crate::mapping::MapLike;
use crate::report::{Fact, FailureReport};
use crate::subject::MapSubject;
use crate::verb::AssertionBuilder;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;

/// What happens when an assertion fails.
pub trait FailureStrategy {
    fn fail(&self, failure: AssertionFailure);
}

/// A failed assertion: the report plus the optional custom message and
/// subject name it was made with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    message: Option<String>,
    name: Option<String>,
    report: FailureReport,
}

impl AssertionFailure {
    #[must_use]
    pub fn new(report: FailureReport) -> Self {
        Self {
            message: None,
            name: None,
            report,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    #[must_use]
    pub fn report(&self) -> &FailureReport {
        &self.report
    }

    #[must_use]
    pub fn facts(&self) -> &[Fact] {
        self.report.facts()
    }

    /// Fact keys in report order.
    #[must_use]
    pub fn fact_keys(&self) -> Vec<&str> {
        self.report.keys().collect()
    }

    /// Value of the `index`-th fact named `key`.
    #[must_use]
    pub fn fact_value(&self, key: &str, index: usize) -> Option<&str> {
        self.facts()
            .iter()
            .filter(|f| f.key == key)
            .filter_map(|f| f.value.as_deref())
            .nth(index)
    }

    #[must_use]
    pub fn custom_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The full rendered message: the custom message, then `name: <name>`,
    /// then one line per fact.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Serialize the failure as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.message {
            writeln!(f, "{message}")?;
        }
        if let Some(name) = &self.name {
            writeln!(f, "name: {name}")?;
        }
        write!(f, "{}", self.report)
    }
}

impl std::error::Error for AssertionFailure {}

/// Panic with the rendered message.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicStrategy;

impl FailureStrategy for PanicStrategy {
    fn fail(&self, failure: AssertionFailure) {
        panic!("{failure}");
    }
}

/// Record failures instead of panicking.
///
/// Build subjects with [`that`](Self::that), run the assertion, then read
/// [`failure`](Self::failure). Single-threaded; the recorded failures live
/// behind a `RefCell`.
#[derive(Debug, Default)]
pub struct ExpectFailure {
    failures: RefCell<Vec<AssertionFailure>>,
}

impl ExpectFailure {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder whose assertions report to this recorder.
    #[must_use]
    pub fn builder(&self) -> AssertionBuilder<'_> {
        AssertionBuilder::with_strategy(self)
    }

    /// Start an assertion that reports to this recorder.
    pub fn that<'a, M: MapLike>(&'a self, actual: &'a M) -> MapSubject<'a> {
        self.builder().that(actual)
    }

    /// The most recent failure, if any.
    #[must_use]
    pub fn failure(&self) -> Option<AssertionFailure> {
        self.failures.borrow().last().cloned()
    }

    #[must_use]
    pub fn failures(&self) -> Vec<AssertionFailure> {
        self.failures.borrow().clone()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.borrow().len()
    }

    pub fn clear(&self) {
        self.failures.borrow_mut().clear();
    }

    /// Succeed only if nothing has failed.
    ///
    /// # Errors
    ///
    /// Returns the first recorded failure.
    pub fn verify(&self) -> anyhow::Result<()> {
        match self.failures.borrow().first() {
            Some(failure) => Err(anyhow::Error::new(failure.clone()).context(format!(
                "{} assertion(s) failed",
                self.failure_count()
            ))),
            None => Ok(()),
        }
    }
}

impl FailureStrategy for ExpectFailure {
    fn fail(&self, failure: AssertionFailure) {
        log::debug!("recorded failure with {} fact(s)", failure.facts().len());
        self.failures.borrow_mut().push(failure);
    }
}

impl fmt::Display for ExpectFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExpectFailure({} failures)", self.failure_count())
    }
}
