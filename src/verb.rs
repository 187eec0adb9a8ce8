//! Entry points for starting an assertion.

use crate::failure::{FailureStrategy, PanicStrategy};
use crate::mapping::MapLike;
use crate::subject::MapSubject;

static PANIC: PanicStrategy = PanicStrategy;

/// Begin an assertion about `actual`, panicking on failure.
///
/// # Example
///
/// ```
/// use mapfacts::{assert_that, entries};
/// use std::collections::BTreeMap;
///
/// let months = BTreeMap::from([("feb", 2), ("jan", 1)]);
/// assert_that(&months).contains_entry("jan", 1);
/// assert_that(&months).contains_exactly(entries!["feb", 2, "jan", 1])?.in_order();
/// # Ok::<(), mapfacts::UsageError>(())
/// ```
pub fn assert_that<M: MapLike>(actual: &M) -> MapSubject<'_> {
    AssertionBuilder::new().that(actual)
}

/// Begin an assertion whose failure message starts with `message`.
pub fn assert_with_message(message: impl Into<String>) -> AssertionBuilder<'static> {
    AssertionBuilder::new().with_message(message)
}

/// Per-assertion configuration: where failures go and how they are
/// introduced.
#[derive(Clone)]
pub struct AssertionBuilder<'s> {
    strategy: &'s dyn FailureStrategy,
    message: Option<String>,
}

impl AssertionBuilder<'static> {
    /// A builder that panics on failure.
    #[must_use]
    pub fn new() -> Self {
        Self::with_strategy(&PANIC)
    }
}

impl Default for AssertionBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'s> AssertionBuilder<'s> {
    /// A builder that reports failures to `strategy`.
    #[must_use]
    pub fn with_strategy(strategy: &'s dyn FailureStrategy) -> Self {
        Self {
            strategy,
            message: None,
        }
    }

    /// Set the first line of the failure message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn that<'a, M: MapLike>(self, actual: &'a M) -> MapSubject<'a>
    where
        's: 'a,
    {
        MapSubject::new(self.strategy, self.message, actual)
    }
}
