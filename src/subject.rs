//! Fluent assertions on maps.
//!
//! A subject wraps the value under test together with the
//! [`FailureStrategy`] it reports to. The assertion methods validate their
//! arguments, run the reconciliation and hand any failure report to the
//! strategy:
//!
//! - [`MapSubject`]: plain equality on values
//! - [`ComparingValues`]: values matched through a [`Correspondence`]
//! - [`Ordered`]: the pending order check returned by every containment
//!   assertion
//!
//! # Example
//!
//! ```
//! use mapfacts::{ExpectFailure, entries, mapping};
//!
//! let expect = ExpectFailure::new();
//! let actual = mapping! { "jan" => 1, "march" => 3 };
//! expect.that(&actual).contains_exactly(entries!["march", 33, "feb", 2])?;
//!
//! let failure = expect.failure().expect("should fail");
//! assert_eq!(
//!     failure.message(),
//!     "Not true that <{jan=1, march=3}> contains exactly <{march=33, feb=2}>. \
//!      It is missing keys for the following entries: {feb=2} \
//!      and has the following entries with unexpected keys: {jan=1} \
//!      and has the following entries with matching keys but different values: \
//!      {march=(expected 33 but got 3)}"
//! );
//! # Ok::<(), mapfacts::UsageError>(())
//! ```

mod comparing;
mod map;
mod ordered;

pub use comparing::ComparingValues;
pub use map::MapSubject;
pub use ordered::Ordered;

use crate::correspondence::Correspondence;
use crate::failure::{AssertionFailure, FailureStrategy};
use crate::mapping::Mapping;
use crate::reconcile::{Containment, reconcile};
use crate::report::{self, FailureReport};

/// Everything an assertion needs to describe and report a failure.
#[derive(Clone)]
pub(crate) struct Context<'a> {
    strategy: &'a dyn FailureStrategy,
    message: Option<String>,
    name: Option<String>,
    actual: Mapping,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        strategy: &'a dyn FailureStrategy,
        message: Option<String>,
        actual: Mapping,
    ) -> Self {
        Self {
            strategy,
            message,
            name: None,
            actual,
        }
    }

    pub(crate) fn actual(&self) -> &Mapping {
        &self.actual
    }

    /// `<{...}>`, or `name (<{...}>)` for a named subject.
    pub(crate) fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{name} (<{}>)", self.actual),
            None => format!("<{}>", self.actual),
        }
    }

    pub(crate) fn fail(&self, report: FailureReport) {
        log::debug!("assertion on {} failed", self.label());
        let failure = AssertionFailure::new(report)
            .with_message(self.message.clone())
            .with_name(self.name.clone());
        self.strategy.fail(failure);
    }
}

/// How a containment check is described in its headline.
pub(crate) struct Relation {
    pub(crate) content: String,
    pub(crate) in_order: String,
}

impl Relation {
    pub(crate) fn equality(mode: Containment) -> Self {
        let (content, in_order) = match mode {
            Containment::Exact => ("contains exactly", "contains exactly these entries in order"),
            Containment::AtLeast => ("contains at least", "contains at least these entries in order"),
        };
        Self {
            content: content.into(),
            in_order: in_order.into(),
        }
    }

    pub(crate) fn corresponding(mode: Containment, correspondence: &Correspondence) -> Self {
        let amount = match mode {
            Containment::Exact => "exactly",
            Containment::AtLeast => "at least",
        };
        let tail = format!(
            "one entry that has a key that is equal to and a value that {} \
             the key and value of each entry of",
            correspondence.description()
        );
        Self {
            content: format!("contains {amount} {tail}"),
            in_order: format!("contains, in order, {amount} {tail}"),
        }
    }
}

/// Shared body of every `contains_exactly*` / `contains_at_least*` method.
///
/// Values in wrong-value entries are type-annotated only when
/// `annotate_values` is set; a custom correspondence compares values that
/// are expected to differ in type.
pub(crate) fn check_containment<'a>(
    ctx: &Context<'a>,
    expected: Mapping,
    correspondence: &Correspondence,
    mode: Containment,
    relation: Relation,
    annotate_values: bool,
) -> Ordered<'a> {
    if mode == Containment::Exact && expected.is_empty() {
        if ctx.actual().is_empty() {
            return Ordered::done();
        }
        ctx.fail(report::expected_empty(ctx.actual()));
        return Ordered::done();
    }

    let result = reconcile(ctx.actual(), &expected, correspondence, mode);
    if !result.is_success() {
        ctx.fail(report::containment_failure(
            &ctx.label(),
            &relation.content,
            ctx.actual(),
            &expected,
            &result,
            annotate_values,
        ));
        return Ordered::done();
    }
    Ordered::pending(ctx.clone(), expected, mode, relation.in_order)
}
