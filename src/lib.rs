//! # mapfacts
//!
//! **Fluent map assertions** for Rust tests, with failure messages that say
//! exactly what is wrong.
//!
//! A failed map assertion does not stop at "maps differ". The actual and
//! expected entries are reconciled into matching, missing, unexpected and
//! wrong-value partitions, and the failure report lists each kind of
//! difference in a fixed order.
//!
//! ## Key Features
//!
//! - **Exact and partial containment** - `contains_exactly` / `contains_at_least`,
//!   each with an optional trailing `.in_order()`
//! - **Custom value matching** - compare values through a [`Correspondence`]
//!   that may fail, with optional diff formatting
//! - **Resilient comparison** - a correspondence that errors or panics is
//!   recorded and reported, never aborts the check
//! - **Disambiguation** - keys or values that print the same but differ in
//!   type are annotated (`1 (i32)` vs `1 (i64)`)
//! - **Injectable failure handling** - panic by default, or capture failures
//!   with [`ExpectFailure`] to assert on the report itself
//!
//! ## Quick Start
//!
//! ```
//! use mapfacts::{assert_that, entries};
//! use std::collections::HashMap;
//!
//! # fn main() -> Result<(), mapfacts::UsageError> {
//! let months = HashMap::from([("jan", 1), ("feb", 2), ("march", 3)]);
//!
//! assert_that(&months).contains_key("jan");
//! assert_that(&months).contains_entry("feb", 2);
//! assert_that(&months).contains_exactly(entries!["march", 3, "jan", 1, "feb", 2])?;
//! assert_that(&months).contains_at_least(entries!["feb", 2])?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure Reports
//!
//! Assertions report to a [`FailureStrategy`]. With [`ExpectFailure`] the
//! report can be inspected instead of panicking:
//!
//! ```
//! use mapfacts::{ExpectFailure, entries, mapping};
//!
//! # fn main() -> Result<(), mapfacts::UsageError> {
//! let expect = ExpectFailure::new();
//! let actual = mapping! { "jan" => 1, "feb" => 2 };
//! expect.that(&actual).contains_exactly(entries!["jan", 1, "march", 3, "feb", 2])?;
//!
//! let failure = expect.failure().expect("assertion should fail");
//! assert_eq!(
//!     failure.message(),
//!     "Not true that <{jan=1, feb=2}> contains exactly <{jan=1, march=3, feb=2}>. \
//!      It is missing keys for the following entries: {march=3}"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`value`] - The dynamic [`Value`] used for keys and values
//! - [`mapping`] - Ordered maps and the [`MapLike`] contract
//! - [`correspondence`] - Pluggable value matching and failure traces
//! - [`reconcile`] - Partitioning expected against actual entries
//! - [`ambiguity`] - Type annotations for look-alike values
//! - [`report`] - Facts and failure reports
//! - [`failure`] - Failure strategies
//! - [`subject`] - The fluent assertion methods
//! - [`verb`] - Entry points: [`assert_that`] and [`AssertionBuilder`]
//! - [`error`] - Usage errors for malformed assertion calls

pub mod ambiguity;
pub mod correspondence;
pub mod error;
pub mod failure;
pub mod mapping;
pub mod reconcile;
pub mod report;
pub mod subject;
pub mod value;
pub mod verb;

pub use ambiguity::Annotations;
pub use correspondence::{CompareError, Correspondence, ExceptionTrace, Phase, RecordedFailure};
pub use error::{DuplicateKey, UsageError};
pub use failure::{AssertionFailure, ExpectFailure, FailureStrategy, PanicStrategy};
pub use mapping::{Entry, MapLike, Mapping};
pub use reconcile::{
    Containment, ReconciliationResult, ValueDifference, check_order, reconcile_at_least,
    reconcile_exact,
};
pub use report::{Fact, FailureReport};
pub use subject::{ComparingValues, MapSubject, Ordered};
pub use value::Value;
pub use verb::{AssertionBuilder, assert_that, assert_with_message};
