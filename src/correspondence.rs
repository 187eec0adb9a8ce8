//! Pluggable value matching.
//!
//! A [`Correspondence`] replaces plain equality when comparing an actual
//! value against an expected one. Both the comparison and the optional diff
//! formatter may fail; failures are captured as [`CompareError`] values and
//! collected into an [`ExceptionTrace`] instead of aborting the assertion.
//!
//! # Example
//!
//! ```
//! use mapfacts::{CompareError, Correspondence, Value};
//!
//! let parses_to = Correspondence::from_fn(
//!     |actual: &Value, expected: &Value| {
//!         let text = actual.as_str().ok_or_else(|| CompareError::type_mismatch("String", actual))?;
//!         let want = expected.as_i64().ok_or_else(|| CompareError::type_mismatch("i32", expected))?;
//!         Ok(text.parse::<i64>().is_ok_and(|n| n == want))
//!     },
//!     "parses to",
//! );
//!
//! assert_eq!(parses_to.compare(&Value::from("+123"), &Value::from(123)), Ok(true));
//! ```

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Why a comparison or diff formatting call could not produce an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareError {
    /// One of the inputs was null and the function does not accept nulls.
    NullValue(String),
    /// An input had a type the function cannot handle.
    TypeMismatch { expected: String, found: String },
    /// Any other failure reported by the function.
    Failed(String),
    /// The function panicked; holds the panic message.
    Panicked(String),
}

impl CompareError {
    #[must_use]
    pub fn null_value() -> Self {
        Self::NullValue("null values are not supported".into())
    }

    #[must_use]
    pub fn type_mismatch(expected: &str, found: &Value) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: format!("{found} ({})", found.type_name()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Short name of the failure kind, rendered after `threw`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NullValue(_) => "NullValue",
            Self::TypeMismatch { .. } => "TypeMismatch",
            Self::Failed(_) => "Failed",
            Self::Panicked(_) => "Panicked",
        }
    }

    fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_owned());
        Self::Panicked(message)
    }
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullValue(msg) | Self::Failed(msg) | Self::Panicked(msg) => f.write_str(msg),
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected a value of type {expected} but got {found}")
            }
        }
    }
}

impl std::error::Error for CompareError {}

/// Which correspondence function failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Compare,
    FormatDiff,
}

impl Phase {
    /// Function name as shown in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Compare => "compare",
            Self::FormatDiff => "formatDiff",
        }
    }

    /// What the engine was doing, as in "thrown while comparing values".
    #[must_use]
    pub const fn activity(self) -> &'static str {
        match self {
            Self::Compare => "comparing values",
            Self::FormatDiff => "formatting diffs",
        }
    }
}

/// One failed invocation, with the inputs it failed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedFailure {
    pub phase: Phase,
    pub actual: Value,
    pub expected: Value,
    pub error: CompareError,
}

impl fmt::Display for RecordedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}) threw {}: {}",
            self.phase.label(),
            self.actual,
            self.expected,
            self.error.kind(),
            self.error
        )
    }
}

/// Every failed correspondence invocation of one assertion, in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionTrace {
    failures: Vec<RecordedFailure>,
}

impl ExceptionTrace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, phase: Phase, actual: &Value, expected: &Value, error: CompareError) {
        log::trace!("{}({actual}, {expected}) failed: {error}", phase.label());
        self.failures.push(RecordedFailure {
            phase,
            actual: actual.clone(),
            expected: expected.clone(),
            error,
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn of(&self, phase: Phase) -> impl Iterator<Item = &RecordedFailure> {
        self.failures.iter().filter(move |f| f.phase == phase)
    }

    #[must_use]
    pub fn first(&self, phase: Phase) -> Option<&RecordedFailure> {
        self.of(phase).next()
    }

    #[must_use]
    pub fn count(&self, phase: Phase) -> usize {
        self.of(phase).count()
    }
}

type CompareFn = dyn Fn(&Value, &Value) -> Result<bool, CompareError> + Send + Sync;
type DiffFn = dyn Fn(&Value, &Value) -> Result<Option<String>, CompareError> + Send + Sync;

/// A binary predicate deciding whether an actual value corresponds to an
/// expected one, with an optional diff formatter.
///
/// Cheap to clone; the functions are shared.
#[derive(Clone)]
pub struct Correspondence {
    description: String,
    compare: Arc<CompareFn>,
    format_diff: Option<Arc<DiffFn>>,
}

impl Correspondence {
    /// Plain equality. Never fails and formats no diffs.
    #[must_use]
    pub fn equality() -> Self {
        Self::from_fn(|a: &Value, e: &Value| Ok(a == e), "is equal to")
    }

    /// Build a correspondence from a comparison function.
    ///
    /// `description` completes the phrase "a value that ...", for example
    /// `"parses to"` or `"equals (ignoring case)"`.
    pub fn from_fn<F>(compare: F, description: impl Into<String>) -> Self
    where
        F: Fn(&Value, &Value) -> Result<bool, CompareError> + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            compare: Arc::new(compare),
            format_diff: None,
        }
    }

    /// Numeric values within `tolerance` of each other.
    ///
    /// Accepts any mix of integer and float variants. Fails with
    /// [`CompareError::NullValue`] or [`CompareError::TypeMismatch`] on other
    /// inputs. Diffs are rendered as `actual - expected`.
    #[must_use]
    pub fn tolerance(tolerance: f64) -> Self {
        Self::from_fn(
            move |a: &Value, e: &Value| {
                let (x, y) = numeric_pair(a, e)?;
                Ok(x.is_finite() && y.is_finite() && (x - y).abs() <= tolerance)
            },
            format!("is a finite number within {tolerance} of"),
        )
        .formatting_diffs_using(|a: &Value, e: &Value| {
            if let (Some(x), Some(y)) = (a.as_i64(), e.as_i64()) {
                return Ok(Some((i128::from(x) - i128::from(y)).to_string()));
            }
            let (x, y) = numeric_pair(a, e)?;
            Ok(Some(format!("{:?}", x - y)))
        })
    }

    /// Attach a diff formatter, used to explain wrong-value entries.
    #[must_use]
    pub fn formatting_diffs_using<F>(mut self, format_diff: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Option<String>, CompareError> + Send + Sync + 'static,
    {
        self.format_diff = Some(Arc::new(format_diff));
        self
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Run the comparison. Panics inside the function are caught and
    /// returned as [`CompareError::Panicked`].
    ///
    /// # Errors
    ///
    /// Whatever error the comparison function reports.
    pub fn compare(&self, actual: &Value, expected: &Value) -> Result<bool, CompareError> {
        panic::catch_unwind(AssertUnwindSafe(|| (self.compare)(actual, expected)))
            .unwrap_or_else(|payload| Err(CompareError::from_panic(payload.as_ref())))
    }

    /// Run the diff formatter, if there is one.
    ///
    /// # Errors
    ///
    /// Whatever error the formatter reports, including a caught panic.
    pub fn format_diff(
        &self,
        actual: &Value,
        expected: &Value,
    ) -> Result<Option<String>, CompareError> {
        let Some(format_diff) = &self.format_diff else {
            return Ok(None);
        };
        panic::catch_unwind(AssertUnwindSafe(|| format_diff(actual, expected)))
            .unwrap_or_else(|payload| Err(CompareError::from_panic(payload.as_ref())))
    }

    /// Compare, recording a failure in `trace` and treating it as "does not
    /// correspond".
    pub(crate) fn safe_compare(
        &self,
        actual: &Value,
        expected: &Value,
        trace: &mut ExceptionTrace,
    ) -> bool {
        match self.compare(actual, expected) {
            Ok(matches) => matches,
            Err(err) => {
                trace.record(Phase::Compare, actual, expected, err);
                false
            }
        }
    }

    /// Format a diff, recording a failure in `trace` and suppressing the diff.
    pub(crate) fn safe_format_diff(
        &self,
        actual: &Value,
        expected: &Value,
        trace: &mut ExceptionTrace,
    ) -> Option<String> {
        match self.format_diff(actual, expected) {
            Ok(diff) => diff,
            Err(err) => {
                trace.record(Phase::FormatDiff, actual, expected, err);
                None
            }
        }
    }
}

impl Default for Correspondence {
    fn default() -> Self {
        Self::equality()
    }
}

impl fmt::Debug for Correspondence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Correspondence")
            .field("description", &self.description)
            .field("formats_diffs", &self.format_diff.is_some())
            .finish_non_exhaustive()
    }
}

fn numeric_pair(a: &Value, e: &Value) -> Result<(f64, f64), CompareError> {
    if a.is_null() || e.is_null() {
        return Err(CompareError::null_value());
    }
    let x = a
        .as_f64()
        .ok_or_else(|| CompareError::type_mismatch("number", a))?;
    let y = e
        .as_f64()
        .ok_or_else(|| CompareError::type_mismatch("number", e))?;
    Ok((x, y))
}
