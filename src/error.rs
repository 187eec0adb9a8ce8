//! Usage errors: malformed assertion calls.
//!
//! These are mistakes in the test code itself (an odd number of flat
//! arguments, the same key passed twice, a negative size) and are returned
//! as `Err` before any comparison runs. They are never routed through a
//! [`FailureStrategy`](crate::FailureStrategy), so they cannot be mistaken
//! for an assertion mismatch.

use crate::value::Value;
use std::fmt;

/// A key that appeared more than once in a flat argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub key: Value,
    pub count: usize,
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.key, self.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// The flat `key, value, ...` list had an odd length.
    OddArgumentCount(usize),
    /// Keys repeated in a flat argument list, in encounter order.
    DuplicateKeys {
        method: &'static str,
        duplicates: Vec<DuplicateKey>,
    },
    /// `has_size` was called with a negative size.
    NegativeSize(i64),
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OddArgumentCount(n) => write!(
                f,
                "There must be an equal number of key/value pairs \
                 (i.e., the number of key/value parameters ({n}) must be even)."
            ),
            Self::DuplicateKeys { method, duplicates } => {
                let listed: Vec<String> = duplicates.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "Duplicate keys ([{}]) cannot be passed to {method}().",
                    listed.join(", ")
                )
            }
            Self::NegativeSize(n) => write!(f, "expected size ({n}) must be >= 0"),
        }
    }
}

impl std::error::Error for UsageError {}
