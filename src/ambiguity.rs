//! Disambiguation of values that display identically.
//!
//! An `i32` key `1` and an `i64` key `1` are different keys that both render
//! as `1`. When such values end up in the same report the reader cannot tell
//! them apart, so each one gets its concrete type appended: `1 (i32)`,
//! `1 (i64)`. Only the values that will actually be rendered are scanned.

use crate::value::Value;
use std::collections::{HashMap, HashSet};

/// The set of values whose display string collides with another value of
/// different identity within one scanned universe.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    tagged: HashSet<Value>,
}

impl Annotations {
    /// Annotations that tag nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Group `universe` by display string and tag every member of a group
    /// holding two or more distinct values.
    pub fn scan<'a>(universe: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut groups: HashMap<String, Vec<&Value>> = HashMap::new();
        for value in universe {
            let group = groups.entry(value.to_string()).or_default();
            if !group.contains(&value) {
                group.push(value);
            }
        }

        let tagged = groups
            .into_values()
            .filter(|group| group.len() > 1)
            .flatten()
            .cloned()
            .collect();
        Self { tagged }
    }

    #[must_use]
    pub fn is_ambiguous(&self, value: &Value) -> bool {
        self.tagged.contains(value)
    }

    /// Display `value`, with its type appended when it is ambiguous.
    #[must_use]
    pub fn render(&self, value: &Value) -> String {
        if self.is_ambiguous(value) {
            with_type(value)
        } else {
            value.to_string()
        }
    }
}

/// `value (type)`.
#[must_use]
pub fn with_type(value: &Value) -> String {
    format!("{value} ({})", value.type_name())
}

/// Candidates that display like `target` without being equal to it, in
/// candidate order.
pub fn colliding<'a>(
    candidates: impl IntoIterator<Item = &'a Value>,
    target: &Value,
) -> Vec<&'a Value> {
    let shown = target.to_string();
    candidates
        .into_iter()
        .filter(|c| *c != target && c.to_string() == shown)
        .collect()
}

/// Render a list of values with type information.
///
/// When every value has the same type the type is written once after the
/// list (`[1, 2] (i64)`); otherwise each element carries its own
/// (`[1 (i64), 1 (String)]`).
#[must_use]
pub fn list_with_types(values: &[&Value]) -> String {
    let types: HashSet<&str> = values.iter().map(|v| v.type_name()).collect();
    if let (1, Some(first)) = (types.len(), values.first()) {
        let plain: Vec<String> = values.iter().map(ToString::to_string).collect();
        format!("[{}] ({})", plain.join(", "), first.type_name())
    } else {
        let typed: Vec<String> = values.iter().map(|v| with_type(v)).collect();
        format!("[{}]", typed.join(", "))
    }
}
