//! Ordered, unique-keyed collections of entries.
//!
//! [`Mapping`] is the snapshot every assertion works on: it remembers
//! insertion order (needed by `in_order()` checks and for deterministic
//! reports) and never holds two entries with equal keys. [`MapLike`] is the
//! contract the value under test has to satisfy; it is implemented for the
//! standard map types only. A list of pairs may repeat a key, so it has to
//! go through [`Mapping::from_pairs`] first.

use crate::error::{DuplicateKey, UsageError};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;

/// A single key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub key: Value,
    pub value: Value,
}

impl Entry {
    pub fn new(key: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// An insertion-ordered map from [`Value`] to [`Value`].
///
/// Equality ignores order, the same way two `HashMap`s compare. Use
/// [`check_order`](crate::reconcile::check_order) when order matters.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<Entry>,
    index: HashMap<Value, usize>,
}

impl Mapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the previous value for the key.
    ///
    /// Re-inserting an existing key replaces its value but keeps its
    /// original position.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].value, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(Entry { key, value });
        None
    }

    /// Build a mapping from a sequence of pairs, rejecting repeated keys.
    ///
    /// Unlike collecting, which keeps the last value of a repeated key,
    /// this refuses to drop an entry.
    ///
    /// # Errors
    ///
    /// [`UsageError::DuplicateKeys`] naming every repeated key with its
    /// count, in the order the keys first appear.
    ///
    /// # Example
    ///
    /// ```
    /// use mapfacts::Mapping;
    ///
    /// let m = Mapping::from_pairs([("jan", 1), ("feb", 2)])?;
    /// assert_eq!(m.to_string(), "{jan=1, feb=2}");
    /// assert!(Mapping::from_pairs([("jan", 1), ("jan", 2)]).is_err());
    /// # Ok::<(), mapfacts::UsageError>(())
    /// ```
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, UsageError>
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        unique_entries(
            pairs.into_iter().map(|(k, v)| (k.into(), v.into())),
            "from_pairs",
        )
    }

    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.index.get(key).map(|&pos| &self.entries[pos].value)
    }

    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.index.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|e| &e.key)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|e| &e.value)
    }

    /// Render the keys as `[k1, k2]`.
    #[must_use]
    pub fn keys_display(&self) -> String {
        bracketed(self.keys())
    }

    /// Render the entries as `[k1=v1, k2=v2]`.
    #[must_use]
    pub fn entries_display(&self) -> String {
        bracketed(self.iter())
    }
}

/// Collect pairs into a mapping, failing if any key repeats. `method`
/// names the caller in the error message.
pub(crate) fn unique_entries(
    pairs: impl IntoIterator<Item = (Value, Value)>,
    method: &'static str,
) -> Result<Mapping, UsageError> {
    let mut counts: Vec<DuplicateKey> = Vec::new();
    let mut seen: HashMap<Value, usize> = HashMap::new();
    let mut mapping = Mapping::new();
    for (key, value) in pairs {
        match seen.get(&key) {
            Some(&i) => counts[i].count += 1,
            None => {
                seen.insert(key.clone(), counts.len());
                counts.push(DuplicateKey {
                    key: key.clone(),
                    count: 1,
                });
            }
        }
        mapping.insert(key, value);
    }

    let duplicates: Vec<DuplicateKey> = counts.into_iter().filter(|d| d.count > 1).collect();
    if duplicates.is_empty() {
        Ok(mapping)
    } else {
        Err(UsageError::DuplicateKeys { method, duplicates })
    }
}

pub(crate) fn bracketed<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    let parts: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|e| other.get(&e.key).is_some_and(|v| *v == e.value))
    }
}

impl Eq for Mapping {}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{entry}")?;
        }
        f.write_str("}")
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::new();
        for (k, v) in iter {
            m.insert(k, v);
        }
        m
    }
}

impl FromIterator<Entry> for Mapping {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        iter.into_iter().map(|e| (e.key, e.value)).collect()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Build a [`Mapping`] from `key => value` pairs.
///
/// # Example
///
/// ```
/// use mapfacts::mapping;
///
/// let m = mapping! { "jan" => 1, "feb" => 2 };
/// assert_eq!(m.to_string(), "{jan=1, feb=2}");
/// ```
#[macro_export]
macro_rules! mapping {
    () => {
        $crate::Mapping::new()
    };
    ($($k:expr => $v:expr),+ $(,)?) => {{
        let mut m = $crate::Mapping::new();
        $( m.insert($k, $v); )+
        m
    }};
}

/// Anything that can be asserted on as a map.
///
/// `eq_mapping` is the type's own notion of equality. The default is
/// structural, but implementations may define something else and
/// [`is_equal_to`](crate::MapSubject::is_equal_to) will honour it, even when
/// it is not symmetric.
pub trait MapLike {
    /// Snapshot the entries in iteration order.
    fn to_mapping(&self) -> Mapping;

    fn eq_mapping(&self, other: &Mapping) -> bool {
        self.to_mapping() == *other
    }
}

impl<T: MapLike + ?Sized> MapLike for &T {
    fn to_mapping(&self) -> Mapping {
        (**self).to_mapping()
    }

    fn eq_mapping(&self, other: &Mapping) -> bool {
        (**self).eq_mapping(other)
    }
}

impl MapLike for Mapping {
    fn to_mapping(&self) -> Mapping {
        self.clone()
    }
}

impl<K, V, S> MapLike for HashMap<K, V, S>
where
    K: Clone + Into<Value>,
    V: Clone + Into<Value>,
    S: BuildHasher,
{
    fn to_mapping(&self) -> Mapping {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<K, V> MapLike for BTreeMap<K, V>
where
    K: Clone + Into<Value>,
    V: Clone + Into<Value>,
{
    fn to_mapping(&self) -> Mapping {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}
