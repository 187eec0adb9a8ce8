//! Dynamic domain values used as map keys and values.
//!
//! Assertions compare heterogeneous data (an `i32` key next to an `i64` key,
//! a `String` value next to a null), so keys and values are carried as
//! [`Value`]. Equality is identity-preserving across variants: `Int(1)` and
//! `Long(1)` are different values even though both display as `1`. That
//! distinction is what the ambiguity resolver reports on.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single key or value under test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Value {
    /// The absent value. Valid both as a key and as a value.
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    /// Unsigned 64-bit integers, including `usize`, kept apart from `Long`
    /// so values above `i64::MAX` stay distinct.
    ULong(u64),
    Float(OrderedFloat<f64>),
    Char(char),
    Str(String),
}

impl Value {
    /// The concrete type tag shown next to values whose display strings collide.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null type",
            Self::Bool(_) => "bool",
            Self::Int(_) => "i32",
            Self::Long(_) => "i64",
            Self::ULong(_) => "u64",
            Self::Float(_) => "f64",
            Self::Char(_) => "char",
            Self::Str(_) => "String",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Widen any numeric variant to `f64`.
    ///
    /// Returns `None` for non-numeric values, including `Null`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(f64::from(*i)),
            Self::Long(l) => Some(*l as f64),
            Self::ULong(u) => Some(*u as f64),
            Self::Float(f) => Some(f.into_inner()),
            _ => None,
        }
    }

    /// Widen an integral variant to `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(i64::from(*i)),
            Self::Long(l) => Some(*l),
            Self::ULong(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Long(l) => write!(f, "{l}"),
            Self::ULong(u) => write!(f, "{u}"),
            // Debug keeps the trailing `.0` on whole floats.
            Self::Float(x) => write!(f, "{:?}", x.into_inner()),
            Self::Char(c) => write!(f, "{c}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

macro_rules! impl_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    u8 => Int,
    u16 => Int,
    i64 => Long,
    u32 => Long,
    u64 => ULong,
    f64 => Float,
    char => Char,
    String => Str,
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(OrderedFloat(f64::from(v)))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        // usize is at most 64 bits on every supported target.
        Self::ULong(v as u64)
    }
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Self::Long(v as i64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Build the flat `key, value, key, value, ...` argument list accepted by
/// [`MapSubject::contains_exactly`](crate::MapSubject::contains_exactly) and
/// friends.
///
/// Each item is converted with [`Value::from`], so keys and values of
/// different types can be mixed freely.
///
/// # Example
///
/// ```
/// use mapfacts::{entries, Value};
///
/// let args = entries!["jan", 1, "feb", 2_i64, "mar", Value::Null];
/// assert_eq!(args.len(), 6);
/// assert_eq!(args[3], Value::Long(2));
/// ```
#[macro_export]
macro_rules! entries {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($item:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($item)),+]
    };
}
