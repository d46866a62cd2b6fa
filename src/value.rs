//! A dynamically typed element for trees whose element kind is only known at runtime.
//!
//! Pair it with [`DynamicOrder`][crate::compare::DynamicOrder], which fixes the kind of the
//! tree on its first comparison.
//!
//! # Examples
//!
//! ```
//! use pooled_bst::{DynamicOrder, Tree, TreeError, Value, ValueKind};
//!
//! let mut tree = Tree::with_comparator(DynamicOrder::new());
//! tree.insert(Value::from("pear")).unwrap();
//! tree.insert(Value::from("apple")).unwrap();
//!
//! // The tree is now a tree of text; numbers don't fit in it.
//! assert_eq!(
//!     tree.insert(Value::from(3)),
//!     Err(TreeError::Incomparable { expected: ValueKind::Text, found: ValueKind::Number })
//! );
//! assert_eq!(tree.len(), 2);
//! ```

use std::fmt;

use chrono::NaiveDateTime;

/// A single element of a runtime-typed tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An integral number. Orders against [`Value::Float`] numerically.
    Int(i64),
    /// A floating point number, ordered with [`f64::total_cmp`].
    Float(f64),
    /// Text, ordered lexicographically.
    Text(String),
    /// A boolean, `false < true`.
    Bool(bool),
    /// A date and time, ordered chronologically.
    Date(NaiveDateTime),
}

/// The ordering family a [`Value`] belongs to. Values only compare within one kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Int`] and [`Value::Float`].
    Number,
    /// [`Value::Text`].
    Text,
    /// [`Value::Bool`].
    Bool,
    /// [`Value::Date`].
    Date,
}

impl Value {
    /// The kind this value orders as.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) | Self::Float(_) => ValueKind::Number,
            Self::Text(_) => ValueKind::Text,
            Self::Bool(_) => ValueKind::Bool,
            Self::Date(_) => ValueKind::Date,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Number => "number",
            Self::Text => "text",
            Self::Bool => "boolean",
            Self::Date => "date",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{d}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Self::Date(d)
    }
}
