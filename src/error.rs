//! Errors surfaced by fallible tree operations.

use thiserror::Error;

use crate::value::ValueKind;

/// Usage errors. Either of these leaves the tree exactly as it was before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// An absent value (`None`) was handed to `insert`.
    #[error("cannot insert an absent value")]
    InvalidValue,

    /// The comparator was asked to order two values it has no ordering for.
    #[error("cannot compare a {found} value in a tree ordered by {expected} values")]
    Incomparable {
        /// The kind the comparator was fixed to, or the stored value's kind on a first compare.
        expected: ValueKind,
        /// The kind that didn't match.
        found: ValueKind,
    },
}

/// Shorthand for results carrying a [`TreeError`].
pub type Result<T, E = TreeError> = std::result::Result<T, E>;
