//! Orderings a [`Tree`][crate::Tree] can be built with.
//!
//! A comparator is anything implementing [`Comparator`]. Three are provided:
//!
//! 1. [`Natural`] - the element's own [`Ord`] implementation. This is what
//!    [`Tree::new`][crate::Tree::new] uses.
//! 2. Any `Fn(&T, &T) -> Ordering`, for caller-defined orders.
//! 3. [`DynamicOrder`] - for [`Value`] elements, decides the kind of the tree on first use.
//!
//! A comparator must be a strict total order over the values put in the tree. Values it calls
//! `Equal` are treated as the same element.

use std::cell::OnceCell;
use std::cmp::Ordering;

use crate::error::{Result, TreeError};
use crate::value::{Value, ValueKind};

/// A three-way comparison between two elements.
pub trait Comparator<T> {
    /// Orders `a` relative to `b`. Errors when the two can't be ordered at all.
    ///
    /// Trees pass the value being inserted or looked up as `a` and a stored value as `b`.
    fn compare(&self, a: &T, b: &T) -> Result<Ordering>;
}

/// Orders elements by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<T> Comparator<T> for Natural
where
    T: Ord,
{
    fn compare(&self, a: &T, b: &T) -> Result<Ordering> {
        Ok(a.cmp(b))
    }
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Result<Ordering> {
        Ok(self(a, b))
    }
}

/// Orders [`Value`]s by the kind of the first pair it sees.
///
/// The kind is decided once and kept for the life of the comparator, so every later
/// comparison is a single dispatch on that kind rather than a fresh inspection of both
/// operands' kinds.
///
/// ```
/// use std::cmp::Ordering;
/// use pooled_bst::{Comparator, DynamicOrder, Value, ValueKind};
///
/// let order = DynamicOrder::new();
/// assert_eq!(order.kind(), None);
///
/// assert_eq!(order.compare(&Value::from(1), &Value::from(2.5)), Ok(Ordering::Less));
/// assert_eq!(order.kind(), Some(ValueKind::Number));
///
/// assert!(order.compare(&Value::from(true), &Value::from(false)).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct DynamicOrder {
    kind: OnceCell<ValueKind>,
}

impl DynamicOrder {
    /// A comparator that hasn't settled on a kind yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The kind this comparator is fixed to, if it has compared anything yet.
    pub fn kind(&self) -> Option<ValueKind> {
        self.kind.get().copied()
    }
}

impl Comparator<Value> for DynamicOrder {
    fn compare(&self, a: &Value, b: &Value) -> Result<Ordering> {
        let expected = match self.kind.get() {
            Some(kind) => *kind,
            None => {
                // Nothing is frozen until a pair of matching kinds shows up. `b` is the stored
                // operand, so its kind is the one the tree already holds.
                if a.kind() != b.kind() {
                    return Err(TreeError::Incomparable {
                        expected: b.kind(),
                        found: a.kind(),
                    });
                }
                *self.kind.get_or_init(|| a.kind())
            }
        };

        for operand in [a, b] {
            if operand.kind() != expected {
                return Err(TreeError::Incomparable {
                    expected,
                    found: operand.kind(),
                });
            }
        }

        let ordering = match expected {
            ValueKind::Number => compare_numbers(a, b),
            ValueKind::Text => compare_with(a, b, |v| match v {
                Value::Text(s) => Some(s),
                _ => None,
            }),
            ValueKind::Bool => compare_with(a, b, |v| match v {
                Value::Bool(b) => Some(b),
                _ => None,
            }),
            ValueKind::Date => compare_with(a, b, |v| match v {
                Value::Date(d) => Some(d),
                _ => None,
            }),
        };

        Ok(ordering.expect("operand kinds checked above"))
    }
}

fn compare_with<'a, U, F>(a: &'a Value, b: &'a Value, project: F) -> Option<Ordering>
where
    U: Ord + 'a,
    F: Fn(&'a Value) -> Option<&'a U>,
{
    Some(project(a)?.cmp(project(b)?))
}

fn compare_numbers(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Int(x), Value::Float(y)) => Some(compare_int_float(*x, *y)),
        (Value::Float(x), Value::Int(y)) => Some(compare_int_float(*y, *x).reverse()),
        (Value::Float(x), Value::Float(y)) => Some(x.total_cmp(y)),
        _ => None,
    }
}

/// Orders an integer against a float without rounding the integer, agreeing with `total_cmp`
/// wherever the two meet (NaNs at the ends, `-0.0` below `0`).
fn compare_int_float(x: i64, y: f64) -> Ordering {
    // 2^63, the first float past `i64::MAX`.
    const I64_END: f64 = 9_223_372_036_854_775_808.0;

    let whole = y.trunc();
    if y.is_nan() {
        return (x as f64).total_cmp(&y);
    }
    if whole >= I64_END {
        return Ordering::Less;
    }
    if whole < -I64_END {
        return Ordering::Greater;
    }

    // `whole` is integral and in range, so the cast is exact.
    match x.cmp(&(whole as i64)) {
        // `x` equals a float exactly here, so converting it loses nothing.
        Ordering::Equal => (x as f64).total_cmp(&y),
        unequal => unequal,
    }
}
