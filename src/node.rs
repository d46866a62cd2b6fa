//! The storage unit of a [`Tree`][crate::Tree]. Nodes never escape the crate.

use std::cell::Cell;
use std::cmp::Ordering;

/// An owning link to a subtree. `None` is an empty subtree.
pub(crate) type Link<T> = Option<Box<Node<T>>>;

/// Height of an empty subtree.
pub(crate) const EMPTY_HEIGHT: isize = -1;

/// Which child of a node a search continues into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    /// The side a value belongs on given how it compares to a node's value. `Equal` has no side.
    pub(crate) fn of(ordering: Ordering) -> Option<Self> {
        match ordering {
            Ordering::Less => Some(Self::Left),
            Ordering::Equal => None,
            Ordering::Greater => Some(Self::Right),
        }
    }
}

pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,

    /// Cached height of the subtree rooted here. A leaf has height 0.
    height: Cell<isize>,
    /// Whether `height` can be trusted. Cleared by structural changes directly below this node
    /// and only this node - ancestors are not touched.
    height_valid: Cell<bool>,
}

impl<T> Node<T> {
    /// A leaf holding `value`.
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            left: None,
            right: None,
            height: Cell::new(0),
            height_valid: Cell::new(true),
        }
    }

    pub(crate) fn child(&self, side: Side) -> Option<&Self> {
        match side {
            Side::Left => self.left.as_deref(),
            Side::Right => self.right.as_deref(),
        }
    }

    pub(crate) fn child_mut(&mut self, side: Side) -> Option<&mut Self> {
        self.link_mut(side).as_deref_mut()
    }

    pub(crate) fn link_mut(&mut self, side: Side) -> &mut Link<T> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub(crate) fn invalidate_height(&self) {
        self.height_valid.set(false);
    }

    /// The height of this subtree, recomputing any stale caches below it first.
    ///
    /// Only nodes whose cache is invalid are visited; a valid cache is returned as is even if
    /// something further down has changed since it was computed.
    pub(crate) fn height(&self) -> isize {
        if self.height_valid.get() {
            return self.height.get();
        }

        // Post-order walk over the stale part of the subtree: children are settled before the
        // `true` entry for their parent is popped.
        let mut stack = vec![(self, false)];
        while let Some((node, children_settled)) = stack.pop() {
            if children_settled {
                let height = 1 + cached_height(&node.left).max(cached_height(&node.right));
                node.height.set(height);
                node.height_valid.set(true);
                continue;
            }

            stack.push((node, true));
            for child in [node.left.as_deref(), node.right.as_deref()]
                .into_iter()
                .flatten()
            {
                if !child.height_valid.get() {
                    stack.push((child, false));
                }
            }
        }

        self.height.get()
    }
}

/// The cached height of a link without refreshing it.
fn cached_height<T>(link: &Link<T>) -> isize {
    link.as_deref().map_or(EMPTY_HEIGHT, |n| n.height.get())
}
