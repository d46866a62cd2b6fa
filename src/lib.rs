//! This crate exposes an unbalanced Binary Search Tree (BST) that recycles its node allocations.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a value
//! and will sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for values in the tree takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). The [`Tree`] here makes no attempt to limit its
//! height, so inserting sorted values gives it the shape (and speed) of a linked list. None of
//! its operations recurse, so that shape is slow but never overflows the stack.
//!
//! ## Ordering
//!
//! What "less" and "greater" mean is up to the caller: a tree is built with a [`Comparator`],
//! which is the element's [`Ord`] by default, any `Fn(&T, &T) -> Ordering`, or
//! [`DynamicOrder`] for runtime-typed [`Value`]s. Values the comparator calls equal are the same
//! element, so inserting one twice stores it once.
//!
//! ## Node recycling
//!
//! Removing a value retires its node to a [`NodePool`]; later inserts take nodes from the pool
//! before asking the allocator. Pools can be shared between trees of the same element type. See
//! the [`pool`] module.
//!
//! ## Threads
//!
//! Neither trees nor pools are thread safe. Sharing one across threads needs a single lock
//! around the tree and every tree drawing on the same pool.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod compare;
pub mod error;
mod node;
pub mod pool;
pub mod tree;
pub mod value;

#[cfg(test)]
pub(crate) mod test;

pub use compare::{Comparator, DynamicOrder, Natural};
pub use error::{Result, TreeError};
pub use pool::{NodePool, SharedPool, DEFAULT_POOL_CAPACITY};
pub use tree::{Iter, Tree, TreeBuilder};
pub use value::{Value, ValueKind};
