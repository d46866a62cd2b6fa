//! Recycling of node allocations.
//!
//! Removing a value from a [`Tree`][crate::Tree] frees a node; inserting one needs a node. A
//! [`NodePool`] sits between the two and keeps the heap allocations of retired nodes so that
//! later inserts can reuse them instead of going back to the allocator.
//!
//! A pool is an ordinary value owned by whoever creates it. To share one between several trees,
//! create it with [`NodePool::shared`] and hand the same [`SharedPool`] to each tree.
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//! use pooled_bst::{NodePool, Tree};
//!
//! let pool = NodePool::shared(16);
//!
//! let mut first = Tree::with_pool(Rc::clone(&pool));
//! first.insert_batch([3, 1, 2]).unwrap();
//! first.clear();
//! assert_eq!(pool.borrow().len(), 3);
//!
//! // The second tree builds itself out of the first tree's old nodes.
//! let mut second = Tree::with_pool(Rc::clone(&pool));
//! second.insert_batch([10, 20]).unwrap();
//! assert_eq!(pool.borrow().len(), 1);
//!
//! // Give the memory back.
//! pool.borrow_mut().reset();
//! assert!(pool.borrow().is_empty());
//! ```
//!
//! Trees only ever borrow a shared pool for the length of a single call. If the pool is already
//! borrowed when a tree needs it (say a caller is holding `pool.borrow()` across an insert), the
//! tree skips recycling for that call: new nodes come straight from the allocator and retired
//! ones are dropped.

use std::cell::RefCell;
use std::fmt;
use std::mem::MaybeUninit;
use std::ptr;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::node::Node;

/// How many retired nodes a pool keeps unless told otherwise.
pub const DEFAULT_POOL_CAPACITY: usize = 100;

/// A pool handle that several trees can hold at once.
pub type SharedPool<T> = Rc<RefCell<NodePool<T>>>;

/// The allocation of a retired node. Its contents are dead; only the memory is kept.
type Shell<T> = Box<MaybeUninit<Node<T>>>;

/// A bounded free-list of node allocations.
pub struct NodePool<T> {
    shells: Vec<Shell<T>>,
    capacity: usize,
}

impl<T> Default for NodePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for NodePool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodePool")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<T> NodePool<T> {
    /// A pool keeping up to [`DEFAULT_POOL_CAPACITY`] nodes.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_CAPACITY)
    }

    /// A pool keeping up to `capacity` nodes. A capacity of 0 turns recycling off.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            shells: Vec::new(),
            capacity,
        }
    }

    /// A pool of the given capacity, ready to be shared between trees.
    pub fn shared(capacity: usize) -> SharedPool<T> {
        Rc::new(RefCell::new(Self::with_capacity(capacity)))
    }

    /// How many retired nodes are waiting to be reused.
    pub fn len(&self) -> usize {
        self.shells.len()
    }

    /// Whether there are no retired nodes waiting.
    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }

    /// The most retired nodes this pool will hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Frees every pooled allocation.
    pub fn reset(&mut self) {
        debug!(released = self.shells.len(), "resetting node pool");
        self.shells = Vec::new();
    }

    /// A leaf node holding `value`, built in a recycled allocation when one is available.
    pub(crate) fn acquire(&mut self, value: T) -> Box<Node<T>> {
        let node = Node::new(value);
        match self.shells.pop() {
            Some(shell) => {
                trace!(pooled = self.shells.len(), "reusing pooled node");
                let raw = Box::into_raw(shell).cast::<Node<T>>();
                // SAFETY: `raw` came out of a `Box<MaybeUninit<Node<T>>>`, which has the same
                // layout as `Box<Node<T>>`. Its previous contents were dropped in `release` so
                // writing over them leaks nothing, and after the write it holds a valid node,
                // making it fine to own as a `Box<Node<T>>` again.
                unsafe {
                    raw.write(node);
                    Box::from_raw(raw)
                }
            }
            None => {
                trace!("allocating node");
                Box::new(node)
            }
        }
    }

    /// Takes back a node that has been unlinked from its tree. The node's value is dropped
    /// right away; its allocation is kept if there is room.
    pub(crate) fn release(&mut self, node: Box<Node<T>>) {
        debug_assert!(node.is_leaf(), "only detached nodes are released");

        if self.shells.len() >= self.capacity {
            trace!(capacity = self.capacity, "node pool full, dropping node");
            return;
        }

        let raw = Box::into_raw(node);
        // SAFETY: `raw` is a valid, uniquely owned node straight out of a `Box`. Its contents are
        // dropped exactly once here and the memory is only ever treated as uninitialised
        // afterwards (a `MaybeUninit` never drops what it holds). The cast keeps size and
        // alignment since `MaybeUninit<Node<T>>` is layout-identical to `Node<T>`.
        let shell = unsafe {
            ptr::drop_in_place(raw);
            Box::from_raw(raw.cast::<MaybeUninit<Node<T>>>())
        };
        self.shells.push(shell);
    }
}

/// [`NodePool::acquire`] through a shared handle, allocating fresh if the pool is borrowed.
pub(crate) fn acquire_from<T>(pool: &SharedPool<T>, value: T) -> Box<Node<T>> {
    match pool.try_borrow_mut() {
        Ok(mut pool) => pool.acquire(value),
        Err(_) => {
            debug!("node pool busy, allocating node");
            Box::new(Node::new(value))
        }
    }
}

/// [`NodePool::release`] through a shared handle, dropping the node if the pool is borrowed.
pub(crate) fn release_to<T>(pool: &SharedPool<T>, node: Box<Node<T>>) {
    match pool.try_borrow_mut() {
        Ok(mut pool) => pool.release(node),
        Err(_) => debug!("node pool busy, dropping node"),
    }
}
