//! An unbalanced BST whose nodes come from, and go back to, a [`NodePool`].
//!
//! Every operation walks the tree with a loop or an explicit stack rather than recursion, so a
//! tree that degenerates into a list (e.g. by inserting already sorted values) costs time but
//! never call stack.
//!
//! # Examples
//!
//! ```
//! use pooled_bst::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.search(&1), None);
//!
//! assert_eq!(tree.insert(1), Ok(true));
//! assert_eq!(tree.search(&1), Some(&1));
//!
//! // Inserting an equal value again does nothing.
//! assert_eq!(tree.insert(1), Ok(false));
//! assert_eq!(tree.len(), 1);
//!
//! // Removing reports whether anything was there.
//! assert!(tree.remove(&1));
//! assert!(!tree.remove(&1));
//! assert!(tree.is_empty());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use tracing::{debug, instrument, warn};

use crate::compare::{Comparator, Natural};
use crate::error::{Result, TreeError};
use crate::node::{Link, Node, Side, EMPTY_HEIGHT};
use crate::pool::{acquire_from, release_to, NodePool, SharedPool, DEFAULT_POOL_CAPACITY};

/// A Binary Search Tree of distinct values ordered by a [`Comparator`].
///
/// The tree does not rebalance. Its height depends on insertion order and can be as large as
/// its length.
pub struct Tree<T, C = Natural> {
    root: Link<T>,
    len: usize,
    comparator: C,
    pool: SharedPool<T>,
}

impl<T> Default for Tree<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Drop for Tree<T, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, C> fmt::Debug for Tree<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("height", &self.height())
            .field("values", &self.in_order())
            .finish()
    }
}

impl<T> Tree<T>
where
    T: Ord,
{
    /// Generates a new, empty `Tree` ordered by `T`'s [`Ord`] implementation, with a pool of
    /// its own.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Generates a new, empty `Tree` ordered by `T`'s [`Ord`] implementation that recycles
    /// nodes through `pool`.
    pub fn with_pool(pool: SharedPool<T>) -> Self {
        Self::with_comparator_and_pool(Natural, pool)
    }

    /// Starts configuring a tree. See [`TreeBuilder`].
    pub fn builder() -> TreeBuilder<T> {
        TreeBuilder::new()
    }
}

impl<T, C> Tree<T, C> {
    /// How many values are in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The height of the tree: `-1` when empty, `0` for a single value.
    ///
    /// Heights are cached per node. An insert or removal only marks the cache of the node
    /// directly above the change as stale, so after a change two or more levels below an
    /// ancestor whose height was already read, this can report that ancestor's old height
    /// until a later change directly below it.
    ///
    /// # Examples
    ///
    /// ```
    /// use pooled_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.height(), -1);
    ///
    /// tree.insert_batch([50, 25, 75, 10, 30, 60, 80]).unwrap();
    /// assert_eq!(tree.height(), 2);
    /// ```
    pub fn height(&self) -> isize {
        self.root.as_deref().map_or(EMPTY_HEIGHT, Node::height)
    }

    /// The value at the root of the tree, if there is one.
    pub fn root_value(&self) -> Option<&T> {
        self.root.as_deref().map(|root| &root.value)
    }

    /// The smallest value in the tree.
    pub fn min(&self) -> Option<&T> {
        self.outermost(Side::Left)
    }

    /// The largest value in the tree.
    pub fn max(&self) -> Option<&T> {
        self.outermost(Side::Right)
    }

    /// Iterates over the values in ascending order. Each call starts a fresh traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use pooled_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert_batch([2, 3, 1]).unwrap();
    ///
    /// assert_eq!(tree.iter().collect::<Vec<_>>(), [&1, &2, &3]);
    ///
    /// // Traversing doesn't consume anything.
    /// assert_eq!(tree.iter().len(), 3);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// The values in ascending order.
    pub fn in_order(&self) -> Vec<&T> {
        self.iter().collect()
    }

    /// Clones the values out in ascending order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// The comparator ordering this tree.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// The pool this tree takes nodes from and returns them to.
    pub fn pool(&self) -> &SharedPool<T> {
        &self.pool
    }

    /// Removes every value, returning the nodes to the pool.
    pub fn clear(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };

        // A pool someone else is borrowing is skipped; the nodes are simply dropped.
        let mut pool = self.pool.try_borrow_mut().ok();
        let mut stack = vec![root];
        let mut retired = 0usize;
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
            if let Some(pool) = pool.as_mut() {
                pool.release(node);
            }
            retired += 1;
        }

        debug!(retired, pooled = pool.map(|pool| pool.len()), "cleared tree");
        self.len = 0;
    }

    fn outermost(&self, side: Side) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(next) = node.child(side) {
            node = next;
        }
        Some(&node.value)
    }
}

impl<T, C> Tree<T, C>
where
    C: Comparator<T>,
{
    /// Generates a new, empty `Tree` ordered by `comparator`, with a pool of its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use pooled_bst::Tree;
    ///
    /// let mut tree = Tree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// tree.insert_batch([1, 3, 2]).unwrap();
    ///
    /// assert_eq!(tree.to_vec(), [3, 2, 1]);
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_and_pool(comparator, NodePool::shared(DEFAULT_POOL_CAPACITY))
    }

    /// Generates a new, empty `Tree` ordered by `comparator` that recycles nodes through `pool`.
    pub fn with_comparator_and_pool(comparator: C, pool: SharedPool<T>) -> Self {
        Self {
            root: None,
            len: 0,
            comparator,
            pool,
        }
    }

    /// Inserts `value` into the tree. Returns `Ok(true)` if it was added and `Ok(false)` if an
    /// equal value was already there, in which case the tree is unchanged.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidValue`] when `value` is `None`, and whatever the comparator reports
    /// when it can't order `value` against the tree's values. Either way nothing is inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use pooled_bst::{Tree, TreeError};
    ///
    /// let mut tree = Tree::new();
    ///
    /// assert_eq!(tree.insert(10), Ok(true));
    /// assert_eq!(tree.insert(10), Ok(false));
    /// assert_eq!(tree.insert(None), Err(TreeError::InvalidValue));
    /// assert_eq!(tree.len(), 1);
    /// ```
    #[instrument(level = "trace", skip_all, fields(len = self.len))]
    pub fn insert(&mut self, value: impl Into<Option<T>>) -> Result<bool> {
        let value = value.into().ok_or(TreeError::InvalidValue)?;
        let Self {
            root,
            len,
            comparator,
            pool,
        } = self;

        let mut node: &mut Node<T> = match root {
            Some(node) => node,
            None => {
                *root = Some(acquire_from(pool, value));
                *len += 1;
                return Ok(true);
            }
        };

        loop {
            let ordering = comparator.compare(&value, &node.value)?;
            let Some(side) = Side::of(ordering) else {
                return Ok(false);
            };

            if node.child(side).is_none() {
                node.invalidate_height();
                *node.link_mut(side) = Some(acquire_from(pool, value));
                *len += 1;
                return Ok(true);
            }
            node = node.child_mut(side).expect("occupied child checked above");
        }
    }

    /// Inserts each value in order, as if by [`Tree::insert`]. Returns how many were added.
    ///
    /// # Errors
    ///
    /// Stops at the first value `insert` rejects and returns its error. Values before it stay
    /// inserted.
    pub fn insert_batch<I>(&mut self, values: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Into<Option<T>>,
    {
        let mut added = 0;
        for value in values {
            if self.insert(value)? {
                added += 1;
            }
        }

        debug!(added, len = self.len, "inserted batch");
        Ok(added)
    }

    /// Finds the stored value equal to `value`. `None` (the argument) and empty trees simply find
    /// nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use pooled_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1).unwrap();
    ///
    /// assert_eq!(tree.search(&1), Some(&1));
    /// assert_eq!(tree.search(&42), None);
    /// assert_eq!(tree.search(None), None);
    /// ```
    pub fn search<'a>(&self, value: impl Into<Option<&'a T>>) -> Option<&T>
    where
        T: 'a,
    {
        let value = value.into()?;
        let mut node = self.root.as_deref()?;
        loop {
            match Side::of(compare_softly(&self.comparator, value, &node.value)?) {
                None => return Some(&node.value),
                Some(side) => node = node.child(side)?,
            }
        }
    }

    /// Whether a value equal to `value` is in the tree.
    pub fn contains<'a>(&self, value: impl Into<Option<&'a T>>) -> bool
    where
        T: 'a,
    {
        self.search(value).is_some()
    }

    /// Removes the value equal to `value` from the tree, returning whether there was one.
    ///
    /// When the removed value's node has two children, the node stays where it is and takes
    /// over its in-order successor's value; the successor's node is the one unlinked.
    ///
    /// # Examples
    ///
    /// ```
    /// use pooled_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert_batch([50, 25, 75, 10, 30]).unwrap();
    ///
    /// assert!(tree.remove(&25));
    /// assert!(!tree.contains(&25));
    /// assert_eq!(tree.to_vec(), [10, 30, 50, 75]);
    ///
    /// assert!(!tree.remove(&25));
    /// assert!(!tree.remove(None));
    /// ```
    #[instrument(level = "trace", skip_all, fields(len = self.len))]
    pub fn remove<'a>(&mut self, value: impl Into<Option<&'a T>>) -> bool
    where
        T: 'a,
    {
        let Some(value) = value.into() else {
            return false;
        };
        let Self {
            root,
            len,
            comparator,
            pool,
        } = self;

        let Some(root_node) = root.as_deref() else {
            return false;
        };
        let Some(ordering) = compare_softly(comparator, value, &root_node.value) else {
            return false;
        };
        let Some(mut side) = Side::of(ordering) else {
            unlink(root, pool);
            *len -= 1;
            return true;
        };

        let mut parent: &mut Node<T> = root.as_deref_mut().expect("non-empty tree checked above");
        loop {
            let Some(child) = parent.child(side) else {
                return false;
            };
            let Some(ordering) = compare_softly(comparator, value, &child.value) else {
                return false;
            };

            match Side::of(ordering) {
                None => {
                    parent.invalidate_height();
                    unlink(parent.link_mut(side), pool);
                    *len -= 1;
                    return true;
                }
                Some(next) => {
                    parent = parent.child_mut(side).expect("child checked above");
                    side = next;
                }
            }
        }
    }

    /// Checks that every value sits strictly between the bounds its ancestors impose. Regular
    /// operations maintain this; it exists as a self-check.
    ///
    /// A pair of values the comparator can't order counts as a violation.
    pub fn is_valid_bst(&self) -> bool {
        let mut stack: Vec<(&Node<T>, Option<&T>, Option<&T>)> = Vec::new();
        stack.extend(self.root.as_deref().map(|root| (root, None, None)));

        while let Some((node, lower, upper)) = stack.pop() {
            let above_lower = lower.map_or(true, |lower| {
                compare_softly(&self.comparator, lower, &node.value) == Some(Ordering::Less)
            });
            let below_upper = upper.map_or(true, |upper| {
                compare_softly(&self.comparator, &node.value, upper) == Some(Ordering::Less)
            });
            if !(above_lower && below_upper) {
                return false;
            }

            if let Some(left) = node.left.as_deref() {
                stack.push((left, lower, Some(&node.value)));
            }
            if let Some(right) = node.right.as_deref() {
                stack.push((right, Some(&node.value), upper));
            }
        }

        true
    }
}

/// Compares for operations that report "not found" rather than fail.
fn compare_softly<T, C>(comparator: &C, a: &T, b: &T) -> Option<Ordering>
where
    C: Comparator<T>,
{
    comparator
        .compare(a, b)
        .map_err(|err| warn!(%err, "comparator rejected lookup, treating as not found"))
        .ok()
}

/// Removes the node `link` points at, keeping the subtree below it ordered, and returns the freed
/// node to `pool`.
fn unlink<T>(link: &mut Link<T>, pool: &SharedPool<T>) {
    let Some(mut node) = link.take() else {
        return;
    };

    match (node.left.take(), node.right.take()) {
        (None, None) => release_to(pool, node),
        (Some(child), None) | (None, Some(child)) => {
            *link = Some(child);
            release_to(pool, node);
        }
        (Some(left), Some(right)) => {
            node.left = Some(left);
            node.right = Some(right);

            let mut successor =
                detach_successor(&mut node).expect("a node with a right child has a successor");
            std::mem::swap(&mut node.value, &mut successor.value);
            // `successor` now carries the removed value, which the pool drops.
            release_to(pool, successor);
            *link = Some(node);
        }
    }
}

/// Unlinks and returns the leftmost node of `node`'s right subtree. That node has no left child,
/// so at most its right child needs re-linking.
fn detach_successor<T>(node: &mut Node<T>) -> Option<Box<Node<T>>> {
    let right = node.right.as_deref_mut()?;
    if right.left.is_none() {
        node.invalidate_height();
        let mut successor = node.right.take()?;
        node.right = successor.right.take();
        return Some(successor);
    }

    let mut parent = right;
    while parent.left.as_ref().is_some_and(|left| left.left.is_some()) {
        parent = parent.left.as_deref_mut()?;
    }

    parent.invalidate_height();
    let mut successor = parent.left.take()?;
    parent.left = successor.right.take();
    Some(successor)
}

/// An in-order iterator over a [`Tree`]'s values, created by [`Tree::iter`].
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(root: Option<&'a Node<T>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T, C> IntoIterator for &'a Tree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Configures a [`Tree`] before creating it.
///
/// # Examples
///
/// ```
/// use pooled_bst::{NodePool, Tree};
///
/// let pool = NodePool::shared(8);
/// let mut tree = Tree::builder()
///     .comparator(|a: &i32, b: &i32| b.cmp(a))
///     .pool(pool)
///     .initial_value(7)
///     .build();
///
/// assert_eq!(tree.len(), 1);
/// assert_eq!(tree.root_value(), Some(&7));
///
/// tree.insert_batch([9, 8]).unwrap();
/// assert_eq!(tree.to_vec(), [9, 8, 7]);
/// ```
pub struct TreeBuilder<T, C = Natural> {
    comparator: C,
    pool: Option<SharedPool<T>>,
    initial_value: Option<T>,
}

impl<T> Default for TreeBuilder<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeBuilder<T>
where
    T: Ord,
{
    /// A builder for an empty tree in `T`'s natural order with a pool of its own.
    pub fn new() -> Self {
        Self {
            comparator: Natural,
            pool: None,
            initial_value: None,
        }
    }
}

impl<T, C> TreeBuilder<T, C> {
    /// Orders the tree with `comparator` instead.
    pub fn comparator<D>(self, comparator: D) -> TreeBuilder<T, D>
    where
        D: Comparator<T>,
    {
        TreeBuilder {
            comparator,
            pool: self.pool,
            initial_value: self.initial_value,
        }
    }

    /// Recycles nodes through a pool shared with other trees.
    pub fn pool(mut self, pool: SharedPool<T>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Gives the tree a pool of its own holding up to `capacity` nodes.
    pub fn pool_capacity(mut self, capacity: usize) -> Self {
        self.pool = Some(NodePool::shared(capacity));
        self
    }

    /// Starts the tree off holding `value`. `None` leaves it empty.
    pub fn initial_value(mut self, value: impl Into<Option<T>>) -> Self {
        self.initial_value = value.into();
        self
    }

    /// Creates the tree.
    pub fn build(self) -> Tree<T, C>
    where
        C: Comparator<T>,
    {
        let pool = self
            .pool
            .unwrap_or_else(|| NodePool::shared(DEFAULT_POOL_CAPACITY));
        let mut tree = Tree::with_comparator_and_pool(self.comparator, pool);
        if let Some(value) = self.initial_value {
            tree.root = Some(acquire_from(&tree.pool, value));
            tree.len = 1;
        }
        tree
    }
}
