//! Height-balanced (AVL) binary search tree with bracketing lookup.
//!
//! The tree is ordered by an injected three-way [`Comparator`]. Items that
//! compare equal are never stored twice: the first one wins. Every mutation
//! is written in the functional style where each recursive step hands back
//! the (possibly rotated) root of its subtree and the caller re-attaches it.

use std::cmp::Ordering;
use std::fmt;

use log::{debug, trace};

mod node;

pub use node::{BalancedNode, Link};

/// A total order over the items of a tree.
pub trait Comparator<T> {
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering;
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        self(lhs, rhs)
    }
}

#[derive(Clone)]
pub struct BalancedTree<T, C> {
    root: Link<T>,
    comparator: C,
    len: usize,
}

impl<T, C> BalancedTree<T, C> {
    pub fn root(&self) -> Option<&BalancedNode<T>> {
        self.root.as_deref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn height(&self) -> usize {
        BalancedNode::height_of(&self.root)
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// In-order iteration, i.e. ascending by the comparator.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            stack: Vec::with_capacity(self.height()),
            remaining: self.len,
        };
        iter.push_left_edge(self.root());
        iter
    }
}

impl<T, C: Comparator<T>> BalancedTree<T, C> {
    pub fn new(comparator: C) -> BalancedTree<T, C> {
        BalancedTree {
            root: None,
            comparator,
            len: 0,
        }
    }

    /// Inserts `item` unless an equal item is already stored, in which case
    /// the new item is dropped and the stored one is kept.
    pub fn insert(&mut self, item: T) -> bool {
        let (root, placed) = insert(self.root.take(), item, &self.comparator);
        self.root = Some(root);
        if placed.is_some() {
            self.len += 1;
            true
        } else {
            debug!("ignoring insert of an item equal to a stored one");
            false
        }
    }

    /// Removes the stored item equal to `item`, if any.
    pub fn remove(&mut self, item: &T) -> Option<T> {
        let comparator = &self.comparator;
        let (root, removed) = remove(self.root.take(), &mut |stored: &T| {
            comparator.compare(item, stored)
        });
        self.root = root;
        self.count_removal(removed)
    }

    /// Removes the stored item for which `probe` returns `Equal`.
    ///
    /// `probe(stored)` must give the ordering of the sought item relative to
    /// `stored`, consistently with the tree's comparator.
    pub fn remove_by<F>(&mut self, mut probe: F) -> Option<T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let (root, removed) = remove(self.root.take(), &mut probe);
        self.root = root;
        self.count_removal(removed)
    }

    /// Returns the largest stored item `<= item` and the smallest stored item
    /// `>= item`. An exact match is returned on both sides.
    pub fn lookup(&self, item: &T) -> (Option<&T>, Option<&T>) {
        self.lookup_by(|stored| self.comparator.compare(item, stored))
    }

    /// Bracketing search driven by `probe`, see [`remove_by`](Self::remove_by).
    ///
    /// This is a single descent from the root that remembers the last node
    /// passed on either side; there is no backtracking.
    pub fn lookup_by<F>(&self, mut probe: F) -> (Option<&T>, Option<&T>)
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut lower = None;
        let mut upper = None;
        let mut cursor = self.root();
        while let Some(node) = cursor {
            match probe(&node.data) {
                Ordering::Less => {
                    upper = Some(&node.data);
                    cursor = node.left();
                }
                Ordering::Greater => {
                    lower = Some(&node.data);
                    cursor = node.right();
                }
                Ordering::Equal => return (Some(&node.data), Some(&node.data)),
            }
        }
        (lower, upper)
    }

    pub fn find_by<F>(&self, mut probe: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut cursor = self.root();
        while let Some(node) = cursor {
            match probe(&node.data) {
                Ordering::Less => cursor = node.left(),
                Ordering::Greater => cursor = node.right(),
                Ordering::Equal => return Some(&node.data),
            }
        }
        None
    }

    /// Mutable access to a stored item. Callers must not change anything the
    /// comparator looks at.
    pub(crate) fn find_mut_by<F>(&mut self, mut probe: F) -> Option<&mut T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut cursor = self.root.as_deref_mut();
        while let Some(node) = cursor {
            match probe(&node.data) {
                Ordering::Less => cursor = node.left_mut(),
                Ordering::Greater => cursor = node.right_mut(),
                Ordering::Equal => return Some(&mut node.data),
            }
        }
        None
    }

    fn count_removal(&mut self, removed: Option<T>) -> Option<T> {
        if removed.is_some() {
            self.len -= 1;
        } else {
            debug!("remove found no matching item");
        }
        removed
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BalancedTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a BalancedTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, T> {
    stack: Vec<&'a BalancedNode<T>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn push_left_edge(&mut self, mut node: Option<&'a BalancedNode<T>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_edge(node.right());
        self.remaining -= 1;
        Some(&node.data)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

fn rotate_right<T>(mut node: Box<BalancedNode<T>>) -> Box<BalancedNode<T>> {
    match node.set_left(None) {
        Some(mut pivot) => {
            let inner = pivot.set_right(None);
            node.set_left(inner);
            pivot.set_right(Some(node));
            trace!("rotated right, subtree height now {}", pivot.height());
            pivot
        }
        None => node,
    }
}

fn rotate_left<T>(mut node: Box<BalancedNode<T>>) -> Box<BalancedNode<T>> {
    match node.set_right(None) {
        Some(mut pivot) => {
            let inner = pivot.set_left(None);
            node.set_right(inner);
            pivot.set_left(Some(node));
            trace!("rotated left, subtree height now {}", pivot.height());
            pivot
        }
        None => node,
    }
}

/// Inserts below `link` and returns the new subtree root together with the
/// direction the item took at that root (`Equal` for a freshly created
/// node), or `None` when an equal item was already present.
fn insert<T, C>(link: Link<T>, item: T, comparator: &C) -> (Box<BalancedNode<T>>, Option<Ordering>)
where
    C: Comparator<T>,
{
    let mut node = match link {
        Some(node) => node,
        None => return (Box::new(BalancedNode::new(item)), Some(Ordering::Equal)),
    };

    let direction = comparator.compare(&item, &node.data);
    let placed = match direction {
        Ordering::Less => {
            let (left, placed) = insert(node.set_left(None), item, comparator);
            node.set_left(Some(left));
            placed
        }
        Ordering::Greater => {
            let (right, placed) = insert(node.set_right(None), item, comparator);
            node.set_right(Some(right));
            placed
        }
        Ordering::Equal => None,
    };
    if placed.is_none() {
        return (node, None);
    }

    let balance = node.balance();
    if balance > 1 {
        // left-right: the item went into the right half of the left child
        if placed == Some(Ordering::Greater) {
            let left = node.set_left(None).map(rotate_left);
            node.set_left(left);
        }
        return (rotate_right(node), Some(direction));
    }
    if balance < -1 {
        if placed == Some(Ordering::Less) {
            let right = node.set_right(None).map(rotate_right);
            node.set_right(right);
        }
        return (rotate_left(node), Some(direction));
    }
    (node, Some(direction))
}

fn remove<T, F>(link: Link<T>, probe: &mut F) -> (Link<T>, Option<T>)
where
    F: FnMut(&T) -> Ordering,
{
    let mut node = match link {
        Some(node) => node,
        None => return (None, None),
    };

    let removed = match probe(&node.data) {
        Ordering::Less => {
            let (left, removed) = remove(node.set_left(None), probe);
            node.set_left(left);
            removed
        }
        Ordering::Greater => {
            let (right, removed) = remove(node.set_right(None), probe);
            node.set_right(right);
            removed
        }
        Ordering::Equal => {
            let left = node.set_left(None);
            let right = node.set_right(None);
            match (left, right) {
                // the remaining child is already balanced
                (None, None) => return (None, Some(node.data)),
                (Some(child), None) | (None, Some(child)) => return (Some(child), Some(node.data)),
                (Some(left), Some(right)) => {
                    let (right, successor) = remove_leftmost(right);
                    let removed = std::mem::replace(&mut node.data, successor);
                    node.set_left(Some(left));
                    node.set_right(right);
                    Some(removed)
                }
            }
        }
    };
    if removed.is_none() {
        return (Some(node), None);
    }
    (Some(rebalance_after_removal(node)), removed)
}

/// Detaches the in-order first item of a subtree.
fn remove_leftmost<T>(mut node: Box<BalancedNode<T>>) -> (Link<T>, T) {
    match node.set_left(None) {
        None => {
            let (_, data, right) = (*node).into_parts();
            (right, data)
        }
        Some(left) => {
            let (left, leftmost) = remove_leftmost(left);
            node.set_left(left);
            (Some(rebalance_after_removal(node)), leftmost)
        }
    }
}

fn rebalance_after_removal<T>(mut node: Box<BalancedNode<T>>) -> Box<BalancedNode<T>> {
    let balance = node.balance();
    if balance > 1 {
        if node.left().map_or(0, BalancedNode::balance) < 0 {
            let left = node.set_left(None).map(rotate_left);
            node.set_left(left);
        }
        return rotate_right(node);
    }
    if balance < -1 {
        if node.right().map_or(0, BalancedNode::balance) > 0 {
            let right = node.set_right(None).map(rotate_right);
            node.set_right(right);
        }
        return rotate_left(node);
    }
    node
}
