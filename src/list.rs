//! Balanced List
//!
//! A sequence stored as a rank-augmented binary tree. Every real node knows the
//! size of its subtree (`rank`), and the in-order position of a node inside its
//! subtree is its left child's rank. That turns positional lookup into a binary
//! search on subtree sizes.
//!
//! Operations:
//! - retrieve / insert / delete: O(log n) - rank descent plus one fixup walk
//! - first / last: O(1) - cached boundary nodes
//! - join / concat / split: O(log n) - see `join.rs`
//! - to_vec / search / iter: O(n)
//!
//! Every structural change ends with a fixup walk from the changed node to the
//! root. The walk recomputes rank and height at each ancestor and rotates
//! wherever the balance factor reaches +-2. The number it returns counts
//! rotations plus the nodes whose height changed.

use std::fmt;
use std::marker::PhantomData;
use std::mem;

use tracing::trace;

use crate::balance::{Avl, Balance, Unbalanced};
use crate::error::{InvariantError, ListError};
use crate::iter::Iter;
use crate::node::{Link, Node, NodePtr, Side};

/// A positional list backed by a rank tree. `B` picks the rebalancing policy.
pub struct BalancedList<T, B: Balance = Avl> {
    pub(crate) root: Link<T>,
    /// Node holding the first element (None when empty).
    pub(crate) first: Option<NodePtr<T>>,
    /// Node holding the last element (None when empty).
    pub(crate) last: Option<NodePtr<T>>,
    _owns: PhantomData<Box<Node<T>>>,
    _balance: PhantomData<B>,
}

/// The never-rotating baseline.
pub type BstList<T> = BalancedList<T, Unbalanced>;

// SAFETY: the list exclusively owns every node reachable from its root.
unsafe impl<T: Send, B: Balance> Send for BalancedList<T, B> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync, B: Balance> Sync for BalancedList<T, B> {}

impl<T> BalancedList<T> {
    /// An empty AVL-balanced list. Other policies start from `Default`.
    pub fn new() -> BalancedList<T> {
        return BalancedList::with_root(Link::Virtual);
    }
}

impl<T, B: Balance> BalancedList<T, B> {
    fn with_root(root: Link<T>) -> BalancedList<T, B> {
        return BalancedList {
            root,
            first: None,
            last: None,
            _owns: PhantomData,
            _balance: PhantomData,
        };
    }

    /// Wrap a detached subtree. Boundary caches are left empty; call
    /// [`refresh_bounds`](Self::refresh_bounds) once the tree is final.
    pub(crate) fn from_root(root: Link<T>) -> BalancedList<T, B> {
        // SAFETY: callers hand over a live, detached subtree.
        unsafe { root.set_parent(None) };
        return BalancedList::with_root(root);
    }

    /// Move the whole tree out, leaving `self` empty.
    pub(crate) fn take(&mut self) -> BalancedList<T, B> {
        return mem::replace(self, BalancedList::with_root(Link::Virtual));
    }

    /// Recompute the cached first and last nodes by walking the spines.
    pub(crate) fn refresh_bounds(&mut self) {
        // SAFETY: the root subtree is live and owned by `self`.
        unsafe {
            self.first = self.root.real().map(|root| root.extreme(Side::Left));
            self.last = self.root.real().map(|root| root.extreme(Side::Right));
        }
    }

    pub fn is_empty(&self) -> bool {
        return self.root.is_virtual();
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        // SAFETY: the root is live or virtual.
        return unsafe { self.root.rank() };
    }

    /// Height of the tree; -1 when empty.
    pub fn height(&self) -> i32 {
        // SAFETY: the root is live or virtual.
        return unsafe { self.root.height() };
    }

    pub fn first(&self) -> Option<&T> {
        // SAFETY: cached nodes belong to this tree.
        return self.first.map(|node| unsafe { node.value() });
    }

    pub fn last(&self) -> Option<&T> {
        // SAFETY: cached nodes belong to this tree.
        return self.last.map(|node| unsafe { node.value() });
    }

    /// Find the node at 1-based `rank`.
    ///
    /// Starting at the root, the target is here when the left subtree holds
    /// exactly `rank - 1` nodes. Otherwise descend left if the left subtree is
    /// big enough to contain it, or skip the left subtree and this node and
    /// descend right.
    pub(crate) fn node_at_rank(&self, rank: usize) -> Result<NodePtr<T>, ListError> {
        let len = self.len();
        let out_of_range = ListError::RankOutOfRange { rank, len };
        if rank == 0 || rank > len {
            return Err(out_of_range);
        }
        let Link::Real(mut node) = self.root else {
            return Err(out_of_range);
        };
        let mut rank = rank;
        // SAFETY: the descent stays inside the live tree.
        unsafe {
            loop {
                let left_rank = node.left().rank();
                if left_rank == rank - 1 {
                    return Ok(node);
                }
                let next = if left_rank >= rank {
                    node.left()
                } else {
                    rank -= left_rank + 1;
                    node.right()
                };
                node = match next {
                    Link::Real(next) => next,
                    Link::Virtual => return Err(out_of_range),
                };
            }
        }
    }

    pub(crate) fn node_at(&self, index: usize) -> Result<NodePtr<T>, ListError> {
        let len = self.len();
        if index >= len {
            return Err(ListError::IndexOutOfRange { index, len });
        }
        return self.node_at_rank(index + 1);
    }

    /// Value at 0-based `index`, or None when out of range.
    pub fn retrieve(&self, index: usize) -> Option<&T> {
        let node = self.node_at(index).ok()?;
        // SAFETY: the node belongs to this tree; the borrow is tied to `&self`.
        return Some(unsafe { node.value() });
    }

    pub fn retrieve_mut(&mut self, index: usize) -> Option<&mut T> {
        let node = self.node_at(index).ok()?;
        // SAFETY: the node belongs to this tree; the borrow is tied to `&mut self`.
        return Some(unsafe { node.value_mut() });
    }

    /// Number of edges between the root and the node at `index`.
    pub fn depth(&self, index: usize) -> Result<usize, ListError> {
        let node = self.node_at(index)?;
        // SAFETY: the node belongs to this tree.
        return Ok(unsafe { node.depth() });
    }

    /// Insert `value` so it ends up at `index`.
    ///
    /// Returns the number of rebalancing operations. An index past the end
    /// leaves the list untouched and returns 0; use [`try_insert`](Self::try_insert)
    /// to get an error instead.
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        return self.try_insert(index, value).unwrap_or(0);
    }

    pub fn try_insert(&mut self, index: usize, value: T) -> Result<usize, ListError> {
        let len = self.len();
        if index > len {
            return Err(ListError::IndexOutOfRange { index, len });
        }
        let node = NodePtr::alloc(value);
        // SAFETY: `node` is a fresh detached leaf.
        let attached = unsafe { self.attach(index, node) };
        if attached.is_err() {
            // SAFETY: attach failed before linking the node anywhere.
            drop(unsafe { node.free() });
        }
        return attached;
    }

    /// Append at the end.
    pub fn push(&mut self, value: T) {
        let len = self.len();
        self.insert(len, value);
    }

    /// Link a detached leaf so that it lands at `index`, then fix up.
    ///
    /// The new node always goes in as a leaf: either as the left child of the
    /// node currently at `index` (when that slot is virtual) or as the right
    /// child of that node's predecessor, whose right slot is then virtual.
    ///
    /// # Safety
    /// `node` must be a live detached leaf not owned by any tree.
    pub(crate) unsafe fn attach(&mut self, index: usize, node: NodePtr<T>) -> Result<usize, ListError> {
        let len = self.len();
        if index > len {
            return Err(ListError::IndexOutOfRange { index, len });
        }
        debug_assert!(unsafe { node.is_leaf() && node.parent().is_none() });
        if self.root.is_virtual() {
            self.root = Link::Real(node);
            self.first = Some(node);
            self.last = Some(node);
            return Ok(0);
        }
        unsafe {
            let (parent, side) = if index == len {
                let tail = match self.last {
                    Some(tail) => tail,
                    None => self.node_at_rank(len)?,
                };
                (tail, Side::Right)
            } else {
                let at = self.node_at_rank(index + 1)?;
                match at.left() {
                    Link::Virtual => (at, Side::Left),
                    Link::Real(left) => (left.extreme(Side::Right), Side::Right),
                }
            };
            parent.set_child(side, Link::Real(node));
            node.set_parent(Some(parent));
            if index == 0 {
                self.first = Some(node);
            }
            if index == len {
                self.last = Some(node);
            }
            return Ok(self.fixup(node));
        }
    }

    /// Delete the element at `index`. Returns the number of rebalancing operations.
    pub fn delete(&mut self, index: usize) -> Result<usize, ListError> {
        let (_, fixes) = self.remove_entry(index)?;
        return Ok(fixes);
    }

    /// Remove and return the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<T, ListError> {
        let (value, _) = self.remove_entry(index)?;
        return Ok(value);
    }

    pub fn pop_last(&mut self) -> Option<T> {
        let last = self.last?;
        // SAFETY: the cached last node belongs to this tree.
        unsafe {
            let (node, _) = self.unlink(last);
            return Some(node.free());
        }
    }

    fn remove_entry(&mut self, index: usize) -> Result<(T, usize), ListError> {
        let node = self.node_at(index)?;
        // SAFETY: the node belongs to this tree; once unlinked nothing refers to it.
        unsafe {
            let (node, fixes) = self.unlink(node);
            return Ok((node.free(), fixes));
        }
    }

    /// Take the element held by `node` out of the tree.
    ///
    /// The returned node is detached and holds the removed value. With two real
    /// children, the successor's value moves into `node` and the successor
    /// node is the one taken out. That node has no left child, so it falls
    /// into one of the simple cases. `node` itself stays in place.
    ///
    /// # Safety
    /// `node` must belong to this tree.
    pub(crate) unsafe fn unlink(&mut self, node: NodePtr<T>) -> (NodePtr<T>, usize) {
        unsafe {
            if let (Link::Real(_), Link::Real(right)) = (node.left(), node.right()) {
                let successor = right.extreme(Side::Left);
                mem::swap(node.value_mut(), successor.value_mut());
                return self.unlink(successor);
            }

            let child = match node.left() {
                Link::Real(_) => node.left(),
                Link::Virtual => node.right(),
            };
            if self.first == Some(node) {
                self.first = node.successor();
            }
            if self.last == Some(node) {
                self.last = node.predecessor();
            }

            let parent = node.parent();
            child.set_parent(parent);
            self.replace_child(parent, node, child);
            node.reset();

            let fixes = match parent {
                Some(parent) => self.fixup(parent),
                None => 0,
            };
            return (node, fixes);
        }
    }

    /// Point whatever referenced `old` (a parent slot or the root) at `new`.
    ///
    /// # Safety
    /// `parent` must be `old`'s current parent, or None if `old` is the root.
    pub(crate) unsafe fn replace_child(&mut self, parent: Option<NodePtr<T>>, old: NodePtr<T>, new: Link<T>) {
        match parent {
            None => self.root = new,
            Some(parent) => unsafe {
                if parent.left() == Link::Real(old) {
                    parent.set_child(Side::Left, new);
                } else {
                    parent.set_child(Side::Right, new);
                }
            },
        }
    }

    /// Walk from `node` to the root, fixing every node on the way.
    ///
    /// The walk never stops early: ranks change on every ancestor.
    ///
    /// # Safety
    /// `node` must belong to this tree.
    pub(crate) unsafe fn fixup(&mut self, node: NodePtr<T>) -> usize {
        let mut fixes = 0;
        let mut current = Some(node);
        while let Some(node) = current {
            // A rotation puts another node in `node`'s slot under the same parent.
            current = unsafe { node.parent() };
            fixes += unsafe { self.fix_node(node) };
        }
        return fixes;
    }

    /// Refresh `node`'s metrics and rotate if it is out of balance.
    ///
    /// Returns 1 or 2 for a single or double rotation, otherwise 1 if the
    /// height changed and 0 if it did not.
    unsafe fn fix_node(&mut self, node: NodePtr<T>) -> usize {
        unsafe {
            let height_changed = node.update();
            if !B::ROTATES {
                return height_changed as usize;
            }

            let balance = node.balance_factor();
            let heavy = match balance {
                2 => Side::Left,
                -2 => Side::Right,
                _ => return height_changed as usize,
            };
            let Link::Real(child) = node.child(heavy) else {
                return height_changed as usize;
            };

            // Lean of the heavy child towards the heavy side.
            let lean = match heavy {
                Side::Left => child.balance_factor(),
                Side::Right => -child.balance_factor(),
            };
            if lean >= 0 {
                self.rotate(node, heavy.opposite());
                trace!(?heavy, balance, "single rotation");
                return 1;
            }
            self.rotate(child, heavy);
            self.rotate(node, heavy.opposite());
            trace!(?heavy, balance, "double rotation");
            return 2;
        }
    }

    /// Rotate around `node` in direction `dir`.
    ///
    /// A right rotation promotes the left child, a left rotation the right
    /// child. The promoted node takes `node`'s slot; its inner subtree moves
    /// under `node`. `node` is updated before the promoted node because the
    /// promoted node's metrics depend on it.
    ///
    /// # Safety
    /// `node` must belong to this tree.
    pub(crate) unsafe fn rotate(&mut self, node: NodePtr<T>, dir: Side) {
        unsafe {
            let from = dir.opposite();
            let Link::Real(promoted) = node.child(from) else {
                return;
            };
            let parent = node.parent();
            let inner = promoted.child(dir);

            node.set_child(from, inner);
            inner.set_parent(Some(node));

            promoted.set_child(dir, Link::Real(node));
            node.set_parent(Some(promoted));

            promoted.set_parent(parent);
            self.replace_child(parent, node, Link::Real(promoted));

            node.update();
            promoted.update();
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        return Iter::new(self.first, self.last, self.len());
    }

    /// 0-based index of the first element equal to `value`.
    ///
    /// The list is ordered by position, not by value, so this is a full scan.
    pub fn search(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        return self.iter().position(|item| item == value);
    }

    /// All elements in order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        return self.iter().cloned().collect();
    }

    /// Check every structural invariant.
    ///
    /// Checks are local (each node against its children), which by induction
    /// covers the whole tree. Balance is only checked for rotating policies.
    pub fn verify(&self) -> Result<(), InvariantError> {
        // SAFETY: the traversal only visits nodes owned by this tree.
        unsafe {
            if let Link::Real(root) = self.root {
                if root.parent().is_some() {
                    return Err(InvariantError::RootParent);
                }
            }

            let mut stack: Vec<NodePtr<T>> = Vec::new();
            let mut link = self.root;
            let mut position = 0;
            let mut first = None;
            let mut last = None;
            loop {
                while let Link::Real(node) = link {
                    stack.push(node);
                    link = node.left();
                }
                let Some(node) = stack.pop() else {
                    break;
                };

                for side in [Side::Left, Side::Right] {
                    if let Link::Real(child) = node.child(side) {
                        if child.parent() != Some(node) {
                            return Err(InvariantError::Parent { position });
                        }
                    }
                }

                let (left, right) = (node.left(), node.right());
                let expected = left.rank() + right.rank() + 1;
                if node.rank() != expected {
                    return Err(InvariantError::Rank {
                        position,
                        stored: node.rank(),
                        expected,
                    });
                }
                let expected = 1 + left.height().max(right.height());
                if node.height() != expected {
                    return Err(InvariantError::Height {
                        position,
                        stored: node.height(),
                        expected,
                    });
                }
                let balance = node.balance_factor();
                if B::ROTATES && balance.abs() > 1 {
                    return Err(InvariantError::Unbalanced { position, balance });
                }

                if first.is_none() {
                    first = Some(node);
                }
                last = Some(node);
                position += 1;
                link = node.right();
            }

            if self.first != first {
                return Err(InvariantError::Boundary { which: "first" });
            }
            if self.last != last {
                return Err(InvariantError::Boundary { which: "last" });
            }
            return Ok(());
        }
    }
}

impl<T, B: Balance> Drop for BalancedList<T, B> {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        if let Link::Real(root) = self.root {
            stack.push(root);
        }
        // SAFETY: every node reachable from the root is owned by this list and
        // visited exactly once.
        unsafe {
            while let Some(node) = stack.pop() {
                if let Link::Real(left) = node.left() {
                    stack.push(left);
                }
                if let Link::Real(right) = node.right() {
                    stack.push(right);
                }
                drop(node.free());
            }
        }
        self.root = Link::Virtual;
        self.first = None;
        self.last = None;
    }
}

impl<T, B: Balance> Default for BalancedList<T, B> {
    fn default() -> Self {
        Self::with_root(Link::Virtual)
    }
}

impl<T: Clone, B: Balance> Clone for BalancedList<T, B> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq, B: Balance> PartialEq for BalancedList<T, B> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, B: Balance> Eq for BalancedList<T, B> {}

impl<T: fmt::Debug, B: Balance> fmt::Debug for BalancedList<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, B: Balance> Extend<T> for BalancedList<T, B> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T, B: Balance> FromIterator<T> for BalancedList<T, B> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::default();
        list.extend(iter);
        list
    }
}

impl<'a, T, B: Balance> IntoIterator for &'a BalancedList<T, B> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
