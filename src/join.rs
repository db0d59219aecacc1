//! Join, concat and split.
//!
//! `join` merges a left tree, a pivot node and a right tree into one tree.
//! When the heights differ it walks down the inner spine of the taller tree
//! (right spine of a taller left tree, left spine of a taller right tree) to
//! the first node no taller than the shorter tree. The pivot takes that node's
//! slot, with the shorter tree on the outer side and the cut subtree on the
//! inner side, and a fixup from the pivot restores balance. The walk costs
//! `|h(left) - h(right)| + 1`, which is what [`BalancedList::join`] reports.
//! An empty tree has height -1, so joining with an empty side walks to the
//! boundary node and inserts the pivot there.
//!
//! `split` cuts the tree at a target node. The target's children seed the two
//! halves. Walking up, every ancestor is joined (as the pivot) with its other
//! subtree onto the half that lies on that side.
//!
//! Split cost: let `H_i` be the height of the i-th ancestor on the path. A
//! half built from nodes below ancestor `i` has height at most `H_{i-1}`, and
//! the subtree it is joined with has height at least `H_i - 2`, so the half is
//! never more than 1 taller than what it joins. Each join then costs at most
//! the height the half gains plus 2. Summed over one side this telescopes to
//! `h + 1 + 2 * joins`, and both sides together stay under `4 * (h + 1)` for a
//! tree of height `h`. A split is O(log n), not O(log^2 n).

use smallvec::SmallVec;
use tracing::debug;

use crate::balance::Balance;
use crate::error::ListError;
use crate::list::BalancedList;
use crate::node::{Link, NodePtr, Side};

/// Per-join costs recorded by [`BalancedList::split_measured`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitCost {
    /// Cost of each join, bottom-up along the path to the root.
    joins: SmallVec<[usize; 32]>,
    /// Rebalancing operations performed by all joins.
    rebalances: usize,
}

impl SplitCost {
    fn record(&mut self, cost: usize, rebalances: usize) {
        self.joins.push(cost);
        self.rebalances += rebalances;
    }

    pub fn joins(&self) -> &[usize] {
        return &self.joins;
    }

    /// Number of joins (the depth of the split node).
    pub fn count(&self) -> usize {
        return self.joins.len();
    }

    pub fn total(&self) -> usize {
        return self.joins.iter().sum();
    }

    pub fn max(&self) -> usize {
        return self.joins.iter().copied().max().unwrap_or(0);
    }

    /// Mean join cost, 0 when no join happened.
    pub fn mean(&self) -> f64 {
        if self.joins.is_empty() {
            return 0.0;
        }
        return self.total() as f64 / self.joins.len() as f64;
    }

    pub fn rebalances(&self) -> usize {
        return self.rebalances;
    }
}

impl<T, B: Balance> BalancedList<T, B> {
    /// Merge `self`, `pivot`, then `other` into `self`.
    ///
    /// Returns the join cost `|height(self) - height(other)| + 1`.
    pub fn join(&mut self, pivot: T, other: BalancedList<T, B>) -> usize {
        let pivot = NodePtr::alloc(pivot);
        let first = self.first.unwrap_or(pivot);
        let last = other.last.unwrap_or(pivot);
        // SAFETY: `pivot` is a fresh detached node.
        let (cost, fixes) = unsafe { self.join_node(other, pivot) };
        self.first = Some(first);
        self.last = Some(last);
        debug!(cost, fixes, len = self.len(), "joined");
        return cost;
    }

    /// Tree part of a join. Boundary caches are left untouched.
    ///
    /// Returns `(cost, rebalances)`.
    ///
    /// # Safety
    /// `pivot` must be live and not part of `self` or `other`.
    pub(crate) unsafe fn join_node(&mut self, mut other: BalancedList<T, B>, pivot: NodePtr<T>) -> (usize, usize) {
        let left_height = self.height();
        let right_height = other.height();
        let left_root = self.root;
        // The tree now belongs to `self`; `other` drops empty.
        let right_root = other.root;
        other.root = Link::Virtual;
        other.first = None;
        other.last = None;

        unsafe {
            pivot.reset();
            if left_height == right_height {
                pivot.set_child(Side::Left, left_root);
                pivot.set_child(Side::Right, right_root);
                left_root.set_parent(Some(pivot));
                right_root.set_parent(Some(pivot));
                self.root = Link::Real(pivot);
            } else {
                // `side` is the inner spine of the taller tree.
                let (taller, shorter, side) = if left_height < right_height {
                    (right_root, left_root, Side::Left)
                } else {
                    (left_root, right_root, Side::Right)
                };
                let shorter_height = shorter.height();
                let Link::Real(mut parent) = taller else {
                    return (0, 0);
                };
                let mut cut = parent.child(side);
                while let Link::Real(next) = cut {
                    if next.height() <= shorter_height {
                        break;
                    }
                    parent = next;
                    cut = next.child(side);
                }

                pivot.set_child(side, shorter);
                pivot.set_child(side.opposite(), cut);
                shorter.set_parent(Some(pivot));
                cut.set_parent(Some(pivot));
                parent.set_child(side, Link::Real(pivot));
                pivot.set_parent(Some(parent));
                self.root = taller;
            }

            let fixes = self.fixup(pivot);
            let cost = (left_height - right_height).unsigned_abs() as usize + 1;
            return (cost, fixes);
        }
    }

    /// Append `other` after `self`.
    ///
    /// The last node of `self` is unlinked and reused as the join pivot.
    /// Returns `|height(self) - height(other)|` measured before the merge,
    /// with -1 as the height of an empty list.
    pub fn concat(&mut self, other: BalancedList<T, B>) -> usize {
        let diff = (self.height() - other.height()).unsigned_abs() as usize;
        if other.is_empty() {
            return diff;
        }
        if self.is_empty() {
            *self = other;
            return diff;
        }
        if self.first.is_none() || self.last.is_none() {
            self.refresh_bounds();
        }
        let (Some(first), Some(last)) = (self.first, self.last) else {
            return diff;
        };
        let other_last = other.last;

        // SAFETY: `last` belongs to `self`; once unlinked it is a detached node.
        let (cost, fixes) = unsafe {
            let (pivot, _) = self.unlink(last);
            self.join_node(other, pivot)
        };
        // A single-element `self` hands its only node over as the pivot, which
        // stays first.
        self.first = Some(first);
        self.last = other_last;
        if self.last.is_none() {
            self.refresh_bounds();
        }
        debug!(height_diff = diff, cost, fixes, len = self.len(), "concatenated");
        return diff;
    }

    /// Cut the list around `index`: everything before, the value at `index`,
    /// everything after. The nodes are redistributed, not copied.
    pub fn split(self, index: usize) -> Result<(BalancedList<T, B>, T, BalancedList<T, B>), ListError> {
        let (left, value, right, _) = self.split_measured(index)?;
        return Ok((left, value, right));
    }

    /// [`split`](Self::split), also reporting the cost of every join.
    pub fn split_measured(
        mut self,
        index: usize,
    ) -> Result<(BalancedList<T, B>, T, BalancedList<T, B>, SplitCost), ListError> {
        let target = self.node_at(index)?;
        let mut cost = SplitCost::default();

        // SAFETY: every node touched belongs to `self`. Ancestors are read
        // before they are reset, and the halves only ever contain nodes that
        // are already detached from the unvisited part of the path.
        let (left, value, right) = unsafe {
            let mut left = BalancedList::from_root(target.left());
            let mut right = BalancedList::from_root(target.right());

            let mut child = target;
            let mut parent = target.parent();
            while let Some(ancestor) = parent {
                parent = ancestor.parent();
                if ancestor.left() == Link::Real(child) {
                    // The ancestor and its right subtree follow the right half.
                    let subtree = BalancedList::from_root(ancestor.right());
                    let (join_cost, fixes) = right.join_node(subtree, ancestor);
                    cost.record(join_cost, fixes);
                } else {
                    // The ancestor and its left subtree precede the left half.
                    let mut subtree = BalancedList::from_root(ancestor.left());
                    let (join_cost, fixes) = subtree.join_node(left.take(), ancestor);
                    cost.record(join_cost, fixes);
                    left = subtree;
                }
                child = ancestor;
            }

            // Everything has been handed to the halves.
            self.root = Link::Virtual;
            self.first = None;
            self.last = None;

            target.reset();
            let value = target.free();
            left.refresh_bounds();
            right.refresh_bounds();
            (left, value, right)
        };

        debug!(
            index,
            joins = cost.count(),
            total = cost.total(),
            max = cost.max(),
            "split"
        );
        return Ok((left, value, right, cost));
    }
}
