//! Tree cells.
//!
//! A child slot is a [`Link`]: either `Virtual` (no subtree here) or `Real`,
//! pointing at a heap-allocated [`Node`]. Real nodes always carry two links,
//! so there is no third "missing child" state to check for.
//!
//! Nodes are allocated with `Box` and tracked through [`NodePtr`]s. The list
//! that owns the root owns every node reachable from it and frees them on drop.
//! The `parent` pointer is a plain back-reference and never owns anything.
//!
//! All accessors go through raw pointers and never hold a reference across
//! another access, so callers only have to guarantee the pointer is live.

use std::fmt;
use std::ptr::NonNull;

/// Height of a virtual node.
pub(crate) const VIRTUAL_HEIGHT: i32 = -1;

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline(always)]
    pub(crate) fn opposite(self) -> Side {
        return match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        };
    }
}

/// A real node.
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    /// Structural parent (None at the root).
    pub(crate) parent: Option<NodePtr<T>>,
    /// 1 + max(child heights), virtual children count as -1.
    pub(crate) height: i32,
    /// Number of real nodes in this subtree.
    pub(crate) rank: usize,
}

/// Non-owning handle to a real node.
pub(crate) struct NodePtr<T>(NonNull<Node<T>>);

impl<T> Clone for NodePtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodePtr<T> {}

impl<T> PartialEq for NodePtr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for NodePtr<T> {}

impl<T> fmt::Debug for NodePtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodePtr({:p})", self.0)
    }
}

/// A child slot: the sentinel or a real node.
pub(crate) enum Link<T> {
    Virtual,
    Real(NodePtr<T>),
}

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Link<T> {}

impl<T> PartialEq for Link<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Link::Virtual, Link::Virtual) => true,
            (Link::Real(a), Link::Real(b)) => a == b,
            _ => false,
        }
    }
}

impl<T> Eq for Link<T> {}

impl<T> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Link::Virtual => write!(f, "Virtual"),
            Link::Real(ptr) => write!(f, "Real({:p})", ptr.0),
        }
    }
}

impl<T> Link<T> {
    #[inline(always)]
    pub(crate) fn is_real(self) -> bool {
        return matches!(self, Link::Real(_));
    }

    #[inline(always)]
    pub(crate) fn is_virtual(self) -> bool {
        return !self.is_real();
    }

    #[inline(always)]
    pub(crate) fn real(self) -> Option<NodePtr<T>> {
        return match self {
            Link::Virtual => None,
            Link::Real(ptr) => Some(ptr),
        };
    }

    /// # Safety
    /// A real link must point at a live node.
    #[inline]
    pub(crate) unsafe fn height(self) -> i32 {
        return match self {
            Link::Virtual => VIRTUAL_HEIGHT,
            Link::Real(ptr) => unsafe { ptr.height() },
        };
    }

    /// # Safety
    /// A real link must point at a live node.
    #[inline]
    pub(crate) unsafe fn rank(self) -> usize {
        return match self {
            Link::Virtual => 0,
            Link::Real(ptr) => unsafe { ptr.rank() },
        };
    }

    /// Point a real node back at `parent`. No-op on the sentinel.
    ///
    /// # Safety
    /// A real link must point at a live node.
    #[inline]
    pub(crate) unsafe fn set_parent(self, parent: Option<NodePtr<T>>) {
        if let Link::Real(ptr) = self {
            unsafe { (*ptr.as_ptr()).parent = parent };
        }
    }
}

impl<T> NodePtr<T> {
    /// Allocate a detached leaf holding `value`.
    pub(crate) fn alloc(value: T) -> NodePtr<T> {
        let node = Box::new(Node {
            value,
            left: Link::Virtual,
            right: Link::Virtual,
            parent: None,
            height: 0,
            rank: 1,
        });
        return NodePtr(NonNull::from(Box::leak(node)));
    }

    /// Release the node and hand back its value. Children are not touched.
    ///
    /// # Safety
    /// The node must be live, allocated by [`NodePtr::alloc`], and no longer
    /// reachable from any tree.
    pub(crate) unsafe fn free(self) -> T {
        let node = unsafe { Box::from_raw(self.0.as_ptr()) };
        return node.value;
    }

    #[inline(always)]
    pub(crate) fn as_ptr(self) -> *mut Node<T> {
        return self.0.as_ptr();
    }

    /// # Safety
    /// The node must be live and not mutated while the reference is held.
    #[inline(always)]
    pub(crate) unsafe fn value<'a>(self) -> &'a T {
        return unsafe { &(*self.as_ptr()).value };
    }

    /// # Safety
    /// The node must be live and no other reference to its value may exist.
    #[inline(always)]
    pub(crate) unsafe fn value_mut<'a>(self) -> &'a mut T {
        return unsafe { &mut (*self.as_ptr()).value };
    }

    /// # Safety
    /// The node must be live.
    #[inline(always)]
    pub(crate) unsafe fn left(self) -> Link<T> {
        return unsafe { (*self.as_ptr()).left };
    }

    /// # Safety
    /// The node must be live.
    #[inline(always)]
    pub(crate) unsafe fn right(self) -> Link<T> {
        return unsafe { (*self.as_ptr()).right };
    }

    /// # Safety
    /// The node must be live.
    #[inline(always)]
    pub(crate) unsafe fn child(self, side: Side) -> Link<T> {
        return match side {
            Side::Left => unsafe { self.left() },
            Side::Right => unsafe { self.right() },
        };
    }

    /// Overwrite a child slot. The child's parent pointer is not touched.
    ///
    /// # Safety
    /// The node must be live.
    #[inline(always)]
    pub(crate) unsafe fn set_child(self, side: Side, link: Link<T>) {
        match side {
            Side::Left => unsafe { (*self.as_ptr()).left = link },
            Side::Right => unsafe { (*self.as_ptr()).right = link },
        }
    }

    /// # Safety
    /// The node must be live.
    #[inline(always)]
    pub(crate) unsafe fn parent(self) -> Option<NodePtr<T>> {
        return unsafe { (*self.as_ptr()).parent };
    }

    /// # Safety
    /// The node must be live.
    #[inline(always)]
    pub(crate) unsafe fn set_parent(self, parent: Option<NodePtr<T>>) {
        unsafe { (*self.as_ptr()).parent = parent };
    }

    /// # Safety
    /// The node must be live.
    #[inline(always)]
    pub(crate) unsafe fn height(self) -> i32 {
        return unsafe { (*self.as_ptr()).height };
    }

    /// # Safety
    /// The node must be live.
    #[inline(always)]
    pub(crate) unsafe fn rank(self) -> usize {
        return unsafe { (*self.as_ptr()).rank };
    }

    /// Left height minus right height.
    ///
    /// # Safety
    /// The node and its real children must be live.
    #[inline]
    pub(crate) unsafe fn balance_factor(self) -> i32 {
        return unsafe { self.left().height() - self.right().height() };
    }

    /// Recompute rank and height from the children.
    /// Returns whether the height changed.
    ///
    /// # Safety
    /// The node and its real children must be live.
    #[inline]
    pub(crate) unsafe fn update(self) -> bool {
        unsafe {
            let left = self.left();
            let right = self.right();
            let height = 1 + left.height().max(right.height());
            let node = self.as_ptr();
            (*node).rank = left.rank() + right.rank() + 1;
            let changed = (*node).height != height;
            (*node).height = height;
            return changed;
        }
    }

    /// Both children are virtual.
    ///
    /// # Safety
    /// The node must be live.
    #[inline]
    pub(crate) unsafe fn is_leaf(self) -> bool {
        return unsafe { self.left().is_virtual() && self.right().is_virtual() };
    }

    /// Which slot of its parent this node sits in. None at the root.
    ///
    /// # Safety
    /// The node and its parent must be live.
    #[inline]
    pub(crate) unsafe fn side(self) -> Option<Side> {
        unsafe {
            let parent = self.parent()?;
            if parent.left() == Link::Real(self) {
                return Some(Side::Left);
            }
            return Some(Side::Right);
        }
    }

    /// The outermost node on `side` of this subtree.
    ///
    /// # Safety
    /// The subtree must be live.
    pub(crate) unsafe fn extreme(self, side: Side) -> NodePtr<T> {
        let mut node = self;
        while let Link::Real(next) = unsafe { node.child(side) } {
            node = next;
        }
        return node;
    }

    /// In-order neighbour on `side`: predecessor for `Left`, successor for `Right`.
    ///
    /// If the child on that side is real, this is the opposite extreme of that
    /// subtree. Otherwise climb while we are a `side` child; the first ancestor
    /// reached from the other side is the neighbour.
    ///
    /// # Safety
    /// The tree containing this node must be live.
    pub(crate) unsafe fn neighbor(self, side: Side) -> Option<NodePtr<T>> {
        unsafe {
            if let Link::Real(child) = self.child(side) {
                return Some(child.extreme(side.opposite()));
            }
            let mut node = self;
            while node.side() == Some(side) {
                node = node.parent()?;
            }
            return node.parent();
        }
    }

    /// # Safety
    /// The tree containing this node must be live.
    #[inline]
    pub(crate) unsafe fn predecessor(self) -> Option<NodePtr<T>> {
        return unsafe { self.neighbor(Side::Left) };
    }

    /// # Safety
    /// The tree containing this node must be live.
    #[inline]
    pub(crate) unsafe fn successor(self) -> Option<NodePtr<T>> {
        return unsafe { self.neighbor(Side::Right) };
    }

    /// Number of edges between this node and the root.
    ///
    /// # Safety
    /// The tree containing this node must be live.
    pub(crate) unsafe fn depth(self) -> usize {
        let mut depth = 0;
        let mut node = self;
        while let Some(parent) = unsafe { node.parent() } {
            depth += 1;
            node = parent;
        }
        return depth;
    }

    /// Turn this node back into a detached leaf, keeping its value.
    /// Former children and parent are not updated.
    ///
    /// # Safety
    /// The node must be live.
    pub(crate) unsafe fn reset(self) {
        unsafe {
            let node = self.as_ptr();
            (*node).left = Link::Virtual;
            (*node).right = Link::Virtual;
            (*node).parent = None;
            (*node).height = 0;
            (*node).rank = 1;
        }
    }
}
