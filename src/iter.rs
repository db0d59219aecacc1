use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::node::NodePtr;

/// In-order iterator over a [`BalancedList`](crate::BalancedList).
///
/// Walks successor/predecessor links from the cached boundary nodes, so a full
/// pass is O(n) and uses no stack regardless of tree shape.
pub struct Iter<'a, T> {
    front: Option<NodePtr<T>>,
    back: Option<NodePtr<T>>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(first: Option<NodePtr<T>>, last: Option<NodePtr<T>>, len: usize) -> Iter<'a, T> {
        return Iter {
            front: first,
            back: last,
            remaining: len,
            _marker: PhantomData,
        };
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front?;
        self.remaining -= 1;
        // SAFETY: the iterator borrows the list, so every node stays live.
        unsafe {
            self.front = node.successor();
            return Some(node.value());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back?;
        self.remaining -= 1;
        // SAFETY: as in `next`.
        unsafe {
            self.back = node.predecessor();
            return Some(node.value());
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            front: self.front,
            back: self.back,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}
