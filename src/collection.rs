//! Sequence operations shared by [`BalancedList`] and `Vec`, so the same edit
//! script can drive both and their contents can be compared.

use crate::balance::Balance;
use crate::list::BalancedList;

pub trait Collection where Self: Sized {
    fn len(&self) -> usize;
    /// Split into the elements before `index` and the elements from `index` on.
    fn split(self, index: usize) -> (Self, Self);
    fn append(&mut self, other: Self);
}

impl<T> Collection for Vec<T> {
    fn len(&self) -> usize { self.len() }

    fn split(mut self, index: usize) -> (Self, Self) {
        let end = self.split_off(index);
        (self, end)
    }

    fn append(&mut self, mut other: Self) {
        self.append(&mut other);
    }
}

impl<T, B: Balance> Collection for BalancedList<T, B> {
    fn len(&self) -> usize { BalancedList::len(self) }

    /// An index at or past the end leaves everything on the left.
    fn split(self, index: usize) -> (Self, Self) {
        if index >= BalancedList::len(&self) {
            return (self, BalancedList::default());
        }
        match self.split_measured(index) {
            Ok((left, value, mut right, _)) => {
                right.insert(0, value);
                (left, right)
            }
            Err(_) => (BalancedList::default(), BalancedList::default()),
        }
    }

    fn append(&mut self, other: Self) {
        self.concat(other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<C: Collection>(collection: C, index: usize) -> C {
        let (mut left, right) = collection.split(index);
        left.append(right);
        left
    }

    #[test]
    fn vec_and_list_agree() {
        for index in 0..12 {
            let list: BalancedList<u8> = (0..10).collect();
            let vec: Vec<u8> = (0..10).collect();
            let (list_left, list_right) = Collection::split(list, index.min(10));
            let (vec_left, vec_right) = Collection::split(vec, index.min(10));
            assert_eq!(list_left.to_vec(), vec_left);
            assert_eq!(list_right.to_vec(), vec_right);
            list_left.verify().unwrap();
            list_right.verify().unwrap();
        }
    }

    #[test]
    fn split_then_append_restores() {
        for index in 0..=8 {
            let list: BalancedList<u8> = (0..8).collect();
            let list = roundtrip(list, index);
            assert_eq!(list.to_vec(), (0..8).collect::<Vec<_>>());
            list.verify().unwrap();
            assert_eq!(roundtrip((0..8).collect::<Vec<u8>>(), index), (0..8).collect::<Vec<_>>());
        }
    }
}
