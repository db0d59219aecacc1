//! AFL fuzz harness for the list
//!
//! Every input decodes to a script of positional edits, applied to a
//! `BalancedList` and to a `Vec` model side by side. After each step:
//! 1. Contents: both hold the same elements in the same order
//! 2. Structure: `verify()` accepts the tree (balance, ranks, heights,
//!    parent links, cached boundaries)
//! 3. Costs: `concat` reports the height difference it saw before merging

use afl::fuzz;
use avl_list::BalancedList;

/// Operation types the fuzzer can generate
#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    /// Insert one value at a position
    Insert { pos_frac: u8, value: u8 },
    /// Delete the element at a position
    Delete { pos_frac: u8 },
    /// Append a freshly built list of `len` elements
    Concat { len: u8 },
    /// Split at a position and join the pieces back together
    SplitJoin { pos_frac: u8 },
    /// Remove the last element
    PopLast,
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        let (&tag, rest) = bytes.split_first()?;
        match tag % 5 {
            0 if rest.len() >= 2 => {
                let op = FuzzOp::Insert {
                    pos_frac: rest[0],
                    value: rest[1],
                };
                Some((op, &rest[2..]))
            }
            1 if !rest.is_empty() => Some((FuzzOp::Delete { pos_frac: rest[0] }, &rest[1..])),
            2 if !rest.is_empty() => Some((FuzzOp::Concat { len: rest[0] % 64 }, &rest[1..])),
            3 if !rest.is_empty() => Some((FuzzOp::SplitJoin { pos_frac: rest[0] }, &rest[1..])),
            4 => Some((FuzzOp::PopLast, rest)),
            _ => None,
        }
    }
}

/// Scale a byte to a position in `0..=max`.
fn position(pos_frac: u8, max: usize) -> usize {
    (pos_frac as usize * (max + 1) / 256).min(max)
}

fn main() {
    fuzz!(|data: &[u8]| {
        let mut list: BalancedList<u8> = BalancedList::new();
        let mut model: Vec<u8> = Vec::new();
        let mut remaining = data;

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;

            match op {
                FuzzOp::Insert { pos_frac, value } => {
                    let index = position(pos_frac, model.len());
                    list.insert(index, value);
                    model.insert(index, value);
                }

                FuzzOp::Delete { pos_frac } => {
                    if model.is_empty() {
                        assert!(list.delete(0).is_err(), "delete on empty list succeeded");
                    } else {
                        let index = position(pos_frac, model.len() - 1);
                        assert_eq!(list.remove(index), Ok(model.remove(index)));
                    }
                }

                FuzzOp::Concat { len } => {
                    let values: Vec<u8> = (0..len).collect();
                    let other: BalancedList<u8> = values.iter().copied().collect();
                    let expected = (list.height() - other.height()).unsigned_abs() as usize;
                    assert_eq!(list.concat(other), expected, "concat height difference");
                    model.extend(values);
                }

                FuzzOp::SplitJoin { pos_frac } => {
                    if !model.is_empty() {
                        let index = position(pos_frac, model.len() - 1);
                        let whole = std::mem::take(&mut list);
                        let (mut left, value, right) = whole.split(index).unwrap();
                        assert_eq!(value, model[index]);
                        assert_eq!(left.to_vec(), model[..index]);
                        assert_eq!(right.to_vec(), model[index + 1..]);
                        left.verify().unwrap();
                        right.verify().unwrap();
                        left.join(value, right);
                        list = left;
                    }
                }

                FuzzOp::PopLast => {
                    assert_eq!(list.pop_last(), model.pop());
                }
            }

            assert_eq!(list.len(), model.len(), "length mismatch after {op:?}");
            assert_eq!(list.to_vec(), model, "content mismatch after {op:?}");
            if let Err(err) = list.verify() {
                panic!("invariant broken after {op:?}: {err}");
            }
        }
    });
}
