//! avl-list - a positional list on a rank-augmented AVL tree.
//!
//! Elements are addressed by position only. Each tree node stores the size of
//! its subtree, which gives O(log n) indexing, insertion and deletion, and the
//! tree can be joined and split in O(log n) as well.
//!
//! # Quick Start
//!
//! ```
//! use avl_list::BalancedList;
//!
//! let mut list = BalancedList::new();
//! list.insert(0, "a");
//! list.insert(1, "b");
//! list.insert(2, "d");
//! list.insert(2, "c");
//! assert_eq!(list.to_vec(), vec!["a", "b", "c", "d"]);
//!
//! let (left, value, right) = list.split(1).unwrap();
//! assert_eq!(left.to_vec(), vec!["a"]);
//! assert_eq!(value, "b");
//! assert_eq!(right.to_vec(), vec!["c", "d"]);
//!
//! let mut joined = left;
//! joined.join(value, right);
//! assert_eq!(joined.len(), 4);
//! ```

pub mod balance;
pub mod collection;
pub mod error;
mod iter;
mod join;
mod list;
mod node;

pub use balance::{Avl, Balance, Unbalanced};
pub use collection::Collection;
pub use error::{InvariantError, ListError};
pub use iter::Iter;
pub use join::SplitCost;
pub use list::{BalancedList, BstList};
