//! Tests for the public list API: positional edits, boundary caches,
//! concat and split.

use avl_list::{BalancedList, BstList, ListError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

const LARGE_LIST_SIZE: usize = 500;

// =============================================================================
// Fixtures
// =============================================================================

fn small_list() -> BalancedList<String> {
    let mut list = BalancedList::new();
    for (i, c) in ["a", "b", "c", "d"].iter().enumerate() {
        list.insert(i, c.to_string());
    }
    list
}

fn large_list() -> BalancedList<String> {
    let mut list = BalancedList::new();
    for i in 0..LARGE_LIST_SIZE {
        list.insert(i, i.to_string());
    }
    list
}

fn strings(range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|i| i.to_string()).collect()
}

fn s(value: &str) -> String {
    value.to_string()
}

// =============================================================================
// Insert / retrieve
// =============================================================================

#[test]
fn empty_list_has_no_elements() {
    let list: BalancedList<String> = BalancedList::new();
    assert!(list.is_empty());
    assert_eq!(list.len(), 0);
    assert_eq!(list.to_vec(), Vec::<String>::new());
}

#[test]
fn insert_sequentially() {
    let list = small_list();
    assert_eq!(list.to_vec(), vec![s("a"), s("b"), s("c"), s("d")]);
    assert_eq!(list.len(), 4);
    list.verify().unwrap();
}

#[test]
fn insert_at_too_large_index_is_noop() {
    let mut list: BalancedList<String> = BalancedList::new();
    assert_eq!(list.insert(11, s("a")), 0);
    assert!(list.is_empty());

    let mut list = small_list();
    assert_eq!(list.insert(5, s("x")), 0);
    assert_eq!(list.to_vec(), vec![s("a"), s("b"), s("c"), s("d")]);
}

#[test]
fn retrieve_items_from_large_list() {
    let list = large_list();
    for i in 0..LARGE_LIST_SIZE {
        assert_eq!(list.retrieve(i), Some(&i.to_string()));
    }
    assert_eq!(list.retrieve(LARGE_LIST_SIZE), None);
    list.verify().unwrap();
}

#[test]
fn insert_in_the_middle_of_small_list() {
    let mut list = small_list();
    list.insert(1, s("new_item"));
    assert_eq!(
        list.to_vec(),
        vec![s("a"), s("new_item"), s("b"), s("c"), s("d")]
    );
}

#[test]
fn insert_in_the_middle_of_large_list() {
    let mut list = large_list();
    list.insert(420, s("new_item"));
    for i in 0..420 {
        assert_eq!(list.retrieve(i), Some(&i.to_string()));
    }
    assert_eq!(list.retrieve(420), Some(&s("new_item")));
    for i in 421..=LARGE_LIST_SIZE {
        assert_eq!(list.retrieve(i), Some(&(i - 1).to_string()));
    }
    list.verify().unwrap();
}

#[test]
fn retrieve_mut_edits_in_place() {
    let mut list = small_list();
    if let Some(value) = list.retrieve_mut(2) {
        value.push('!');
    }
    assert_eq!(list.retrieve(2), Some(&s("c!")));
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn delete_from_small_list() {
    let mut list = small_list();
    list.delete(2).unwrap();
    assert_eq!(list.to_vec(), vec![s("a"), s("b"), s("d")]);
    assert_eq!(list.first(), Some(&s("a")));
    assert_eq!(list.last(), Some(&s("d")));
    list.verify().unwrap();
}

#[test]
fn delete_from_large_list() {
    let mut list = large_list();
    list.delete(278).unwrap();
    assert_eq!(list.len(), LARGE_LIST_SIZE - 1);
    for i in 0..278 {
        assert_eq!(list.retrieve(i), Some(&i.to_string()));
    }
    for i in 278..LARGE_LIST_SIZE - 1 {
        assert_eq!(list.retrieve(i), Some(&(i + 1).to_string()));
    }
    list.verify().unwrap();
}

#[test]
fn delete_only_element_then_reuse() {
    let mut list = BalancedList::new();
    list.insert(0, s("a"));
    assert_eq!(list.delete(0), Ok(0));
    assert!(list.is_empty());
    assert_eq!(list.first(), None);
    list.insert(0, s("b"));
    assert_eq!(list.retrieve(0), Some(&s("b")));
    assert_eq!(list.first(), list.last());
}

#[test]
fn delete_out_of_range_is_an_error() {
    let mut list = small_list();
    assert_eq!(
        list.delete(4),
        Err(ListError::IndexOutOfRange { index: 4, len: 4 })
    );
    let mut empty: BalancedList<String> = BalancedList::new();
    assert!(empty.delete(0).is_err());
    assert_eq!(list.len(), 4);
}

#[test]
fn remove_returns_value() {
    let mut list = small_list();
    assert_eq!(list.remove(1), Ok(s("b")));
    assert_eq!(list.to_vec(), vec![s("a"), s("c"), s("d")]);
}

// =============================================================================
// Boundary caches
// =============================================================================

#[test]
fn first_and_last_follow_inserts() {
    let mut list = BalancedList::new();
    assert_eq!(list.first(), None);
    assert_eq!(list.last(), None);

    list.insert(0, s("a"));
    assert_eq!(list.first(), Some(&s("a")));
    assert_eq!(list.last(), Some(&s("a")));

    list.insert(1, s("b"));
    assert_eq!(list.first(), Some(&s("a")));
    assert_eq!(list.last(), Some(&s("b")));

    list.insert(0, s("c"));
    assert_eq!(list.first(), Some(&s("c")));
    assert_eq!(list.last(), Some(&s("b")));
}

#[test]
fn first_and_last_after_deleting_boundaries() {
    let mut list = small_list();
    list.delete(0).unwrap();
    assert_eq!(list.first(), Some(&s("b")));
    list.delete(2).unwrap();
    assert_eq!(list.last(), Some(&s("c")));
    list.verify().unwrap();
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn search_finds_first_match() {
    let mut list = small_list();
    list.insert(4, s("b"));
    assert_eq!(list.search(&s("b")), Some(1));
    assert_eq!(list.search(&s("d")), Some(3));
    assert_eq!(list.search(&s("zzz")), None);
}

// =============================================================================
// Concat
// =============================================================================

#[test]
fn concat_two_lists() {
    let _trace = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .set_default();

    let mut list = small_list();
    let mut other = BalancedList::new();
    for (i, c) in ["e", "f", "g", "h"].iter().enumerate() {
        other.insert(i, c.to_string());
    }
    assert_eq!(list.concat(other), 0);

    let expected: Vec<String> = ["a", "b", "c", "d", "e", "f", "g", "h"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(list.to_vec(), expected);
    assert_eq!(list.last(), Some(&s("h")));
    list.verify().unwrap();
}

#[test]
fn concat_empty_list_changes_nothing() {
    let mut list = large_list();
    let height = list.height();
    let (first, last) = (list.first().cloned(), list.last().cloned());

    let diff = list.concat(BalancedList::new());
    assert_eq!(diff, (height + 1) as usize);
    assert_eq!(list.first().cloned(), first);
    assert_eq!(list.last().cloned(), last);
    assert_eq!(list.to_vec(), strings(0..LARGE_LIST_SIZE));
}

#[test]
fn concat_onto_empty_list_adopts_other() {
    let mut list = BalancedList::new();
    let other = small_list();
    let height = other.height();
    assert_eq!(list.concat(other), (height + 1) as usize);
    assert_eq!(list.first(), Some(&s("a")));
    assert_eq!(list.last(), Some(&s("d")));
    list.verify().unwrap();
}

#[test]
fn concat_singleton_changes_only_last() {
    let mut list = large_list();
    let mut singleton = BalancedList::new();
    singleton.insert(0, s("NEW_ITEM"));

    list.concat(singleton);
    assert_eq!(list.first(), Some(&s("0")));
    assert_eq!(list.last(), Some(&s("NEW_ITEM")));
    assert_eq!(list.len(), LARGE_LIST_SIZE + 1);
    list.verify().unwrap();
}

#[test]
fn concat_reports_height_difference() {
    let mut small: BalancedList<usize> = (0..3).collect();
    let large: BalancedList<usize> = (3..300).collect();
    let expected = (small.height() - large.height()).unsigned_abs() as usize;
    assert_eq!(small.concat(large), expected);
    assert_eq!(small.to_vec(), (0..300).collect::<Vec<_>>());
    small.verify().unwrap();
}

// =============================================================================
// Split
// =============================================================================

#[test]
fn split_large_list() {
    let list = large_list();
    let (left, value, right) = list.split(278).unwrap();
    assert_eq!(left.len(), 278);
    assert_eq!(left.to_vec(), strings(0..278));
    assert_eq!(value, s("278"));
    assert_eq!(right.len(), 221);
    assert_eq!(right.to_vec(), strings(279..LARGE_LIST_SIZE));
    left.verify().unwrap();
    right.verify().unwrap();
}

#[test]
fn split_at_boundaries() {
    let (left, value, right) = large_list().split(0).unwrap();
    assert!(left.is_empty());
    assert_eq!(value, s("0"));
    assert_eq!(right.first(), Some(&s("1")));

    let (left, value, right) = large_list().split(LARGE_LIST_SIZE - 1).unwrap();
    assert_eq!(left.last(), Some(&s("498")));
    assert_eq!(value, s("499"));
    assert!(right.is_empty());
}

#[test]
fn split_then_concat_restores() {
    for index in [0, 1, 120, 250, 499] {
        let (mut left, value, right) = large_list().split(index).unwrap();
        let mut singleton = BalancedList::new();
        singleton.insert(0, value);
        left.concat(singleton);
        left.concat(right);
        assert_eq!(left.to_vec(), strings(0..LARGE_LIST_SIZE));
        left.verify().unwrap();
    }
}

#[test]
fn split_results_are_independent() {
    let (mut left, _, mut right) = large_list().split(100).unwrap();
    left.insert(0, s("front"));
    right.delete(0).unwrap();
    assert_eq!(left.first(), Some(&s("front")));
    assert_eq!(left.len(), 101);
    assert_eq!(right.first(), Some(&s("102")));
    left.verify().unwrap();
    right.verify().unwrap();
}

// =============================================================================
// Unbalanced baseline
// =============================================================================

#[test]
fn baseline_list_has_same_contents() {
    let mut balanced: BalancedList<usize> = BalancedList::new();
    let mut baseline: BstList<usize> = BstList::default();
    for i in 0..2000 {
        balanced.insert(0, i);
        baseline.insert(0, i);
    }
    assert_eq!(balanced.to_vec(), baseline.to_vec());
    assert_eq!(baseline.height(), 1999);
    assert!(balanced.height() <= 15);
    baseline.verify().unwrap();

    // Deep trees must not blow the stack on split or drop.
    let (left, value, right) = baseline.split(1000).unwrap();
    assert_eq!(value, 999);
    assert_eq!(left.len() + right.len(), 1999);
}
