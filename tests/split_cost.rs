//! Split cost: the joins performed by one split add up to a constant multiple
//! of the tree height, and no single join costs more than the height allows.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use avl_list::{BalancedList, BstList};

const SEED: u64 = 100;

fn build(len: usize, rng: &mut StdRng) -> BalancedList<usize> {
    let mut list = BalancedList::new();
    for i in 0..len {
        let index = rng.gen_range(0..=list.len());
        list.insert(index, i);
    }
    list
}

/// Index of the root's in-order predecessor. It sits at the bottom of the
/// root's left subtree, so the split walks a long path of ancestors.
fn root_predecessor_index(list: &BalancedList<usize>) -> usize {
    let root = (0..list.len())
        .find(|&index| list.depth(index) == Ok(0))
        .unwrap();
    root.saturating_sub(1)
}

// =============================================================================
// Random indices
// =============================================================================

#[test]
fn random_splits_stay_within_height_bound() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for exp in 1..12 {
        let len = 1usize << exp;
        for _ in 0..20 {
            let list = build(len, &mut rng);
            let height = list.height() as usize;
            let index = rng.gen_range(0..len);

            let (left, value, right, cost) = list.split_measured(index).unwrap();
            assert_eq!(left.len(), index);
            assert_eq!(right.len(), len - index - 1);
            assert_eq!(left.len() + right.len() + 1, len, "value {value} lost");

            assert!(cost.count() <= height);
            assert!(
                cost.total() <= 4 * (height + 1),
                "len {len}, index {index}: total {} over height {height}",
                cost.total()
            );
            assert!(cost.max() <= height + 1);
            left.verify().unwrap();
            right.verify().unwrap();
        }
    }
}

#[test]
fn root_predecessor_split_is_logarithmic() {
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    for exp in 2..11 {
        let len = 1usize << exp;
        let list = build(len, &mut rng);
        let height = list.height() as usize;
        let index = root_predecessor_index(&list);

        let (_, _, _, cost) = list.split_measured(index).unwrap();
        assert!(cost.total() <= 4 * (height + 1));
        assert!(cost.mean() <= (height + 1) as f64);
    }
}

#[test]
fn split_cost_is_far_below_quadratic() {
    let mut rng = StdRng::seed_from_u64(SEED + 2);
    let len = 1 << 14;
    let list = build(len, &mut rng);
    let height = list.height() as usize;
    let mut worst = 0;
    let mut pending = vec![list];
    // Keep splitting the halves; every split must respect the bound on its own tree.
    while let Some(list) = pending.pop() {
        if list.len() < 2 {
            continue;
        }
        let tree_height = list.height() as usize;
        let index = rng.gen_range(0..list.len());
        let (left, _, right, cost) = list.split_measured(index).unwrap();
        assert!(cost.total() <= 4 * (tree_height + 1));
        worst = worst.max(cost.total());
        pending.push(left);
        pending.push(right);
    }
    assert!(worst <= 4 * (height + 1));
    assert!(worst < height * height);
}

// =============================================================================
// Unbalanced baseline
// =============================================================================

#[test]
fn unbalanced_split_joins_once_per_ancestor() {
    let mut list: BstList<usize> = BstList::default();
    for i in 0..500 {
        list.insert(i / 2, i);
    }
    for index in [0, 1, 100, 250, 499] {
        // Clones are rebuilt by appending, so measure the depth on the copy.
        let copy = list.clone();
        let depth = copy.depth(index).unwrap();
        let (left, _, right, cost) = copy.split_measured(index).unwrap();
        assert_eq!(cost.count(), depth);
        assert_eq!(left.len(), index);
        assert_eq!(right.len(), 499 - index);
        left.verify().unwrap();
        right.verify().unwrap();
    }
}
