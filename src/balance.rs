//! Rebalancing policies.
//!
//! The policy is a type parameter of [`BalancedList`](crate::BalancedList), so the
//! choice costs nothing at runtime. [`Avl`] is the default. [`Unbalanced`] keeps
//! rank and height up to date but never rotates, which makes it a plain rank
//! tree whose height depends on insertion order. It exists to measure what the
//! rotations buy.

mod sealed {
    pub trait Sealed {}
}

/// A rebalancing policy for [`BalancedList`](crate::BalancedList).
pub trait Balance: sealed::Sealed {
    /// Whether fixup performs rotations.
    const ROTATES: bool;
    /// Short name used in reports.
    const NAME: &'static str;
}

/// Height-balanced: every real node keeps `|balance factor| <= 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Avl;

/// No rotations. Positional operations degrade to O(height).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unbalanced;

impl sealed::Sealed for Avl {}
impl sealed::Sealed for Unbalanced {}

impl Balance for Avl {
    const ROTATES: bool = true;
    const NAME: &'static str = "avl";
}

impl Balance for Unbalanced {
    const ROTATES: bool = false;
    const NAME: &'static str = "unbalanced";
}
