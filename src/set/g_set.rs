//! Grow-only Set (G-Set).
//!
//! The simplest set CRDT: elements may only be added, never removed, so any
//! two histories of adds commute trivially and `merge` is plain set union.
//! Prefer this over [`crate::PNSet`] or [`crate::MCSet`] whenever the
//! application never needs to remove an element.

use std::collections::HashSet;
use std::hash::Hash;

/// A grow-only set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GSet<T>
where
    T: Eq + Hash,
{
    elements: HashSet<T>,
}

impl<T> Default for GSet<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GSet<T>
where
    T: Eq + Hash + Clone,
{
    /// Creates a new, empty grow-only set.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: HashSet::new() }
    }

    /// Returns a new set with `x` added.
    #[must_use]
    pub fn add(&self, x: T) -> Self {
        let mut elements = self.elements.clone();
        elements.insert(x);
        Self { elements }
    }

    /// Adds `x` in place.
    pub fn insert(&mut self, x: T) {
        self.elements.insert(x);
    }

    /// Returns true if `x` is a member.
    #[must_use]
    pub fn contains(&self, x: &T) -> bool {
        self.elements.contains(x)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates over the members.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.iter()
    }

    /// Merges `other` into this set: the least upper bound under subset
    /// ordering, which is simply union.
    pub fn merge(&mut self, other: &Self) {
        self.elements.extend(other.elements.iter().cloned());
    }

    /// Returns a new set that is the merge of this and `other`.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.merge(other);
        result
    }
}

impl<T> FromIterator<T> for GSet<T>
where
    T: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { elements: iter.into_iter().collect() }
    }
}

/// Builds a G-Set with no members.
#[must_use]
pub fn empty_g_set<T: Eq + Hash + Clone>() -> GSet<T> {
    GSet::new()
}

/// Builds a G-Set containing exactly the given elements.
#[must_use]
pub fn g_set_of<T: Eq + Hash + Clone, I: IntoIterator<Item = T>>(items: I) -> GSet<T> {
    items.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_set_is_empty() {
        let s: GSet<i32> = GSet::new();
        assert!(s.is_empty());
    }

    #[test]
    fn add_is_observable() {
        let s = GSet::new().add(1).add(2);
        assert!(s.contains(&1));
        assert!(s.contains(&2));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn merge_is_union() {
        let a = g_set_of([1, 2]);
        let b = g_set_of([2, 3]);
        let m = a.merged(&b);
        assert_eq!(m.len(), 3);
        assert!(m.contains(&1) && m.contains(&2) && m.contains(&3));
    }

    #[test]
    fn merge_is_commutative_associative_idempotent() {
        let a = g_set_of([1, 2]);
        let b = g_set_of([2, 3]);
        let c = g_set_of([4]);

        assert_eq!(a.merged(&b), b.merged(&a));
        assert_eq!(a.merged(&b).merged(&c), a.merged(&b.merged(&c)));
        assert_eq!(a.merged(&a), a);
    }
}
