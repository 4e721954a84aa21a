//! Positive-Negative Set (PN-Set).
//!
//! Tracks membership with a pair of grow-only sets: `positive` records
//! every element ever added, `negative` records every element ever
//! removed. An element is a conventional member iff it's in `positive` but
//! not in `negative`; `merge` is componentwise union of both sets, which
//! keeps the whole structure a join-semilattice even though plain set
//! membership is not.
//!
//! # Source-faithful quirks
//!
//! This type mirrors the upstream PN-Set's `size`, `is_empty`, and
//! iteration exactly as specified, which do **not** match the conventional
//! "present = positive \ negative" view (see [`Self::present`] for that):
//!
//! - [`Self::size`] is `|positive| − |positive ∪ negative|`, not
//!   `|positive \ negative|`.
//! - [`Self::is_empty`] holds iff `positive ∪ negative == positive`, i.e.
//!   iff `negative` is a subset of `positive` — not iff there are no
//!   present members.
//! - [`Self::iter`] yields `positive \ (positive ∪ negative)`, which is
//!   always empty.
//!
//! These are deliberately reproduced rather than "fixed": an implementer
//! who wants the intuitive view should use [`Self::present`] /
//! [`Self::contains`] instead.

use std::collections::HashSet;
use std::hash::Hash;

/// A Positive-Negative Set, source-faithful to its upstream quirks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PNSet<T>
where
    T: Eq + Hash,
{
    positive: HashSet<T>,
    negative: HashSet<T>,
}

impl<T> Default for PNSet<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PNSet<T>
where
    T: Eq + Hash + Clone,
{
    /// Creates a new, empty PN-Set.
    #[must_use]
    pub fn new() -> Self {
        Self { positive: HashSet::new(), negative: HashSet::new() }
    }

    /// Returns a new set with `x` added (grows `positive`).
    #[must_use]
    pub fn add(&self, x: T) -> Self {
        let mut result = self.clone();
        result.positive.insert(x);
        result
    }

    /// Returns a new set with `x` removed (grows `negative`).
    #[must_use]
    pub fn remove(&self, x: T) -> Self {
        let mut result = self.clone();
        result.negative.insert(x);
        result
    }

    /// Adds `x` in place.
    pub fn insert(&mut self, x: T) {
        self.positive.insert(x);
    }

    /// Removes `x` in place (adds it to `negative`).
    pub fn delete(&mut self, x: T) {
        self.negative.insert(x);
    }

    /// Conventional membership test: `x ∈ positive ∧ x ∉ negative`.
    #[must_use]
    pub fn contains(&self, x: &T) -> bool {
        self.positive.contains(x) && !self.negative.contains(x)
    }

    /// Source-faithful size: `|positive| − |positive ∪ negative|`.
    ///
    /// See the module docs for why this differs from a conventional count
    /// of present members.
    #[must_use]
    pub fn size(&self) -> i64 {
        let union_len = self.positive.union(&self.negative).count();
        self.positive.len() as i64 - union_len as i64
    }

    /// Source-faithful emptiness check: holds iff `negative ⊆ positive`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let union: HashSet<&T> = self.positive.iter().chain(self.negative.iter()).collect();
        union.len() == self.positive.len()
    }

    /// Source-faithful iteration: `positive \ (positive ∪ negative)`,
    /// which is always empty. Use [`Self::present`] for actual members.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.positive.iter().filter(|x| {
            let in_union = self.positive.contains(*x) || self.negative.contains(*x);
            !in_union
        })
    }

    /// The recommended, intuitive view: `positive \ negative`.
    #[must_use]
    pub fn present(&self) -> HashSet<T> {
        self.positive.difference(&self.negative).cloned().collect()
    }

    /// Merges `other` into this set: componentwise union of `positive` and
    /// `negative`.
    pub fn merge(&mut self, other: &Self) {
        self.positive.extend(other.positive.iter().cloned());
        self.negative.extend(other.negative.iter().cloned());
    }

    /// Returns a new set that is the merge of this and `other`.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.merge(other);
        result
    }
}

/// Builds a PN-Set with no members.
#[must_use]
pub fn empty_pn_set<T: Eq + Hash + Clone>() -> PNSet<T> {
    PNSet::new()
}

/// Builds a PN-Set with the given elements added (none removed).
#[must_use]
pub fn pn_set_of<T: Eq + Hash + Clone, I: IntoIterator<Item = T>>(items: I) -> PNSet<T> {
    let mut set = PNSet::new();
    for item in items {
        set.insert(item);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_contains() {
        let s = PNSet::new().add("alice");
        assert!(s.contains(&"alice"));
    }

    #[test]
    fn remove_after_add_hides_member() {
        let s = PNSet::new().add("bob").remove("bob");
        assert!(!s.contains(&"bob"));
        assert!(s.present().is_empty());
    }

    #[test]
    fn concurrent_add_and_remove_across_replicas_converges_on_removal() {
        let mut s1 = PNSet::new();
        s1.insert("Alice");
        s1.insert("Bob");
        s1.delete("Bob");

        let mut s2 = PNSet::new();
        s2.insert("Bob");
        s2.insert("Charlie");

        let merged = s1.merged(&s2);
        let present = merged.present();
        assert_eq!(present.len(), 2);
        assert!(present.contains("Alice"));
        assert!(present.contains("Charlie"));
        assert!(!present.contains("Bob"));
    }

    #[test]
    fn source_faithful_iteration_is_always_empty() {
        let s = PNSet::new().add(1).add(2);
        assert_eq!(s.iter().count(), 0);
    }

    #[test]
    fn source_faithful_size_quirk() {
        let s = PNSet::new().add(1).add(2);
        // union == positive here (nothing removed), so size == 0 even
        // though two elements are conventionally present.
        assert_eq!(s.size(), 0);
        assert_eq!(s.present().len(), 2);
    }

    #[test]
    fn source_faithful_is_empty_quirk() {
        let s = PNSet::new().add(1).remove(2); // negative has an element never added
        assert!(!s.is_empty(), "negative isn't a subset of positive");

        let t = PNSet::new().add(1).remove(1);
        assert!(t.is_empty(), "negative ⊆ positive, despite present() being empty too");
    }

    #[test]
    fn merge_is_commutative_associative_idempotent() {
        let a = PNSet::new().add(1).remove(2);
        let b = PNSet::new().add(2).add(3);
        let c = PNSet::new().remove(1);

        assert_eq!(a.merged(&b), b.merged(&a));
        assert_eq!(a.merged(&b).merged(&c), a.merged(&b.merged(&c)));
        assert_eq!(a.merged(&a), a);
    }
}
