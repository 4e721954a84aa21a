//! Max-Change Set (MC-Set).
//!
//! Tracks a mutation counter per element instead of a single presence
//! flag: `present(x)` holds iff the counter for `x` exists and is even.
//! `add` and `remove` each increment the counter, but only when doing so
//! would actually flip presence (`add` is a no-op on an already-present
//! element, `remove` is a no-op on an already-absent one) — this is what
//! keeps the type usable as a set rather than a raw counter. Concurrent
//! add/remove resolves toward whichever replica mutated the element more
//! times, since `merge` takes the per-key maximum.

use std::collections::HashMap;
use std::hash::Hash;

/// A Max-Change Set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MCSet<T>
where
    T: Eq + Hash,
{
    counters: HashMap<T, u32>,
}

impl<T> Default for MCSet<T>
where
    T: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MCSet<T>
where
    T: Eq + Hash + Clone,
{
    /// Creates a new, empty Max-Change Set.
    #[must_use]
    pub fn new() -> Self {
        Self { counters: HashMap::new() }
    }

    /// Returns true if `x`'s counter exists and is even.
    #[must_use]
    pub fn contains(&self, x: &T) -> bool {
        self.counters.get(x).is_some_and(|c| c % 2 == 0)
    }

    /// Adds `x`: increments its counter, but only if `x` is currently
    /// absent. A no-op on an already-present element.
    pub fn add(&mut self, x: T) {
        if self.contains(&x) {
            return;
        }
        // previous defaults to -1 when the key has never been touched, so
        // the first increment lands on 0 (even => present).
        let previous = self.counters.get(&x).copied().map_or(-1i64, i64::from);
        self.counters.insert(x, (previous + 1) as u32);
    }

    /// Removes `x`: increments its counter, but only if `x` is currently
    /// present. A no-op on an already-absent element.
    pub fn remove(&mut self, x: T) {
        if !self.contains(&x) {
            return;
        }
        let previous = *self.counters.get(&x).expect("contains() implies an entry exists");
        self.counters.insert(x, previous + 1);
    }

    /// Number of currently present elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counters.values().filter(|&&c| c % 2 == 0).count()
    }

    /// True if no element is currently present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the currently present elements.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.counters.iter().filter(|(_, &c)| c % 2 == 0).map(|(x, _)| x)
    }

    /// Returns the raw mutation counter for `x`, if it has ever been
    /// touched.
    #[must_use]
    pub fn counter(&self, x: &T) -> Option<u32> {
        self.counters.get(x).copied()
    }

    /// Merges `other` into this set: per key, the max of the two counters
    /// (treating an absent counter as 0, which never changes the result
    /// since real counters are never negative).
    pub fn merge(&mut self, other: &Self) {
        for (x, &other_count) in &other.counters {
            let entry = self.counters.entry(x.clone()).or_insert(0);
            *entry = (*entry).max(other_count);
        }
    }

    /// Returns a new set that is the merge of this and `other`.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.merge(other);
        result
    }
}

/// Builds an MC-Set with no members.
#[must_use]
pub fn empty_mc_set<T: Eq + Hash + Clone>() -> MCSet<T> {
    MCSet::new()
}

/// Builds an MC-Set with each of the given elements added once.
#[must_use]
pub fn mc_set_of<T: Eq + Hash + Clone, I: IntoIterator<Item = T>>(items: I) -> MCSet<T> {
    let mut set = MCSet::new();
    for item in items {
        set.add(item);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_makes_element_present() {
        let mut s = MCSet::new();
        s.add("x");
        assert!(s.contains(&"x"));
        assert_eq!(s.counter(&"x"), Some(0));
    }

    #[test]
    fn add_twice_is_idempotent() {
        let mut s = MCSet::new();
        s.add("x");
        s.add("x");
        assert_eq!(s.counter(&"x"), Some(0), "second add is a no-op while present");
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut s: MCSet<&str> = MCSet::new();
        s.remove("x");
        assert_eq!(s.counter(&"x"), None);
    }

    #[test]
    fn add_remove_add_cycles_counter() {
        let mut s = MCSet::new();
        s.add("x");
        assert_eq!(s.counter(&"x"), Some(0));
        s.remove("x");
        assert_eq!(s.counter(&"x"), Some(1));
        assert!(!s.contains(&"x"));
        s.add("x");
        assert_eq!(s.counter(&"x"), Some(2));
        assert!(s.contains(&"x"));
    }

    #[test]
    fn merge_takes_max_counter_so_removal_wins() {
        let mut s1 = MCSet::new();
        s1.add("x");
        s1.remove("x");

        let mut s2 = MCSet::new();
        s2.add("x");

        let merged = s1.merged(&s2);
        assert_eq!(merged.counter(&"x"), Some(1));
        assert!(!merged.contains(&"x"));
    }

    #[test]
    fn merge_takes_max_counter_so_more_active_replica_wins() {
        let mut s1 = MCSet::new();
        s1.add("x");
        s1.remove("x");
        s1.add("x");
        assert_eq!(s1.counter(&"x"), Some(2));

        let mut s2 = MCSet::new();
        s2.add("x");
        s2.remove("x");
        assert_eq!(s2.counter(&"x"), Some(1));

        let merged = s1.merged(&s2);
        assert_eq!(merged.counter(&"x"), Some(2));
        assert!(merged.contains(&"x"));
    }

    #[test]
    fn merge_is_commutative_associative_idempotent() {
        let mut a = MCSet::new();
        a.add("x");
        a.remove("x");

        let mut b = MCSet::new();
        b.add("x");
        b.add("y");

        let mut c = MCSet::new();
        c.add("z");

        assert_eq!(a.merged(&b), b.merged(&a));
        assert_eq!(a.merged(&b).merged(&c), a.merged(&b.merged(&c)));
        assert_eq!(a.merged(&a), a);
    }

    #[test]
    fn merge_with_untouched_key_is_identity() {
        let mut a = MCSet::new();
        a.add("x");

        let b: MCSet<&str> = MCSet::new();
        let merged = a.merged(&b);
        assert_eq!(merged, a);
    }
}
