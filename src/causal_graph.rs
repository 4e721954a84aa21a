//! Causal Graph: per-site append-only "yarns" of dependency-carrying atoms.
//!
//! Each site owns a [`Yarn`] — an append-only log identifying its own
//! operations by `(site, index)` and recording, for each one, the set of
//! other operations it causally depends on. A [`CausalGraph`] is simply the
//! map from site to yarn. Unlike [`crate::sequence::WSeq`], there is no
//! integration algorithm here: yarns merge by straightforward
//! deduplicate-and-sort, and the graph merges yarn-by-yarn.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

use crate::error::{YarnError, YarnResult};

/// An immutable unit of causal history: an operation, its identifier, and
/// the set of operations it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atom<O, S> {
    /// The opaque operation payload.
    pub op: O,
    /// This atom's identity: the owning site and its index within that
    /// site's yarn.
    pub id: (S, u32),
    /// Identifiers of atoms this one causally depends on.
    pub deps: std::collections::HashSet<(S, u32)>,
}

/// An append-only, single-site sequence of atoms.
///
/// `index` values within a yarn are always `0..len` without gaps — until
/// [`Self::remove_by_id`] is used, which is the one sanctioned exception to
/// append-only semantics and may leave gaps behind (see its docs).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Yarn<O, S> {
    site: S,
    atoms: Vec<Atom<O, S>>,
}

impl<O, S> Yarn<O, S>
where
    S: Clone + Eq + Hash,
{
    /// Creates a new, empty yarn for `site`.
    #[must_use]
    pub fn new(site: S) -> Self {
        Self { site, atoms: Vec::new() }
    }

    /// The site this yarn belongs to.
    #[must_use]
    pub fn site(&self) -> &S {
        &self.site
    }

    /// Number of atoms currently in the yarn.
    #[must_use]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// True if the yarn has no atoms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Appends `op` with the given dependency set, returning its new
    /// identifier `(site, next_index)`.
    pub fn insert(&mut self, op: O, deps: std::collections::HashSet<(S, u32)>) -> (S, u32) {
        let index = self.atoms.len() as u32;
        let id = (self.site.clone(), index);
        self.atoms.push(Atom { op, id: id.clone(), deps });
        id
    }

    /// Returns the atom at `index`, if any.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<&Atom<O, S>> {
        self.atoms.get(index as usize)
    }

    /// Iterates over the atoms in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Atom<O, S>> {
        self.atoms.iter()
    }

    /// A checked cursor whose `next` raises [`YarnError::EmptyIterator`]
    /// once advanced past the end, rather than returning `None` — kept for
    /// source-faithful parity with the original collection-style iterator.
    /// Prefer [`Self::iter`] for ordinary traversal.
    #[must_use]
    pub fn cursor(&self) -> YarnCursor<'_, O, S> {
        YarnCursor { yarn: self, pos: 0 }
    }

    /// Merges `other` into this yarn.
    ///
    /// Both yarns must belong to the same site. The result is the union of
    /// both atom lists, deduplicated by identifier and sorted by index.
    pub fn merge(&mut self, other: &Self) -> YarnResult<()>
    where
        O: Clone,
    {
        if self.site != other.site {
            return Err(YarnError::SiteMismatch);
        }

        for atom in &other.atoms {
            if !self.atoms.iter().any(|a| a.id == atom.id) {
                self.atoms.push(atom.clone());
            }
        }
        self.atoms.sort_by_key(|a| a.id.1);
        debug!(site_len = self.atoms.len(), "merged yarn");
        Ok(())
    }

    /// Destructive local garbage-collection utility: removes the atom with
    /// `id` (if present) and scrubs `id` from every remaining atom's
    /// `deps`.
    ///
    /// This is the one operation that breaks append-only semantics — the
    /// resulting `index` sequence may have gaps. It exists for local GC
    /// only, not for general mutation (see [`Self::clear`] and
    /// [`Self::retain_all`], which remain unsupported).
    pub fn remove_by_id(&mut self, id: &(S, u32)) {
        self.atoms.retain(|a| &a.id != id);
        for atom in &mut self.atoms {
            atom.deps.remove(id);
        }
    }

    /// Unsupported on an append-only yarn; use [`Self::remove_by_id`] for
    /// the sanctioned, explicit local-GC removal instead.
    pub fn clear(&self) -> YarnResult<()> {
        Err(YarnError::UnsupportedMutation { op: "clear" })
    }

    /// Unsupported on an append-only yarn; use [`Self::remove_by_id`] for
    /// the sanctioned, explicit local-GC removal instead.
    pub fn retain_all(&self) -> YarnResult<()> {
        Err(YarnError::UnsupportedMutation { op: "retainAll" })
    }
}

/// A checked, source-faithful iterator over a [`Yarn`]'s atoms.
#[derive(Debug)]
pub struct YarnCursor<'a, O, S> {
    yarn: &'a Yarn<O, S>,
    pos: usize,
}

impl<'a, O, S> YarnCursor<'a, O, S> {
    /// Returns the next atom, or `Err(EmptyIterator)` if the cursor has
    /// already reached the end of the yarn.
    pub fn next(&mut self) -> YarnResult<&'a Atom<O, S>> {
        match self.yarn.atoms.get(self.pos) {
            Some(atom) => {
                self.pos += 1;
                Ok(atom)
            }
            None => Err(YarnError::EmptyIterator),
        }
    }
}

/// A mapping from site to that site's yarn.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CausalGraph<O, S>
where
    S: Eq + Hash,
{
    yarns: HashMap<S, Yarn<O, S>>,
}

impl<O, S> Default for CausalGraph<O, S>
where
    S: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<O, S> CausalGraph<O, S>
where
    S: Clone + Eq + Hash,
{
    /// Creates a new, empty causal graph.
    #[must_use]
    pub fn new() -> Self {
        Self { yarns: HashMap::new() }
    }

    /// Returns the yarn for `site`, creating an empty one on demand.
    pub fn get(&mut self, site: S) -> &mut Yarn<O, S> {
        self.yarns.entry(site.clone()).or_insert_with(|| Yarn::new(site))
    }

    /// Returns the yarn for `site` without creating one.
    #[must_use]
    pub fn get_existing(&self, site: &S) -> Option<&Yarn<O, S>> {
        self.yarns.get(site)
    }

    /// The set of sites with a yarn in this graph.
    pub fn sites(&self) -> impl Iterator<Item = &S> {
        self.yarns.keys()
    }

    /// Merges `other` into this graph.
    ///
    /// The resulting set of sites is the union of both graphs' sites: a
    /// site present in only one side is propagated unchanged, and a site
    /// present in both has its yarns merged. A site present on only one
    /// side is never dropped, even though it has nothing to merge with.
    pub fn merge(&mut self, other: &Self) -> YarnResult<()>
    where
        O: Clone,
    {
        for (site, other_yarn) in &other.yarns {
            match self.yarns.get_mut(site) {
                Some(existing) => existing.merge(other_yarn)?,
                None => {
                    self.yarns.insert(site.clone(), other_yarn.clone());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn insert_returns_sequential_ids() {
        let mut yarn: Yarn<&str, u8> = Yarn::new(1);
        let id0 = yarn.insert("a", HashSet::new());
        let id1 = yarn.insert("b", HashSet::new());
        assert_eq!(id0, (1, 0));
        assert_eq!(id1, (1, 1));
        assert_eq!(yarn.len(), 2);
    }

    #[test]
    fn indices_are_gapless_and_ascending() {
        let mut yarn: Yarn<&str, u8> = Yarn::new(1);
        for i in 0..5 {
            yarn.insert("op", HashSet::new());
            assert_eq!(yarn.get(i).unwrap().id.1, i);
        }
    }

    #[test]
    fn merge_rejects_different_sites() {
        let mut a: Yarn<&str, u8> = Yarn::new(1);
        let b: Yarn<&str, u8> = Yarn::new(2);
        assert_eq!(a.merge(&b), Err(YarnError::SiteMismatch));
    }

    #[test]
    fn merge_deduplicates_and_sorts() {
        let mut a: Yarn<&str, u8> = Yarn::new(1);
        a.insert("x", HashSet::new());
        a.insert("y", HashSet::new());

        let mut b: Yarn<&str, u8> = Yarn::new(1);
        b.insert("x", HashSet::new());
        b.insert("z", HashSet::new());

        a.merge(&b).unwrap();
        assert_eq!(a.len(), 3);
        let indices: Vec<u32> = a.iter().map(|atom| atom.id.1).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn cursor_errors_past_the_end_of_empty_yarn() {
        let yarn: Yarn<&str, u8> = Yarn::new(1);
        let mut cursor = yarn.cursor();
        assert_eq!(cursor.next(), Err(YarnError::EmptyIterator));
    }

    #[test]
    fn remove_by_id_scrubs_dependents() {
        let mut yarn: Yarn<&str, u8> = Yarn::new(1);
        let id0 = yarn.insert("a", HashSet::new());
        let mut deps = HashSet::new();
        deps.insert(id0.clone());
        let id1 = yarn.insert("b", deps);

        yarn.remove_by_id(&id0);
        assert_eq!(yarn.len(), 1);
        assert!(yarn.get(1).is_none());
        let remaining = yarn.iter().find(|a| a.id == id1).unwrap();
        assert!(!remaining.deps.contains(&id0));
    }

    #[test]
    fn clear_and_retain_all_are_unsupported() {
        let yarn: Yarn<&str, u8> = Yarn::new(1);
        assert_eq!(yarn.clear(), Err(YarnError::UnsupportedMutation { op: "clear" }));
        assert_eq!(yarn.retain_all(), Err(YarnError::UnsupportedMutation { op: "retainAll" }));
    }

    #[test]
    fn graph_get_creates_on_demand() {
        let mut graph: CausalGraph<&str, u8> = CausalGraph::new();
        graph.get(1).insert("a", HashSet::new());
        assert_eq!(graph.get_existing(&1).unwrap().len(), 1);
        assert!(graph.get_existing(&2).is_none());
    }

    #[test]
    fn graph_merge_keeps_single_side_yarns() {
        let mut a: CausalGraph<&str, u8> = CausalGraph::new();
        a.get(1).insert("a", HashSet::new());

        let mut b: CausalGraph<&str, u8> = CausalGraph::new();
        b.get(2).insert("b", HashSet::new());

        a.merge(&b).unwrap();
        assert!(a.get_existing(&1).is_some(), "site present only in self survives");
        assert!(a.get_existing(&2).is_some(), "site present only in other is propagated");
    }

    #[test]
    fn graph_merge_combines_shared_site_yarns() {
        let mut a: CausalGraph<&str, u8> = CausalGraph::new();
        a.get(1).insert("x", HashSet::new());

        let mut b: CausalGraph<&str, u8> = CausalGraph::new();
        b.get(1).insert("y", HashSet::new());

        a.merge(&b).unwrap();
        assert_eq!(a.get_existing(&1).unwrap().len(), 2);
    }
}
