//! The WOOT sequence engine.
//!
//! A replica-local, ordered, tombstoned list that supports commutative,
//! idempotent, causality-respecting insert and delete operations across
//! independent sites, using the WithOut Operational Transform (WOOT)
//! algorithm: concurrent inserts between the same pair of neighbours are
//! resolved by a recursive ordering rule over stable element identifiers,
//! and operations whose causal prerequisites haven't arrived yet are held
//! in a pending queue rather than rejected.
//!
//! This module is the hard part of the crate (see the crate-level docs):
//! everything else here is either a simpler lattice-merge CRDT or a
//! dependency-tracking data structure, but the sequence must deterministically
//! reconstruct the same visible order on every replica regardless of delivery
//! order.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::element::Element;
use crate::error::{SequenceError, SequenceResult};
use crate::identifier::ID;
use crate::op::Op;
use crate::util::Either;

/// A Replicated WOOT sequence.
///
/// `S` is the site identifier type (see [`crate::SiteId`] for a ready-made
/// one); `T` is the value type carried by each element.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "S: serde::Serialize + std::hash::Hash + Eq, T: serde::Serialize",
        deserialize = "S: serde::Deserialize<'de> + std::hash::Hash + Eq, T: serde::Deserialize<'de>"
    ))
)]
pub struct WSeq<S, T> {
    /// The owning replica's site identifier.
    site: S,
    /// Monotonically increasing local clock; advanced only by local generates.
    clock: u64,
    /// The internal, order-authoritative list. Begins as `[Start, End]` and
    /// only ever grows: elements are tombstoned, never removed.
    elements: Vec<Element<S, T>>,
    /// Operations received out of causal order, awaiting their prerequisites.
    pending: VecDeque<Op<S, T>>,
    /// Replay guard: `(is_delete, element id)` for every operation already
    /// folded into `elements`. Keyed by tag-plus-id per the equivalence
    /// noted for `Op` equality.
    integrated: HashSet<(bool, ID<S>)>,
}

impl<S, T> WSeq<S, T>
where
    S: Ord + Clone + std::hash::Hash,
    T: Clone,
{
    /// Creates a new, empty sequence owned by `site`.
    #[must_use]
    pub fn new(site: S) -> Self {
        Self {
            site,
            clock: 0,
            elements: vec![Element::start_sentinel(), Element::end_sentinel()],
            pending: VecDeque::new(),
            integrated: HashSet::new(),
        }
    }

    /// The site identifier owning this replica.
    #[must_use]
    pub fn site(&self) -> &S {
        &self.site
    }

    /// The current local clock value.
    #[must_use]
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Number of visible (non-deleted, non-sentinel) elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.iter().filter(|e| e.visible).count()
    }

    /// True if there are no visible elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of elements ever generated or integrated, tombstones
    /// and sentinels included. Never decreases: elements are tombstoned,
    /// never removed.
    #[must_use]
    pub fn internal_len(&self) -> usize {
        self.elements.len()
    }

    /// Returns the visible projection: the carried values of every visible
    /// element, in sequence order.
    #[must_use]
    pub fn value(&self) -> Vec<T> {
        self.elements
            .iter()
            .filter(|e| e.visible)
            .filter_map(|e| e.value.clone())
            .collect()
    }

    /// Returns the `k`-th visible element (0-indexed), if any.
    #[must_use]
    pub fn visible_at(&self, k: usize) -> Option<&Element<S, T>> {
        self.elements.iter().filter(|e| e.visible).nth(k)
    }

    /// Returns the visible index of an element identifier, if it is both
    /// present and currently visible.
    #[must_use]
    pub fn visible_index_of(&self, id: &ID<S>) -> Option<usize> {
        self.elements
            .iter()
            .filter(|e| e.visible)
            .position(|e| &e.id == id)
    }

    /// Returns whether an element with this identifier exists, tombstoned or not.
    #[must_use]
    pub fn contains(&self, id: &ID<S>) -> bool {
        self.position_of(id).is_some()
    }

    /// Returns whether an element is present but tombstoned.
    #[must_use]
    pub fn is_tombstoned(&self, id: &ID<S>) -> bool {
        self.elements
            .iter()
            .find(|e| &e.id == id)
            .is_some_and(|e| !e.visible && !e.is_sentinel())
    }

    /// Number of operations currently held in the pending queue.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// True if the pending queue is non-empty and its most-ready operation
    /// still cannot execute — i.e. a subsequent [`Self::apply_pending`] call
    /// would make no progress without new deliveries.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.pending.iter().all(|op| !self.is_executable(op)) && !self.pending.is_empty()
    }

    fn position_of(&self, id: &ID<S>) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }

    fn is_executable(&self, op: &Op<S, T>) -> bool {
        match op {
            Op::Insert(e) => {
                self.position_of(&e.prev_hint).is_some() && self.position_of(&e.next_hint).is_some()
            }
            Op::Delete(e) => self.position_of(&e.id).is_some(),
        }
    }

    /// Generates a local insert of `value` at visible index `i`.
    ///
    /// `i == self.len()` appends at the end. Returns the `Insert` operation
    /// to broadcast to other replicas; the insert is integrated locally
    /// before this call returns.
    pub fn generate_insert(&mut self, i: usize, value: T) -> SequenceResult<Op<S, T>> {
        let visible_len = self.len();
        if i > visible_len {
            return Err(SequenceError::IndexOutOfRange { index: i, visible_len });
        }

        let prev_id = if i == 0 {
            ID::Start
        } else {
            self.visible_at(i - 1).expect("i - 1 < visible_len").id.clone()
        };
        let next_id = if i < visible_len {
            self.visible_at(i).expect("i < visible_len").id.clone()
        } else {
            ID::End
        };

        self.clock += 1;
        let id = ID::element(self.site.clone(), self.clock);
        let elem = Element {
            id: id.clone(),
            value: Some(value),
            visible: true,
            prev_hint: prev_id.clone(),
            next_hint: next_id.clone(),
        };

        trace!(?id, index = i, "generating local insert");
        let executed = self.integrate_insert(elem.clone(), prev_id, next_id);
        debug_assert!(executed, "a local insert's own neighbours are always present");

        Ok(Op::Insert(elem))
    }

    /// Generates a local delete of the visible element at index `i`.
    pub fn generate_delete(&mut self, i: usize) -> SequenceResult<Op<S, T>> {
        let visible_len = self.len();
        let elem = self
            .visible_at(i)
            .ok_or(SequenceError::IndexOutOfRange { index: i, visible_len })?
            .clone();

        trace!(id = ?elem.id, index = i, "generating local delete");
        let executed = self.integrate_delete(elem.clone());
        debug_assert!(executed, "a local delete's target always exists locally");

        Ok(Op::Delete(elem))
    }

    /// Enqueues a remote operation for later integration.
    ///
    /// This is a pre-filter, not a correctness guarantee: it discards an
    /// `Insert` whose element is already present and discards an exact
    /// duplicate already sitting in the queue, but relies on `integrated`
    /// (consulted during [`Self::apply_pending`]) to guard against
    /// re-application of operations that have already cycled through the
    /// queue once. Returns `true` if the operation was enqueued.
    pub fn enqueue(&mut self, op: Op<S, T>) -> bool {
        if let Op::Insert(e) = &op {
            if self.contains(&e.id) {
                return false;
            }
        }
        if self.pending.contains(&op) {
            return false;
        }
        trace!(id = ?op.element_id(), "enqueueing operation");
        self.pending.push_back(op);
        true
    }

    /// Integrates a local or remote insert given its (hinted) neighbours.
    ///
    /// Returns `true` if the insert executed, `false` if its neighbours
    /// aren't present yet and it must be deferred.
    fn integrate_insert(&mut self, elem: Element<S, T>, prev_id: ID<S>, next_id: ID<S>) -> bool {
        let Some(mut p) = self.position_of(&prev_id) else {
            return false;
        };
        let Some(mut n) = self.position_of(&next_id) else {
            return false;
        };

        // The ordering rule always narrows to an adjacent bracket on the
        // first "free room" scan, so this loop runs at most twice; it is
        // written as a loop rather than recursion purely to avoid an
        // unbounded call stack for a pathological input.
        loop {
            if n == p + 1 {
                self.integrated.insert((false, elem.id.clone()));
                debug!(id = ?elem.id, at = n, "integrated insert");
                self.elements.insert(n, elem);
                return true;
            }

            // Free room between the hinted neighbours: resolve the
            // ambiguity purely by identifier order, which is a strict
            // total order and therefore decided identically on every
            // replica.
            let mut k = p + 1;
            while k < n && self.elements[k].id < elem.id {
                k += 1;
            }
            p = k - 1;
            n = k;
        }
    }

    /// Integrates a local or remote delete. Returns `true` if the
    /// target element was present (and is now tombstoned), `false` if it
    /// must be deferred.
    fn integrate_delete(&mut self, elem: Element<S, T>) -> bool {
        match self.elements.iter_mut().find(|e| e.id == elem.id) {
            Some(existing) => {
                existing.visible = false;
                self.integrated.insert((true, elem.id));
                debug!(id = ?existing.id, "integrated delete");
                true
            }
            None => false,
        }
    }

    /// Drains the pending queue, integrating every operation whose
    /// prerequisites are satisfied, repeatedly, until no further progress
    /// can be made.
    ///
    /// Returns once the queue is empty or blocked on missing prerequisites.
    /// This is never an error: a queue that can't make progress yet simply
    /// stays intact for a later call.
    pub fn apply_pending(&mut self) {
        while let Either::Right(()) = self.drain_step() {}
    }

    /// Runs one step of the drain: either integrates the next executable
    /// operation (`Right`) or determines nothing more can run right now
    /// (`Left`), re-sorting the queue so executable operations lead.
    fn drain_step(&mut self) -> Either<(), ()> {
        let Some(head) = self.pending.front() else {
            return Either::Left(());
        };

        if !self.is_executable(head) {
            let mut ops: Vec<_> = self.pending.drain(..).collect();
            ops.sort_by_key(|op| !self.is_executable(op));
            self.pending = ops.into_iter().collect();

            match self.pending.front() {
                Some(head) if self.is_executable(head) => {}
                _ => {
                    debug!(pending = self.pending.len(), "apply_pending blocked on missing prerequisites");
                    return Either::Left(());
                }
            }
        }

        let op = self.pending.pop_front().expect("checked non-empty above");
        let id = op.element_id().clone();
        let is_delete = op.is_delete();

        if self.integrated.contains(&(is_delete, id)) {
            // Source-faithful: an already-integrated head contaminates this
            // drain pass. The remainder of the queue is retried on the next
            // call instead of being skipped past here.
            debug!("apply_pending stopped on an already-integrated operation");
            return Either::Left(());
        }

        match op {
            Op::Delete(e) => {
                self.integrate_delete(e);
            }
            Op::Insert(e) => {
                let prev = e.prev_hint.clone();
                let next = e.next_hint.clone();
                self.integrate_insert(e, prev, next);
            }
        }
        Either::Right(())
    }
}
