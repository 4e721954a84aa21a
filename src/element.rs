//! The WOOT element: a stable, tombstone-capable record in a [`crate::sequence::WSeq`].

use crate::identifier::ID;

/// A single element of a WOOT sequence.
///
/// Created once by its generating site and never mutated except for its
/// `visible` flag, which a delete operation flips to `false`. Elements are
/// never physically removed from the sequence — deletion is a tombstone,
/// not a removal — because later inserts may still reference a deleted
/// element's identifier as a neighbour hint.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "S: serde::Serialize, T: serde::Serialize",
        deserialize = "S: serde::Deserialize<'de>, T: serde::Deserialize<'de>"
    ))
)]
pub struct Element<S, T> {
    /// This element's globally unique identifier.
    pub id: ID<S>,
    /// The carried value. `None` only for the two sentinel elements.
    pub value: Option<T>,
    /// Whether this element is currently visible (not deleted).
    pub visible: bool,
    /// Identifier of the element that was immediately before this one,
    /// at generation time on the generating site. A hint, not an
    /// authoritative neighbour after integration.
    pub prev_hint: ID<S>,
    /// Identifier of the element that was immediately after this one,
    /// at generation time on the generating site. A hint, not an
    /// authoritative neighbour after integration.
    pub next_hint: ID<S>,
}

impl<S: Clone, T> Element<S, T> {
    /// Builds the `Start` sentinel.
    ///
    /// By convention its hints point at itself and at `End`; the sentinel
    /// is never consulted as a `prev_hint`/`next_hint` target by anything
    /// other than elements generated at the absolute extremities of the
    /// sequence, where the hint is always a sentinel anyway.
    pub fn start_sentinel() -> Self {
        Self {
            id: ID::Start,
            value: None,
            visible: false,
            prev_hint: ID::Start,
            next_hint: ID::End,
        }
    }

    /// Builds the `End` sentinel.
    pub fn end_sentinel() -> Self {
        Self {
            id: ID::End,
            value: None,
            visible: false,
            prev_hint: ID::Start,
            next_hint: ID::End,
        }
    }

    /// Returns true if this is a sentinel element.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.id.is_sentinel()
    }
}
