//! The WOOT operation: the sole payload exchanged between replicas.

use crate::element::Element;
use crate::identifier::ID;

/// A replicated operation over a WOOT sequence.
///
/// Equality (and hashing, when `S`/`T` support it) is defined over the tag
/// plus the element's identifier only — the `visible` flag carried in the
/// payload is irrelevant to equality, since a receiving replica always
/// recomputes visibility itself (see [`crate::sequence::WSeq::integrate_delete`]).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "S: serde::Serialize, T: serde::Serialize",
        deserialize = "S: serde::Deserialize<'de>, T: serde::Deserialize<'de>"
    ))
)]
pub enum Op<S, T> {
    /// Insert the carried element into the sequence.
    Insert(Element<S, T>),
    /// Mark the referenced element as deleted (tombstoned).
    Delete(Element<S, T>),
}

impl<S, T> Op<S, T> {
    /// The identifier of the element this operation refers to.
    #[must_use]
    pub fn element_id(&self) -> &ID<S> {
        match self {
            Op::Insert(e) | Op::Delete(e) => &e.id,
        }
    }

    /// Returns true if this is an `Insert` operation.
    #[must_use]
    pub fn is_insert(&self) -> bool {
        matches!(self, Op::Insert(_))
    }

    /// Returns true if this is a `Delete` operation.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self, Op::Delete(_))
    }
}

impl<S: PartialEq, T> PartialEq for Op<S, T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Op::Insert(a), Op::Insert(b)) => a.id == b.id,
            (Op::Delete(a), Op::Delete(b)) => a.id == b.id,
            _ => false,
        }
    }
}

impl<S: Eq, T> Eq for Op<S, T> {}
