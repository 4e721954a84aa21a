//! Total order over WOOT element identifiers.
//!
//! An [`ID`] is either one of two sentinels (`Start`, `End`) or a concrete
//! `(site, clock)` pair. The comparator defined here — `Start < Element <
//! End`, elements ordered by `site` then `clock` — is the only primitive
//! the sequence engine needs to resolve concurrent inserts deterministically
//! (see [`crate::sequence`]).

use std::cmp::Ordering;
use std::fmt;

/// An identifier for a WOOT sequence element.
///
/// `S` is the site identifier type; it only needs to be totally ordered and
/// cheaply cloneable. Two sentinel variants bracket every real element so
/// that insertion at the extremities of the sequence never needs a special
/// case: `Start` and `End` are always present in a [`crate::sequence::WSeq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ID<S> {
    /// Sentinel preceding every other identifier.
    Start,
    /// A concrete element generated by `site` at local clock `clock`.
    Element {
        /// The generating site.
        site: S,
        /// The site's local clock value when this element was generated.
        clock: u64,
    },
    /// Sentinel following every other identifier.
    End,
}

impl<S> ID<S> {
    /// Shorthand for constructing an `Element` identifier.
    pub fn element(site: S, clock: u64) -> Self {
        ID::Element { site, clock }
    }

    /// Returns true if this is a sentinel (`Start` or `End`), not a real element.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        matches!(self, ID::Start | ID::End)
    }
}

impl<S: fmt::Display> fmt::Display for ID<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ID::Start => write!(f, "Start"),
            ID::End => write!(f, "End"),
            ID::Element { site, clock } => write!(f, "{site}:{clock}"),
        }
    }
}

impl<S: Ord> PartialOrd for ID<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: Ord> Ord for ID<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ID::Start, ID::Start) => Ordering::Equal,
            (ID::Start, _) => Ordering::Less,
            (_, ID::Start) => Ordering::Greater,

            (ID::End, ID::End) => Ordering::Equal,
            (ID::End, _) => Ordering::Greater,
            (_, ID::End) => Ordering::Less,

            (
                ID::Element { site: s1, clock: c1 },
                ID::Element { site: s2, clock: c2 },
            ) => s1.cmp(s2).then_with(|| c1.cmp(c2)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_less_than_everything() {
        let elem: ID<u8> = ID::element(1, 0);
        assert!(ID::<u8>::Start < elem);
        assert!(ID::<u8>::Start < ID::End);
    }

    #[test]
    fn end_is_greater_than_everything() {
        let elem: ID<u8> = ID::element(1, 0);
        assert!(ID::<u8>::End > elem);
        assert!(ID::<u8>::End > ID::Start);
    }

    #[test]
    fn elements_compare_by_site_then_clock() {
        let a = ID::element(1u8, 5);
        let b = ID::element(1u8, 6);
        assert!(a < b);

        let c = ID::element(2u8, 0);
        assert!(a < c, "different sites compare by site first");
    }

    #[test]
    fn total_order_is_trichotomous() {
        let ids: Vec<ID<u8>> = vec![
            ID::Start,
            ID::element(1, 1),
            ID::element(1, 2),
            ID::element(2, 1),
            ID::End,
        ];
        for a in &ids {
            for b in &ids {
                let count = [a < b, a == b, a > b].into_iter().filter(|x| *x).count();
                assert_eq!(count, 1, "exactly one of <, ==, > must hold for {a:?}/{b:?}");
            }
        }
    }

    #[test]
    fn ordering_is_transitive() {
        let a = ID::Start;
        let b = ID::element(1u8, 1);
        let c = ID::End;
        assert!(a < b && b < c && a < c);
    }

    #[test]
    fn is_sentinel() {
        assert!(ID::<u8>::Start.is_sentinel());
        assert!(ID::<u8>::End.is_sentinel());
        assert!(!ID::element(1u8, 1).is_sentinel());
    }
}
