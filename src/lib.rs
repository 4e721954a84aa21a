//! Conflict-free replicated data types for peer-to-peer collaboration.
//!
//! This crate provides:
//!
//! - [`WSeq`](sequence::WSeq) — an operation-based sequence CRDT (WOOT)
//!   supporting concurrent insert and delete with a deterministic,
//!   replica-independent element ordering.
//! - [`GSet`], [`PNSet`], [`MCSet`] — state-based set CRDTs, each a
//!   join-semilattice under its own `merge`.
//! - [`causal_graph`] — per-site append-only yarns of dependency-carrying
//!   atoms, for building higher-level CRDTs whose operations need explicit
//!   causal history rather than a single integration algorithm.
//!
//! Every type here is generic over its site identifier `S: Ord + Clone +
//! Hash`; this crate has no opinion on how sites are named; bring your own
//! type, or use the [`SiteId`] convenience wrapper over a UUIDv7.
//!
//! This crate does not provide network transport, persistence, a wire
//! format, or tombstone garbage collection — see each module's docs for
//! what it does and does not do.

pub mod causal_graph;
pub mod element;
pub mod error;
pub mod identifier;
pub mod op;
pub mod sequence;
pub mod set;
pub mod util;

pub use causal_graph::{Atom, CausalGraph, Yarn, YarnCursor};
pub use element::Element;
pub use error::{SequenceError, SequenceResult, YarnError, YarnResult};
pub use identifier::ID;
pub use op::Op;
pub use sequence::WSeq;
pub use set::{
    empty_g_set, empty_mc_set, empty_pn_set, g_set_of, mc_set_of, pn_set_of, GSet, MCSet, PNSet,
};
pub use util::Either;

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// A convenience site identifier: a UUIDv7, time-ordered and globally
/// unique without coordination. Every CRDT type in this crate works with
/// any `S: Ord + Clone + Hash`; reach for `SiteId` when the application has
/// no existing identifier of its own to reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SiteId(Uuid);

impl SiteId {
    /// Creates a new site ID with the current timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a site ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses a site ID from a string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for SiteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SiteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
