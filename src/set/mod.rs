//! State-based set CRDTs.
//!
//! These are pure lattice values: `merge` is their only operation besides
//! the mutators, and it must be commutative, associative, and idempotent
//! (a join-semilattice under each type's own ordering). They're specified
//! primarily by their algebraic laws rather than by an integration
//! algorithm, unlike [`crate::sequence`].

mod g_set;
mod mc_set;
mod pn_set;

pub use g_set::{empty_g_set, g_set_of, GSet};
pub use mc_set::{empty_mc_set, mc_set_of, MCSet};
pub use pn_set::{empty_pn_set, pn_set_of, PNSet};
