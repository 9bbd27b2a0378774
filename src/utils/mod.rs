//! Shared infrastructure used across the analysis layers.
//!
//! This module hosts the generic building blocks the analyses are written
//! against:
//!
//! - [`graph`] - directed graph representation, traversal, and dominance
//!   algorithms
//! - [`BitSet`] - compact integer sets for visited tracking during graph walks
//! - [`escape_dot`] - label escaping shared by the DOT renderers
//!
//! Nothing in this module knows about basic blocks or control dependence;
//! the types here are reusable for any graph-shaped analysis.

mod bitset;
mod dot;

pub mod graph;

pub use bitset::{BitSet, BitSetIter};
pub use dot::escape_dot;
