// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![deny(unsafe_code)]

//! # depscope
//!
//! [![Crates.io](https://img.shields.io/crates/v/depscope.svg)](https://crates.io/crates/depscope)
//! [![Documentation](https://docs.rs/depscope/badge.svg)](https://docs.rs/depscope)
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://github.com/BinFlip/depscope/blob/main/LICENSE-APACHE)
//!
//! Control dependence graph construction and queries for compiler-style program analysis.
//! Built in pure Rust, `depscope` determines, for every basic block of a function, which
//! branch decisions govern whether that block executes, following Ferrante et al.'s program
//! dependence graph formulation. The resulting structure powers program slicing,
//! parallelization legality checks, and dependence-based transformations.
//!
//! ## Features
//!
//! - **🔍 Precise dependence edges** - Post-dominator driven propagation with classified
//!   true/false/other edges, including the self-loop case
//! - **🧩 Canonical region nodes** - Structurally identical dependence patterns are merged
//!   into shared region nodes, bounding every block's true/false fan-out to one
//! - **⚡ Parallel batch analysis** - Per-function graphs built concurrently across a whole
//!   compilation unit
//! - **🛡️ Memory safe** - Arena-owned nodes addressed by stable ids; no reference cycles
//! - **📊 Inspectable results** - Depth-first traversal and Graphviz DOT export of every graph
//!
//! ## Quick Start
//!
//! Add `depscope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! depscope = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust
//! use depscope::prelude::*;
//!
//! // if/else diamond: 0 -> 1; 1 -true-> 2; 1 -false-> 3; 2, 3 -> 4; 4 exits
//! let cfg = ControlFlowGraph::from_blocks(vec![
//!     BasicBlock::new(0, Terminator::Other { targets: vec![1] }),
//!     BasicBlock::new(1, Terminator::Conditional { true_target: 2, false_target: 3 }),
//!     BasicBlock::new(2, Terminator::Other { targets: vec![4] }),
//!     BasicBlock::new(3, Terminator::Other { targets: vec![4] }),
//!     BasicBlock::new(4, Terminator::Other { targets: vec![] }),
//! ])?;
//!
//! let cdg = ControlDependenceGraph::build(&cfg)?;
//!
//! let cond = cfg.block_node(1).unwrap();
//! let then_block = cfg.block_node(2).unwrap();
//! assert!(cdg.controls(cond, then_block)?);
//! # Ok::<(), depscope::Error>(())
//! ```
//!
//! ### Whole-Unit Analysis
//!
//! ```rust
//! use depscope::prelude::*;
//!
//! let straight_line = ControlFlowGraph::from_blocks(vec![
//!     BasicBlock::new(0, Terminator::Other { targets: vec![1] }),
//!     BasicBlock::new(1, Terminator::Other { targets: vec![] }),
//! ])?;
//!
//! let graphs = ControlDependenceGraphs::analyze_all(vec![
//!     ("main".to_string(), straight_line),
//! ])?;
//! assert!(graphs.graph("main").is_some());
//! # Ok::<(), depscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `depscope` is organized into a small set of layers:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`utils::graph`] - Generic directed graph, traversal, and dominator infrastructure
//! - [`analysis`] - The control flow view and the control dependence graph built on it
//! - [`Error`] and [`Result`] - Comprehensive error handling
//!
//! ### Construction Pipeline
//!
//! A [`analysis::ControlDependenceGraph`] is produced in two phases over the function's
//! post-dominator tree, mirroring the classic formulation:
//!
//! 1. **Dependence propagation** - every control flow edge `A → B` whose target does not
//!    post-dominate its source contributes dependence edges from `A` to the blocks between
//!    `B` and the nearest common post-dominator ancestor of `A` and `B`
//! 2. **Region insertion** - blocks with identical dependence ancestry are funneled through
//!    shared synthetic region nodes, and true/false fan-out is bounded to one child each
//!
//! Both phases report progress through an injectable [`analysis::BuildTrace`] so hosts can
//! narrate construction without the algorithm carrying any logging of its own.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result). There is no recoverable error class:
//! failures are precondition violations (caller misuse) or internal consistency defects.
//!
//! ```rust
//! use depscope::{analysis::{BasicBlock, ControlFlowGraph, Terminator}, Error};
//!
//! // A conditional branch whose target names no block is rejected up front.
//! let result = ControlFlowGraph::from_blocks(vec![
//!     BasicBlock::new(0, Terminator::Conditional { true_target: 1, false_target: 9 }),
//!     BasicBlock::new(1, Terminator::Other { targets: vec![] }),
//! ]);
//! assert!(matches!(result, Err(Error::Malformed { .. })));
//! ```
//!
//! ## Performance
//!
//! `depscope` is designed for batch analysis workloads:
//!
//! - **Lazy evaluation** - the post-dominator tree is computed on first use and cached
//! - **Parallel processing** - whole-unit analysis fans out across functions with no shared
//!   mutable state beyond the final concurrent collection
//! - **Minimal allocations** - id sets instead of pointer graphs, bit sets for visited
//!   tracking in queries
//!
//! ## Development and Testing
//!
//! The test suite covers the algorithmic properties (exclusive node tags, fan-out bounds,
//! query monotonicity, canonicalization idempotence) alongside scenario tests for diamonds,
//! loops, and shared regions:
//!
//! ```bash
//! cargo test
//! cargo bench
//! ```

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the depscope library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use depscope::prelude::*;
///
/// let cfg = ControlFlowGraph::from_blocks(vec![
///     BasicBlock::new(0, Terminator::Other { targets: vec![] }),
/// ])?;
/// let cdg = ControlDependenceGraph::build(&cfg)?;
/// assert_eq!(cdg.node_count(), 2); // the block node plus the root region
/// # Ok::<(), depscope::Error>(())
/// ```
pub mod prelude;

/// Control flow and control dependence analysis.
///
/// This module hosts the two analysis layers of the crate:
///
/// - [`analysis::cfg`] - the control flow view: [`analysis::BasicBlock`] with its tagged
///   [`analysis::Terminator`], and [`analysis::ControlFlowGraph`] exposing successors,
///   edge classification, and the lazily computed post-dominator tree
/// - [`analysis::cdg`] - the control dependence graph: node model, two-phase builder,
///   query API ([`analysis::ControlDependenceGraph::controls`],
///   [`analysis::ControlDependenceGraph::influences`],
///   [`analysis::ControlDependenceGraph::enclosing_region`]), traversal, DOT export,
///   and the parallel per-unit collection
///
/// # Examples
///
/// ```rust
/// use depscope::analysis::{BasicBlock, ControlDependenceGraph, ControlFlowGraph, Terminator};
///
/// // A loop whose header conditionally repeats itself.
/// let cfg = ControlFlowGraph::from_blocks(vec![
///     BasicBlock::new(0, Terminator::Other { targets: vec![1] }),
///     BasicBlock::new(1, Terminator::Conditional { true_target: 1, false_target: 2 }),
///     BasicBlock::new(2, Terminator::Other { targets: vec![] }),
/// ])?;
///
/// let cdg = ControlDependenceGraph::build(&cfg)?;
/// let header = cfg.block_node(1).unwrap();
///
/// // The header decides its own re-execution.
/// assert!(cdg.influences(header, header)?);
/// # Ok::<(), depscope::Error>(())
/// ```
pub mod analysis;

/// Shared infrastructure: the generic graph layer and small helpers.
///
/// # Key Components
///
/// - [`utils::graph`] - [`utils::graph::DirectedGraph`], strongly-typed ids, capability
///   traits, traversal algorithms, and dominator / post-dominator computation
/// - [`utils::BitSet`] - compact visited-set tracking for graph walks
/// - [`utils::escape_dot`] - label escaping shared by the DOT renderers
pub mod utils;

/// `depscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
///
/// # Examples
///
/// ```rust
/// use depscope::{analysis::{BasicBlock, ControlFlowGraph, Terminator}, Result};
///
/// fn single_block_function() -> Result<ControlFlowGraph<'static>> {
///     ControlFlowGraph::from_blocks(vec![
///         BasicBlock::new(0, Terminator::Other { targets: vec![] }),
///     ])
/// }
/// # single_block_function().unwrap();
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `depscope` Error type
///
/// The main error type for all operations in this crate. Provides detailed error
/// information for control flow graph validation and dependence analysis.
///
/// # Examples
///
/// ```rust
/// use depscope::{analysis::{BasicBlock, ControlFlowGraph, Terminator}, Error};
///
/// match ControlFlowGraph::from_blocks(vec![]) {
///     Err(Error::Malformed { message, .. }) => println!("Malformed: {}", message),
///     Err(e) => println!("Error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
pub use error::Error;

/// Generic graph infrastructure, re-exported at the crate root.
///
/// See [`utils::graph`] for the full module documentation.
///
/// # Example
///
/// ```rust
/// use depscope::graph::{DirectedGraph, NodeId};
///
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// graph.add_edge(a, b, ())?;
/// assert_eq!(graph.node_count(), 2);
/// # Ok::<(), depscope::Error>(())
/// ```
pub use utils::graph;
