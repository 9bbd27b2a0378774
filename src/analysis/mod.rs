//! Program analysis layers of depscope.
//!
//! This module hosts the two analyses the crate is built around, leaf-first:
//!
//! - [`cfg`] - the **control flow view**: [`BasicBlock`] with its tagged
//!   [`Terminator`], and [`ControlFlowGraph`] exposing per-block successors,
//!   edge classification, and the lazily computed post-dominator tree
//! - [`cdg`] - the **control dependence graph** built on top of it: node
//!   model, two-phase construction, query API, and the parallel per-unit
//!   collection
//!
//! # Data Flow
//!
//! ```text
//! blocks -> ControlFlowGraph -> post-dominator tree
//!                                      |
//!                      compute_dependencies (raw CDG)
//!                                      |
//!                        insert_regions (canonical CDG)
//!                                      |
//!                  controls / influences / enclosing_region
//! ```
//!
//! # Examples
//!
//! ```rust
//! use depscope::analysis::{BasicBlock, ControlDependenceGraph, ControlFlowGraph, Terminator};
//!
//! // while loop: the header decides both the body and its own repetition
//! let cfg = ControlFlowGraph::from_blocks(vec![
//!     BasicBlock::new(0, Terminator::Other { targets: vec![1] }),
//!     BasicBlock::new(1, Terminator::Conditional { true_target: 2, false_target: 3 }),
//!     BasicBlock::new(2, Terminator::Other { targets: vec![1] }),
//!     BasicBlock::new(3, Terminator::Other { targets: vec![] }),
//! ])?;
//!
//! let cdg = ControlDependenceGraph::build(&cfg)?;
//! let header = cfg.block_node(1).unwrap();
//! let body = cfg.block_node(2).unwrap();
//!
//! assert!(cdg.controls(header, body)?);
//! assert!(cdg.influences(header, header)?);
//! # Ok::<(), depscope::Error>(())
//! ```

pub mod cdg;
pub mod cfg;

pub use cdg::{
    BuildTrace, CdgDfsIterator, CdgEdgeKind, CdgNodeId, ControlDependenceGraph,
    ControlDependenceGraphs, ControlDependenceNode, NullTrace,
};
pub use cfg::{BasicBlock, CfgEdgeKind, ControlFlowGraph, Terminator};
