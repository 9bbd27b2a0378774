//! Control Flow Graph (CFG) construction and analysis.
//!
//! This module provides a proper graph abstraction over basic blocks with
//! efficient traversal, edge classification, and post-dominator computation.
//!
//! # Architecture
//!
//! The CFG builds upon the generic [`crate::utils::graph::DirectedGraph`]
//! infrastructure, providing block-level node and edge types while leveraging
//! shared algorithms for traversals and dominance.
//!
//! # Key Components
//!
//! - [`ControlFlowGraph`] - The main CFG structure wrapping basic blocks
//! - [`BasicBlock`] - A block with an id, an optional name, and a terminator
//! - [`Terminator`] - How a block transfers control to its successors
//! - [`CfgEdgeKind`] - Classification of edge types consumed by the
//!   dependence analysis
//!
//! # Edge Types
//!
//! The CFG distinguishes three types of control flow edges:
//!
//! - **Unconditional**: Jumps, fall-throughs, and multi-way transfers
//! - **Conditional True/False**: The two targets of a conditional branch
//!
//! # Lazy Computation
//!
//! The post-dominator tree is computed lazily on first access and cached for
//! subsequent queries. This is implemented using [`std::sync::OnceLock`] for
//! thread-safe initialization.
//!
//! # Examples
//!
//! ## Building a CFG from Basic Blocks
//!
//! ```rust
//! use depscope::analysis::{BasicBlock, ControlFlowGraph, Terminator};
//!
//! let cfg = ControlFlowGraph::from_blocks(vec![
//!     BasicBlock::new(0, Terminator::Conditional { true_target: 1, false_target: 2 }),
//!     BasicBlock::new(1, Terminator::Other { targets: vec![2] }),
//!     BasicBlock::new(2, Terminator::Other { targets: vec![] }),
//! ])?;
//!
//! println!("CFG has {} blocks", cfg.block_count());
//! println!("Entry block: {:?}", cfg.entry());
//! # Ok::<(), depscope::Error>(())
//! ```
//!
//! ## Traversing the CFG
//!
//! ```rust
//! use depscope::analysis::{BasicBlock, ControlFlowGraph, Terminator};
//!
//! let cfg = ControlFlowGraph::from_blocks(vec![
//!     BasicBlock::new(0, Terminator::Other { targets: vec![1] }),
//!     BasicBlock::new(1, Terminator::Other { targets: vec![] }),
//! ])?;
//!
//! // Iterate in reverse postorder (useful for data flow)
//! for node in cfg.reverse_postorder() {
//!     let block = cfg.block(node).unwrap();
//!     println!("{}", block.label());
//! }
//! # Ok::<(), depscope::Error>(())
//! ```
//!
//! ## Computing Post-Dominators
//!
//! ```rust
//! use depscope::analysis::{BasicBlock, ControlFlowGraph, Terminator};
//!
//! let cfg = ControlFlowGraph::from_blocks(vec![
//!     BasicBlock::new(0, Terminator::Conditional { true_target: 1, false_target: 2 }),
//!     BasicBlock::new(1, Terminator::Other { targets: vec![2] }),
//!     BasicBlock::new(2, Terminator::Other { targets: vec![] }),
//! ])?;
//!
//! let pdt = cfg.post_dominators()?;
//! let branch = cfg.block_node(0).unwrap();
//! let merge = cfg.block_node(2).unwrap();
//! assert!(pdt.post_dominates(merge, branch));
//! # Ok::<(), depscope::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! [`ControlFlowGraph`] is [`Send`] and [`Sync`], enabling safe concurrent read
//! access after construction. The lazy-initialized post-dominator tree uses
//! [`std::sync::OnceLock`] for thread-safe initialization.

mod block;
mod edge;
mod graph;

pub use block::{BasicBlock, Terminator};
pub use edge::CfgEdgeKind;
pub use graph::ControlFlowGraph;
