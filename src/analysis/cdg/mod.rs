//! Control Dependence Graph (CDG) construction and queries.
//!
//! A block `B` is **control-dependent** on a block `A` when `A`'s branch
//! outcome determines whether `B` executes. This module computes that
//! relation for a whole function, following Ferrante et al.'s program
//! dependence graph formulation, and exposes it through a small query API.
//!
//! # Architecture
//!
//! Construction runs in two phases over the function's post-dominator tree:
//!
//! 1. **Dependence propagation** - every control flow edge `A → B` whose
//!    target does not post-dominate its source contributes dependence edges
//!    from `A` to the blocks between `B` and the nearest common
//!    post-dominator ancestor of `A` and `B`. A branch that is its own
//!    nearest common ancestor (a loop back edge) becomes its own child.
//! 2. **Region insertion** - blocks with identical dependence ancestry are
//!    funneled through shared synthetic **region** nodes, and every block's
//!    true/false fan-out is bounded to one child.
//!
//! The result is almost a tree: regions may keep several parents, and
//! self-loops survive canonicalization, so the queries carry their own
//! cycle guards.
//!
//! # Key Components
//!
//! - [`ControlDependenceNode`] - one node: a basic block or a region
//! - [`CdgEdgeKind`] - True/False/Other dependence edge classification
//! - [`ControlDependenceGraph`] - the per-function graph and its queries
//! - [`ControlDependenceGraphs`] - per-unit collection, built in parallel
//! - [`BuildTrace`] - injectable construction checkpoints
//!
//! # Queries
//!
//! - [`ControlDependenceGraph::controls`] - `A` alone decides `B`, through
//!   an unambiguous single-parent chain
//! - [`ControlDependenceGraph::influences`] - `A` takes part in deciding
//!   `B`, through any chain of dependence parents
//! - [`ControlDependenceGraph::enclosing_region`] - the region a block
//!   hangs under
//!
//! # Examples
//!
//! ```rust
//! use depscope::analysis::{BasicBlock, ControlDependenceGraph, ControlFlowGraph, Terminator};
//!
//! // if/else diamond: the branch controls its arms but not the merge
//! let cfg = ControlFlowGraph::from_blocks(vec![
//!     BasicBlock::new(0, Terminator::Other { targets: vec![1] }),
//!     BasicBlock::new(1, Terminator::Conditional { true_target: 2, false_target: 3 }),
//!     BasicBlock::new(2, Terminator::Other { targets: vec![4] }),
//!     BasicBlock::new(3, Terminator::Other { targets: vec![4] }),
//!     BasicBlock::new(4, Terminator::Other { targets: vec![] }),
//! ])?;
//!
//! let cdg = ControlDependenceGraph::build(&cfg)?;
//! let cond = cfg.block_node(1).unwrap();
//!
//! assert!(cdg.controls(cond, cfg.block_node(2).unwrap())?);
//! assert!(!cdg.influences(cond, cfg.block_node(4).unwrap())?);
//! # Ok::<(), depscope::Error>(())
//! ```

mod builder;
mod collection;
mod graph;
mod node;
mod trace;

pub use collection::ControlDependenceGraphs;
pub use graph::{CdgDfsIterator, ControlDependenceGraph};
pub use node::{CdgEdgeKind, CdgNodeId, ControlDependenceNode};
pub use trace::{BuildTrace, NullTrace};
