//! # depscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the depscope library. Import this module to get quick access to the essential
//! types for control dependence analysis.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all depscope operations
pub use crate::Error;

/// The result type used throughout depscope
pub use crate::Result;

// ================================================================================================
// Control Flow View
// ================================================================================================

/// Basic blocks and their terminators, the input of every analysis
pub use crate::analysis::{BasicBlock, Terminator};

/// The control flow graph and its edge classification
pub use crate::analysis::{CfgEdgeKind, ControlFlowGraph};

// ================================================================================================
// Control Dependence Graph
// ================================================================================================

/// The per-function control dependence graph and its node model
pub use crate::analysis::{
    CdgEdgeKind, CdgNodeId, ControlDependenceGraph, ControlDependenceNode,
};

/// Per-unit collection of control dependence graphs
pub use crate::analysis::ControlDependenceGraphs;

/// Injectable construction checkpoints
pub use crate::analysis::{BuildTrace, NullTrace};

// ================================================================================================
// Graph Infrastructure
// ================================================================================================

/// Strongly-typed graph identifiers
pub use crate::utils::graph::{EdgeId, NodeId};

/// The generic directed graph backing the control flow view
pub use crate::utils::graph::DirectedGraph;

/// Graph capability traits consumed by the shared algorithms
pub use crate::utils::graph::{GraphBase, Predecessors, Successors};

/// Dominance computation results
pub use crate::utils::graph::algorithms::{DominatorTree, PostDominatorTree};
