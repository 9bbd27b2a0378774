//! Trait definitions for graph abstractions.
//!
//! This module defines the core traits that enable graph algorithms to work with
//! different graph implementations. By programming against these traits, algorithms
//! can be reused across various graph types without modification. The dominator
//! computation, for example, accepts any [`Successors`] implementation, which lets
//! the post-dominator tree run it over a reversed view of a control flow graph
//! without materializing the reversal.
//!
//! # Architecture
//!
//! The trait hierarchy is minimal and composable:
//!
//! - [`GraphBase`] - Core properties: node count and node iteration
//! - [`Successors`] - Forward edge traversal (outgoing edges)
//! - [`Predecessors`] - Backward edge traversal (incoming edges)
//!
//! # Design Principles
//!
//! ## Iterator-Based Traversal
//!
//! All adjacency queries return iterators rather than collections, enabling lazy
//! evaluation and avoiding unnecessary allocations for simple traversals.
//!
//! ## Minimal Requirements
//!
//! Each trait requires only what is necessary for its purpose, allowing different
//! graph implementations to provide only the capabilities they support.

use crate::utils::graph::NodeId;

/// Base trait providing core graph properties.
///
/// This trait defines the fundamental properties that all graphs must have:
/// the number of nodes and the ability to iterate over all node identifiers.
///
/// # Examples
///
/// ```rust
/// use depscope::graph::{DirectedGraph, GraphBase};
///
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// graph.add_node("A");
/// graph.add_node("B");
///
/// assert_eq!(GraphBase::node_count(&graph), 2);
/// ```
pub trait GraphBase {
    /// Returns the number of nodes in the graph.
    ///
    /// This count includes all nodes that have been added to the graph,
    /// regardless of their connectivity.
    fn node_count(&self) -> usize;

    /// Returns an iterator over all node identifiers in the graph.
    ///
    /// The iteration order is typically the order in which nodes were added
    /// to the graph (i.e., by ascending `NodeId` index).
    fn node_ids(&self) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support forward edge traversal.
///
/// This trait provides access to the successor nodes of any given node,
/// enabling forward graph traversal and algorithms that follow edges in
/// their natural direction.
///
/// # Examples
///
/// ```rust
/// use depscope::graph::{DirectedGraph, NodeId, Successors};
///
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let c = graph.add_node("C");
///
/// graph.add_edge(a, b, ())?;
/// graph.add_edge(a, c, ())?;
///
/// let successors: Vec<NodeId> = Successors::successors(&graph, a).collect();
/// assert_eq!(successors.len(), 2);
/// # Ok::<(), depscope::Error>(())
/// ```
pub trait Successors: GraphBase {
    /// Returns an iterator over the successor nodes of the given node.
    ///
    /// Successors are nodes that are targets of edges originating from the
    /// specified node. For a directed edge `(u, v)`, node `v` is a successor of `u`.
    ///
    /// # Arguments
    ///
    /// * `node` - The node whose successors to iterate
    ///
    /// # Panics
    ///
    /// May panic if `node` is not a valid node in the graph.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Trait for graphs that support backward edge traversal.
///
/// This trait provides access to the predecessor nodes of any given node,
/// enabling backward graph traversal and algorithms that need to follow edges
/// in reverse.
///
/// # Examples
///
/// ```rust
/// use depscope::graph::{DirectedGraph, NodeId, Predecessors};
///
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let c = graph.add_node("C");
///
/// graph.add_edge(a, c, ())?;
/// graph.add_edge(b, c, ())?;
///
/// let predecessors: Vec<NodeId> = Predecessors::predecessors(&graph, c).collect();
/// assert_eq!(predecessors.len(), 2);
/// # Ok::<(), depscope::Error>(())
/// ```
pub trait Predecessors: GraphBase {
    /// Returns an iterator over the predecessor nodes of the given node.
    ///
    /// Predecessors are nodes that are sources of edges targeting the
    /// specified node. For a directed edge `(u, v)`, node `u` is a predecessor of `v`.
    ///
    /// # Arguments
    ///
    /// * `node` - The node whose predecessors to iterate
    ///
    /// # Panics
    ///
    /// May panic if `node` is not a valid node in the graph.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}
