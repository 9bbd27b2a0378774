//! Graph algorithms for program analysis.
//!
//! This module provides the graph algorithms that back control dependence
//! analysis: traversal orders and dominance computations.
//!
//! # Available Algorithms
//!
//! ## Traversal
//!
//! - [`dfs`] - Depth-first search traversal
//! - [`postorder`] - Postorder traversal
//! - [`reverse_postorder`] - Reverse postorder traversal (useful for data flow)
//!
//! ## Dominator Analysis
//!
//! - [`compute_dominators`] - Compute the dominator tree using Lengauer-Tarjan
//! - [`compute_post_dominators`] - Compute the post-dominator tree over a
//!   reversed, exit-augmented view
//! - [`DominatorTree`] - Result of dominator computation
//! - [`PostDominatorTree`] - Result of post-dominator computation
//!
//! # Algorithm Selection
//!
//! | Algorithm | Time Complexity | Use Case |
//! |-----------|-----------------|----------|
//! | DFS | O(V + E) | General traversal, reachability |
//! | Postorder | O(V + E) | Bottom-up processing orders |
//! | Dominators | O(V α(V)) | Control flow structure |
//! | Post-dominators | O(V α(V)) | Control dependence analysis |
//!
//! # Examples
//!
//! ## Traversal
//!
//! ```rust
//! use depscope::graph::{algorithms, DirectedGraph, NodeId};
//!
//! let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
//! let a = graph.add_node("A");
//! let b = graph.add_node("B");
//! let c = graph.add_node("C");
//! graph.add_edge(a, b, ())?;
//! graph.add_edge(b, c, ())?;
//!
//! let order: Vec<NodeId> = algorithms::dfs(&graph, a).collect();
//! assert_eq!(order, vec![a, b, c]);
//! # Ok::<(), depscope::Error>(())
//! ```
//!
//! ## Dominance
//!
//! ```rust
//! use depscope::graph::{algorithms, DirectedGraph};
//!
//! let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
//! let entry = graph.add_node("entry");
//! let body = graph.add_node("body");
//! let exit = graph.add_node("exit");
//! graph.add_edge(entry, body, ())?;
//! graph.add_edge(body, exit, ())?;
//!
//! let dom_tree = algorithms::compute_dominators(&graph, entry);
//! assert!(dom_tree.dominates(entry, exit));
//!
//! let pdt = algorithms::compute_post_dominators(&graph)?;
//! assert!(pdt.post_dominates(exit, entry));
//! # Ok::<(), depscope::Error>(())
//! ```

mod dominators;
mod postdominators;
mod traversal;

// Re-export all public items
pub use dominators::{compute_dominators, DominatorIterator, DominatorTree};
pub use postdominators::{compute_post_dominators, PostDominatorTree};
pub use traversal::{dfs, postorder, reverse_postorder, DfsIterator};
