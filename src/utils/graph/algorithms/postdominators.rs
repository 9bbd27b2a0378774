//! Post-dominator tree computation.
//!
//! A node `p` **post-dominates** a node `n` if every path from `n` to an exit of
//! the graph must pass through `p`. Post-dominance is dominance on the reversed
//! graph, so this module reuses the Lengauer-Tarjan machinery from
//! [`dominators`](crate::utils::graph::algorithms::dominators) over a reversed
//! view of the input.
//!
//! # Virtual exit
//!
//! A graph may have several exit nodes (no outgoing edges). To give the reversed
//! graph a single root, the computation introduces a **virtual exit** node with
//! id equal to the original node count, with an edge from every real exit to it.
//! The virtual exit is the root of the post-dominator tree; it carries no data
//! and callers skip it when mapping tree nodes back to graph nodes.
//!
//! # Requirements on the input
//!
//! Every node must be able to reach an exit. A graph with no exit nodes at all,
//! or with nodes trapped in an inescapable cycle, has no total post-dominance
//! relation; construction fails rather than returning partial answers.

use crate::{
    utils::graph::{
        algorithms::{
            dominators::{compute_dominators, DominatorIterator, DominatorTree},
            traversal::dfs,
        },
        GraphBase, NodeId, Predecessors, Successors,
    },
    Error, Result,
};

/// Reversed view of a graph, augmented with a virtual exit node.
///
/// Successors in this view are predecessors in the underlying graph; the
/// virtual exit's successors are the real exit nodes.
struct ReversedView<'g, G> {
    graph: &'g G,
    exits: Vec<NodeId>,
    virtual_exit: NodeId,
}

impl<G: GraphBase> GraphBase for ReversedView<'_, G> {
    fn node_count(&self) -> usize {
        self.graph.node_count() + 1
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.node_count()).map(NodeId::new)
    }
}

impl<G: Successors + Predecessors> Successors for ReversedView<'_, G> {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        let targets: Vec<NodeId> = if node == self.virtual_exit {
            self.exits.clone()
        } else {
            self.graph.predecessors(node).collect()
        };
        targets.into_iter()
    }
}

/// Result of post-dominator tree computation.
///
/// The tree is rooted at a virtual exit node whose id is the original graph's
/// node count. Each real node's parent is its nearest post-dominator; real exit
/// nodes are direct children of the virtual exit.
///
/// # Examples
///
/// ```rust
/// use depscope::graph::{algorithms::compute_post_dominators, DirectedGraph};
///
/// // Diamond: entry -> a, entry -> b, a -> exit, b -> exit
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let entry = graph.add_node("entry");
/// let a = graph.add_node("a");
/// let b = graph.add_node("b");
/// let exit = graph.add_node("exit");
///
/// graph.add_edge(entry, a, ())?;
/// graph.add_edge(entry, b, ())?;
/// graph.add_edge(a, exit, ())?;
/// graph.add_edge(b, exit, ())?;
///
/// let pdt = compute_post_dominators(&graph)?;
///
/// // exit post-dominates every node
/// assert!(pdt.post_dominates(exit, entry));
/// // a does not post-dominate entry (the path through b avoids it)
/// assert!(!pdt.post_dominates(a, entry));
/// // entry's nearest post-dominator is exit
/// assert_eq!(pdt.immediate_post_dominator(entry), Some(exit));
/// # Ok::<(), depscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PostDominatorTree {
    /// Dominator tree of the reversed, exit-augmented graph
    tree: DominatorTree,
    /// The virtual exit node (root of the tree)
    virtual_exit: NodeId,
}

impl PostDominatorTree {
    /// Returns the virtual exit node, the root of the post-dominator tree.
    ///
    /// This node does not exist in the analyzed graph; its id equals the
    /// graph's node count.
    #[inline]
    pub fn virtual_exit(&self) -> NodeId {
        self.virtual_exit
    }

    /// Returns `true` if the given tree node is the virtual exit.
    #[inline]
    pub fn is_virtual_exit(&self, node: NodeId) -> bool {
        node == self.virtual_exit
    }

    /// Returns the nearest post-dominator of a node, or `None` for the
    /// virtual exit.
    ///
    /// For a real exit node this is the virtual exit.
    ///
    /// # Panics
    ///
    /// Panics if the node index is out of bounds.
    #[inline]
    pub fn immediate_post_dominator(&self, node: NodeId) -> Option<NodeId> {
        self.tree.immediate_dominator(node)
    }

    /// Checks if node `a` post-dominates node `b`.
    ///
    /// A node post-dominates itself. The virtual exit post-dominates every node.
    pub fn post_dominates(&self, a: NodeId, b: NodeId) -> bool {
        self.tree.dominates(a, b)
    }

    /// Checks if node `a` strictly post-dominates node `b`.
    ///
    /// Strict post-dominance excludes the reflexive case: a strictly
    /// post-dominates b iff a post-dominates b and a ≠ b.
    #[inline]
    pub fn strictly_post_dominates(&self, a: NodeId, b: NodeId) -> bool {
        self.tree.strictly_dominates(a, b)
    }

    /// Returns the nearest common ancestor of two nodes in the post-dominator
    /// tree.
    ///
    /// The result is the deepest tree node that post-dominates both `a` and `b`.
    /// It may be one of the inputs, or the virtual exit.
    pub fn nearest_common_ancestor(&self, a: NodeId, b: NodeId) -> NodeId {
        let mut x = a;
        let mut y = b;
        let mut depth_x = self.tree.depth(x);
        let mut depth_y = self.tree.depth(y);

        // Lift the deeper node until both sit at the same depth
        while depth_x > depth_y {
            if let Some(parent) = self.tree.immediate_dominator(x) {
                x = parent;
                depth_x -= 1;
            } else {
                break;
            }
        }
        while depth_y > depth_x {
            if let Some(parent) = self.tree.immediate_dominator(y) {
                y = parent;
                depth_y -= 1;
            } else {
                break;
            }
        }

        // Lift both in lock-step until they meet (at worst at the root)
        while x != y {
            match (
                self.tree.immediate_dominator(x),
                self.tree.immediate_dominator(y),
            ) {
                (Some(px), Some(py)) => {
                    x = px;
                    y = py;
                }
                _ => break,
            }
        }

        x
    }

    /// Returns an iterator over the tree ancestors of a node, starting with
    /// the node itself and ending at the virtual exit.
    pub fn ancestors(&self, node: NodeId) -> DominatorIterator<'_> {
        self.tree.dominators(node)
    }

    /// Returns the depth of a node in the post-dominator tree.
    ///
    /// The virtual exit has depth 0.
    #[inline]
    pub fn depth(&self, node: NodeId) -> usize {
        self.tree.depth(node)
    }

    /// Returns a post-order traversal of all tree nodes, children before
    /// parents, ending with the virtual exit.
    ///
    /// This is the processing order used by passes that must see a node only
    /// after all nodes it post-dominates.
    pub fn post_order(&self) -> Vec<NodeId> {
        let total = self.tree.node_count();

        // Child lists of the tree, built once from the parent pointers
        let mut children: Vec<Vec<NodeId>> = vec![Vec::new(); total];
        for i in 0..total {
            let node = NodeId::new(i);
            if let Some(parent) = self.tree.immediate_dominator(node) {
                children[parent.index()].push(node);
            }
        }

        #[derive(Clone, Copy)]
        enum State {
            Enter,
            Exit,
        }

        let mut result = Vec::with_capacity(total);
        let mut stack = vec![(self.virtual_exit, State::Enter)];

        while let Some((node, state)) = stack.pop() {
            match state {
                State::Enter => {
                    stack.push((node, State::Exit));
                    for &child in children[node.index()].iter().rev() {
                        stack.push((child, State::Enter));
                    }
                }
                State::Exit => {
                    result.push(node);
                }
            }
        }

        result
    }

    /// Returns the total number of tree nodes, including the virtual exit.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.tree.node_count()
    }
}

/// Computes the post-dominator tree of a graph.
///
/// The graph is reversed, augmented with a virtual exit node connected to every
/// real exit, and run through the Lengauer-Tarjan dominator computation rooted
/// at the virtual exit.
///
/// # Arguments
///
/// * `graph` - The graph to analyze
///
/// # Returns
///
/// A [`PostDominatorTree`] covering every node of the graph plus the virtual
/// exit.
///
/// # Errors
///
/// Returns [`Error::GraphError`] if the graph is empty, has no exit nodes
/// (every node has outgoing edges), or contains nodes that cannot reach any
/// exit. Post-dominance is undefined for such nodes, and partial trees would
/// silently produce wrong dependence answers downstream.
///
/// # Examples
///
/// ```rust
/// use depscope::graph::{algorithms::compute_post_dominators, DirectedGraph};
///
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let a = graph.add_node("a");
/// let b = graph.add_node("b");
/// graph.add_edge(a, b, ())?;
/// // b -> a as well: no node can exit
/// graph.add_edge(b, a, ())?;
///
/// assert!(compute_post_dominators(&graph).is_err());
/// # Ok::<(), depscope::Error>(())
/// ```
pub fn compute_post_dominators<G>(graph: &G) -> Result<PostDominatorTree>
where
    G: Successors + Predecessors,
{
    let node_count = graph.node_count();
    if node_count == 0 {
        return Err(Error::GraphError(
            "cannot compute post-dominators of an empty graph".to_string(),
        ));
    }

    let exits: Vec<NodeId> = graph
        .node_ids()
        .filter(|&node| graph.successors(node).next().is_none())
        .collect();
    if exits.is_empty() {
        return Err(Error::GraphError(
            "graph has no exit nodes; every node has outgoing edges".to_string(),
        ));
    }

    let virtual_exit = NodeId::new(node_count);
    let view = ReversedView {
        graph,
        exits,
        virtual_exit,
    };

    // Every node must reach an exit, i.e. be reachable from the virtual exit
    // in the reversed view
    let reachable = dfs(&view, virtual_exit).count();
    if reachable != node_count + 1 {
        return Err(Error::GraphError(format!(
            "{} node(s) cannot reach any exit node",
            node_count + 1 - reachable
        )));
    }

    let tree = compute_dominators(&view, virtual_exit);

    Ok(PostDominatorTree { tree, virtual_exit })
}

#[cfg(test)]
mod tests {
    use crate::utils::graph::{
        algorithms::postdominators::compute_post_dominators, DirectedGraph, NodeId,
    };

    #[test]
    fn test_post_dominator_linear_chain() {
        // a -> b -> c
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");

        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(b, c, ()).unwrap();

        let pdt = compute_post_dominators(&graph).unwrap();

        assert_eq!(pdt.virtual_exit(), NodeId::new(3));
        assert_eq!(pdt.node_count(), 4);

        // Chain of nearest post-dominators
        assert_eq!(pdt.immediate_post_dominator(a), Some(b));
        assert_eq!(pdt.immediate_post_dominator(b), Some(c));
        assert_eq!(pdt.immediate_post_dominator(c), Some(pdt.virtual_exit()));
        assert_eq!(pdt.immediate_post_dominator(pdt.virtual_exit()), None);

        // c post-dominates everything
        assert!(pdt.post_dominates(c, a));
        assert!(pdt.post_dominates(c, b));
        assert!(pdt.post_dominates(c, c));

        // a post-dominates nothing but itself
        assert!(!pdt.post_dominates(a, b));
        assert!(!pdt.post_dominates(a, c));

        // Ancestor chain walks from the node to the virtual exit inclusive
        let chain: Vec<_> = pdt.ancestors(a).collect();
        assert_eq!(chain, vec![a, b, c, pdt.virtual_exit()]);
    }

    #[test]
    fn test_post_dominator_diamond() {
        // entry -> a, entry -> b, a -> merge, b -> merge
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let entry = graph.add_node("entry");
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let merge = graph.add_node("merge");

        graph.add_edge(entry, a, ()).unwrap();
        graph.add_edge(entry, b, ()).unwrap();
        graph.add_edge(a, merge, ()).unwrap();
        graph.add_edge(b, merge, ()).unwrap();

        let pdt = compute_post_dominators(&graph).unwrap();

        // merge post-dominates both arms and the entry
        assert!(pdt.post_dominates(merge, a));
        assert!(pdt.post_dominates(merge, b));
        assert!(pdt.post_dominates(merge, entry));

        // Neither arm post-dominates the entry
        assert!(!pdt.post_dominates(a, entry));
        assert!(!pdt.post_dominates(b, entry));

        // entry skips both arms; its nearest post-dominator is merge
        assert_eq!(pdt.immediate_post_dominator(entry), Some(merge));

        // Strict variant excludes the reflexive case
        assert!(pdt.strictly_post_dominates(merge, entry));
        assert!(!pdt.strictly_post_dominates(merge, merge));
    }

    #[test]
    fn test_post_dominator_multiple_exits() {
        // entry -> a, entry -> b; both a and b are exits
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let entry = graph.add_node("entry");
        let a = graph.add_node("a");
        let b = graph.add_node("b");

        graph.add_edge(entry, a, ()).unwrap();
        graph.add_edge(entry, b, ()).unwrap();

        let pdt = compute_post_dominators(&graph).unwrap();

        // Both exits hang off the virtual exit
        assert_eq!(pdt.immediate_post_dominator(a), Some(pdt.virtual_exit()));
        assert_eq!(pdt.immediate_post_dominator(b), Some(pdt.virtual_exit()));

        // Neither exit post-dominates the entry; only the virtual exit does
        assert!(!pdt.post_dominates(a, entry));
        assert!(!pdt.post_dominates(b, entry));
        assert!(pdt.post_dominates(pdt.virtual_exit(), entry));
        assert_eq!(
            pdt.immediate_post_dominator(entry),
            Some(pdt.virtual_exit())
        );
    }

    #[test]
    fn test_post_dominator_loop() {
        // entry -> header; header -> body; body -> header; header -> exit
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let entry = graph.add_node("entry");
        let header = graph.add_node("header");
        let body = graph.add_node("body");
        let exit = graph.add_node("exit");

        graph.add_edge(entry, header, ()).unwrap();
        graph.add_edge(header, body, ()).unwrap();
        graph.add_edge(body, header, ()).unwrap();
        graph.add_edge(header, exit, ()).unwrap();

        let pdt = compute_post_dominators(&graph).unwrap();

        // header post-dominates the body (the only way out is back through it)
        assert!(pdt.post_dominates(header, body));
        assert!(pdt.post_dominates(exit, header));
        assert_eq!(pdt.immediate_post_dominator(body), Some(header));
    }

    #[test]
    fn test_nearest_common_ancestor() {
        // entry -> a, entry -> b, a -> merge, b -> merge
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let entry = graph.add_node("entry");
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let merge = graph.add_node("merge");

        graph.add_edge(entry, a, ()).unwrap();
        graph.add_edge(entry, b, ()).unwrap();
        graph.add_edge(a, merge, ()).unwrap();
        graph.add_edge(b, merge, ()).unwrap();

        let pdt = compute_post_dominators(&graph).unwrap();

        // The arms meet at merge
        assert_eq!(pdt.nearest_common_ancestor(a, b), merge);
        // An ancestor of the other input is the answer itself
        assert_eq!(pdt.nearest_common_ancestor(merge, a), merge);
        assert_eq!(pdt.nearest_common_ancestor(entry, merge), merge);
        // Reflexive
        assert_eq!(pdt.nearest_common_ancestor(a, a), a);
    }

    #[test]
    fn test_post_order_children_before_parents() {
        // entry -> a, entry -> b, a -> merge, b -> merge
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let entry = graph.add_node("entry");
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let merge = graph.add_node("merge");

        graph.add_edge(entry, a, ()).unwrap();
        graph.add_edge(entry, b, ()).unwrap();
        graph.add_edge(a, merge, ()).unwrap();
        graph.add_edge(b, merge, ()).unwrap();

        let pdt = compute_post_dominators(&graph).unwrap();
        let order = pdt.post_order();

        // Every node appears exactly once, virtual exit last
        assert_eq!(order.len(), 5);
        assert_eq!(*order.last().unwrap(), pdt.virtual_exit());

        // A node always appears before its tree parent
        let pos = |n: NodeId| order.iter().position(|&x| x == n).unwrap();
        for node in [entry, a, b, merge] {
            let parent = pdt.immediate_post_dominator(node).unwrap();
            assert!(pos(node) < pos(parent), "{node} must precede {parent}");
        }
    }

    #[test]
    fn test_empty_graph_rejected() {
        let graph: DirectedGraph<(), ()> = DirectedGraph::new();
        assert!(compute_post_dominators(&graph).is_err());
    }

    #[test]
    fn test_no_exit_rejected() {
        // Two-node cycle, no exits at all
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(b, a, ()).unwrap();

        let err = compute_post_dominators(&graph).unwrap_err();
        assert!(err.to_string().contains("no exit"));
    }

    #[test]
    fn test_inescapable_cycle_rejected() {
        // entry -> exit, but also entry -> trap1 <-> trap2 with no way out
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let entry = graph.add_node("entry");
        let exit = graph.add_node("exit");
        let trap1 = graph.add_node("trap1");
        let trap2 = graph.add_node("trap2");

        graph.add_edge(entry, exit, ()).unwrap();
        graph.add_edge(entry, trap1, ()).unwrap();
        graph.add_edge(trap1, trap2, ()).unwrap();
        graph.add_edge(trap2, trap1, ()).unwrap();

        let err = compute_post_dominators(&graph).unwrap_err();
        assert!(err.to_string().contains("cannot reach"));
    }

    #[test]
    fn test_single_node() {
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let only = graph.add_node("only");

        let pdt = compute_post_dominators(&graph).unwrap();

        assert_eq!(pdt.immediate_post_dominator(only), Some(pdt.virtual_exit()));
        assert!(pdt.post_dominates(pdt.virtual_exit(), only));
        assert_eq!(pdt.post_order(), vec![only, pdt.virtual_exit()]);
    }

    #[test]
    fn test_depth() {
        // a -> b -> c
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");

        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(b, c, ()).unwrap();

        let pdt = compute_post_dominators(&graph).unwrap();

        assert_eq!(pdt.depth(pdt.virtual_exit()), 0);
        assert_eq!(pdt.depth(c), 1);
        assert_eq!(pdt.depth(b), 2);
        assert_eq!(pdt.depth(a), 3);
    }
}
