//! The per-function control dependence graph.
//!
//! This module provides [`ControlDependenceGraph`], the arena owning every
//! dependence node built for one function, together with the query API, the
//! depth-first traversal, and the DOT renderer.

use std::{
    collections::{HashMap, VecDeque},
    fmt::Write,
};

use crate::{
    analysis::{
        cdg::{
            builder::CdgBuilder,
            node::{CdgNodeId, ControlDependenceNode},
            trace::{BuildTrace, NullTrace},
        },
        cfg::ControlFlowGraph,
    },
    utils::{escape_dot, graph::NodeId, BitSet},
    Error::GraphError,
    Result,
};

/// The control dependence graph of one function.
///
/// Owns every node created for the function: one per basic block, the root
/// region, and the synthetic regions introduced by canonicalization. Nodes
/// are addressed by stable [`CdgNodeId`]s; basic blocks are resolved to
/// their nodes through [`node_for`](Self::node_for).
///
/// # Construction
///
/// [`build`](Self::build) runs the two construction phases over the CFG's
/// post-dominator tree: dependence propagation followed by region
/// insertion. After that the graph is immutable and only queried. Blocks
/// keep their [`NodeId`]s from the originating [`ControlFlowGraph`]; the
/// graph holds no reference to the CFG itself.
///
/// # Queries
///
/// - [`controls`](Self::controls) - strict single-chain dependence
/// - [`influences`](Self::influences) - dependence through any parent path
/// - [`enclosing_region`](Self::enclosing_region) - a block's region
///
/// # Examples
///
/// ```rust
/// use depscope::analysis::{BasicBlock, ControlDependenceGraph, ControlFlowGraph, Terminator};
///
/// // if/else diamond
/// let cfg = ControlFlowGraph::from_blocks(vec![
///     BasicBlock::new(0, Terminator::Other { targets: vec![1] }),
///     BasicBlock::new(1, Terminator::Conditional { true_target: 2, false_target: 3 }),
///     BasicBlock::new(2, Terminator::Other { targets: vec![4] }),
///     BasicBlock::new(3, Terminator::Other { targets: vec![4] }),
///     BasicBlock::new(4, Terminator::Other { targets: vec![] }),
/// ])?;
/// let cdg = ControlDependenceGraph::build(&cfg)?;
///
/// let cond = cfg.block_node(1).unwrap();
/// let then_block = cfg.block_node(2).unwrap();
/// let merge = cfg.block_node(4).unwrap();
///
/// assert!(cdg.controls(cond, then_block)?);
/// assert!(!cdg.controls(cond, merge)?);
/// # Ok::<(), depscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ControlDependenceGraph {
    /// Node arena; the root region is always index 0.
    nodes: Vec<ControlDependenceNode>,
    /// The root region standing for "function entry".
    root: CdgNodeId,
    /// Basic block to dependence node lookup.
    block_nodes: HashMap<NodeId, CdgNodeId>,
}

impl ControlDependenceGraph {
    /// Builds the control dependence graph of a function.
    ///
    /// Runs dependence propagation and region insertion over the CFG's
    /// post-dominator tree, which is computed on first use and cached on
    /// the CFG.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`](crate::Error::Malformed) if the
    /// function has no exit block or contains blocks that cannot reach an
    /// exit; post-dominance is undefined for such inputs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use depscope::analysis::{BasicBlock, ControlDependenceGraph, ControlFlowGraph, Terminator};
    ///
    /// let cfg = ControlFlowGraph::from_blocks(vec![
    ///     BasicBlock::new(0, Terminator::Other { targets: vec![] }),
    /// ])?;
    /// let cdg = ControlDependenceGraph::build(&cfg)?;
    ///
    /// // One node per block plus the root region
    /// assert_eq!(cdg.node_count(), 2);
    /// # Ok::<(), depscope::Error>(())
    /// ```
    pub fn build(cfg: &ControlFlowGraph<'_>) -> Result<Self> {
        Self::build_traced(cfg, &mut NullTrace)
    }

    /// Builds the control dependence graph, reporting construction
    /// checkpoints to the given trace.
    ///
    /// The trace observes edge classification, every recorded dependence
    /// edge, and region creation and merging. See [`BuildTrace`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`build`](Self::build).
    pub fn build_traced(cfg: &ControlFlowGraph<'_>, trace: &mut dyn BuildTrace) -> Result<Self> {
        let pdt = cfg.post_dominators()?;

        let mut builder = CdgBuilder::new(cfg);
        builder.compute_dependencies(pdt, trace)?;
        builder.insert_regions(pdt, trace)?;

        let (nodes, root, block_nodes) = builder.finish();
        Ok(ControlDependenceGraph {
            nodes,
            root,
            block_nodes,
        })
    }

    /// Returns the root region node.
    ///
    /// The root stands for "the function is entered"; blocks that execute
    /// on every run hang below it.
    #[must_use]
    pub const fn root(&self) -> CdgNodeId {
        self.root
    }

    /// Returns a reference to the node with the given id, or `None` if the
    /// id is out of range.
    #[must_use]
    pub fn node(&self, id: CdgNodeId) -> Option<&ControlDependenceNode> {
        self.nodes.get(id.index())
    }

    /// Returns the dependence node of a basic block, or `None` if the
    /// block is not part of this graph.
    #[must_use]
    pub fn node_for(&self, block: NodeId) -> Option<CdgNodeId> {
        self.block_nodes.get(&block).copied()
    }

    /// Returns the total number of nodes, regions included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns an iterator over all node ids in the arena.
    pub fn node_ids(&self) -> impl Iterator<Item = CdgNodeId> + '_ {
        (0..self.nodes.len()).map(CdgNodeId::new)
    }

    /// Returns an iterator over all nodes with their ids.
    pub fn nodes(&self) -> impl Iterator<Item = (CdgNodeId, &ControlDependenceNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (CdgNodeId::new(index), node))
    }

    /// Checks whether block `a`'s branch outcome alone decides that block
    /// `b` executes.
    ///
    /// The test walks upward from `b`'s node through the chain of nodes
    /// with exactly one parent; it holds when some node on that chain
    /// carries block `a`. The walk ends the first time a node has zero or
    /// several parents, and a revisited node means the chain cycles
    /// without reaching `a`.
    ///
    /// This is the strict dependence test; see
    /// [`influences`](Self::influences) for the transitive one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`](crate::Error::GraphError) if either
    /// block is not part of this graph.
    pub fn controls(&self, a: NodeId, b: NodeId) -> Result<bool> {
        self.require_node(a)?;
        let start = self.require_node(b)?;

        let mut visited = BitSet::new(self.nodes.len());
        let mut current = start;
        loop {
            if visited.contains(current.index()) {
                return Ok(false);
            }
            visited.insert(current.index());

            match self.nodes[current.index()].sole_parent() {
                Some(parent) => {
                    current = parent;
                    if self.nodes[current.index()].block() == Some(a) {
                        return Ok(true);
                    }
                }
                None => return Ok(false),
            }
        }
    }

    /// Checks whether block `a`'s branch outcome takes part in deciding
    /// that block `b` executes, through any chain of dependence parents.
    ///
    /// The search runs breadth-first over the parent relation, starting
    /// from `b`'s parents rather than `b` itself, so a block that decides
    /// its own re-execution (a loop header) influences itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`](crate::Error::GraphError) if either
    /// block is not part of this graph.
    pub fn influences(&self, a: NodeId, b: NodeId) -> Result<bool> {
        self.require_node(a)?;
        let start = self.require_node(b)?;

        let mut visited = BitSet::new(self.nodes.len());
        let mut queue = VecDeque::new();
        for &parent in self.nodes[start.index()].parents() {
            visited.insert(parent.index());
            queue.push_back(parent);
        }

        while let Some(current) = queue.pop_front() {
            if self.nodes[current.index()].block() == Some(a) {
                return Ok(true);
            }
            for &parent in self.nodes[current.index()].parents() {
                if !visited.contains(parent.index()) {
                    visited.insert(parent.index());
                    queue.push_back(parent);
                }
            }
        }

        Ok(false)
    }

    /// Returns the region enclosing a basic block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`](crate::Error::GraphError) if the
    /// block is not part of this graph, or if the canonical structure is
    /// violated (see [`enclosing_region_of`](Self::enclosing_region_of)).
    pub fn enclosing_region(&self, block: NodeId) -> Result<CdgNodeId> {
        let node = self.require_node(block)?;
        self.enclosing_region_of(node)
    }

    /// Returns the region enclosing a node.
    ///
    /// A region is its own enclosing region. For a block node,
    /// canonicalization guarantees exactly one parent and that parent is a
    /// region; this method reports a violation instead of patching around
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`](crate::Error::GraphError) if the id
    /// is out of range, or if a block node does not have exactly one
    /// region parent.
    pub fn enclosing_region_of(&self, node: CdgNodeId) -> Result<CdgNodeId> {
        let data = self
            .node(node)
            .ok_or_else(|| GraphError(format!("node {node} does not exist in this graph")))?;

        if data.is_region() {
            return Ok(node);
        }

        let parent = data.sole_parent().ok_or_else(|| {
            GraphError(format!(
                "node {node} has {} parents after canonicalization; expected exactly one",
                data.parent_count()
            ))
        })?;

        if self.nodes[parent.index()].is_region() {
            Ok(parent)
        } else {
            Err(GraphError(format!(
                "sole parent {parent} of node {node} is not a region"
            )))
        }
    }

    /// Returns a depth-first preorder iterator over the nodes reachable
    /// from the root.
    ///
    /// Children are visited true first, then false, then other. Regions
    /// shared between parents and self-referential edges are visited once;
    /// the iterator carries its own visited set.
    #[must_use]
    pub fn dfs(&self) -> CdgDfsIterator<'_> {
        CdgDfsIterator::new(self, self.root)
    }

    /// Generates a DOT format representation of this graph.
    ///
    /// Region nodes are labeled `REGION`; block nodes carry their block's
    /// name (or `bb<id>`), resolved through the CFG the graph was built
    /// from. Edges carry `T`/`F` labels for branch dependence and stay
    /// unlabeled for other dependence. Only the subgraph reachable from
    /// the root is emitted.
    ///
    /// # Arguments
    ///
    /// * `cfg` - The control flow graph this graph was built from
    /// * `title` - Optional title for the graph (e.g., function name)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use depscope::analysis::{BasicBlock, ControlDependenceGraph, ControlFlowGraph, Terminator};
    ///
    /// let cfg = ControlFlowGraph::from_blocks(vec![
    ///     BasicBlock::new(0, Terminator::Other { targets: vec![] }).with_name("entry"),
    /// ])?;
    /// let cdg = ControlDependenceGraph::build(&cfg)?;
    ///
    /// let dot = cdg.to_dot(&cfg, Some("tiny"));
    /// assert!(dot.contains("digraph CDG"));
    /// assert!(dot.contains("REGION"));
    /// assert!(dot.contains("entry"));
    /// # Ok::<(), depscope::Error>(())
    /// ```
    #[must_use]
    pub fn to_dot(&self, cfg: &ControlFlowGraph<'_>, title: Option<&str>) -> String {
        let mut dot = String::new();

        dot.push_str("digraph CDG {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"CDG: {}\";", escape_dot(name));
        }
        dot.push_str("    labelloc=t;\n");
        dot.push_str("    node [fontname=\"Courier\", fontsize=10];\n");
        dot.push_str("    edge [fontname=\"Courier\", fontsize=9];\n\n");

        let reachable: Vec<CdgNodeId> = self.dfs().collect();

        for &id in &reachable {
            let node = &self.nodes[id.index()];
            match node.block() {
                None => {
                    let style = if id == self.root {
                        ", style=filled, fillcolor=lightgreen"
                    } else {
                        ""
                    };
                    let _ = writeln!(dot, "    {id} [label=\"REGION\", shape=ellipse{style}];");
                }
                Some(block) => {
                    let label = cfg
                        .block(block)
                        .map_or_else(|| block.to_string(), |data| data.label());
                    let _ = writeln!(
                        dot,
                        "    {id} [label=\"{}\", shape=box];",
                        escape_dot(&label)
                    );
                }
            }
        }

        dot.push('\n');

        for &id in &reachable {
            for (kind, child) in self.nodes[id.index()].tagged_children() {
                let color = match kind.label() {
                    "T" => "green",
                    "F" => "red",
                    _ => "black",
                };
                if kind.label().is_empty() {
                    let _ = writeln!(dot, "    {id} -> {child} [color={color}];");
                } else {
                    let _ = writeln!(
                        dot,
                        "    {id} -> {child} [label=\"{}\", color={color}];",
                        kind.label()
                    );
                }
            }
        }

        dot.push_str("}\n");
        dot
    }

    /// Looks up a block's node, failing when the block is foreign to this
    /// graph.
    fn require_node(&self, block: NodeId) -> Result<CdgNodeId> {
        self.node_for(block).ok_or_else(|| {
            GraphError(format!(
                "block {block} is not part of this control dependence graph"
            ))
        })
    }
}

/// Depth-first preorder iterator over a control dependence graph.
///
/// Visits each node reachable from the start exactly once; children are
/// explored true first, then false, then other. Created by
/// [`ControlDependenceGraph::dfs`].
pub struct CdgDfsIterator<'a> {
    graph: &'a ControlDependenceGraph,
    stack: Vec<CdgNodeId>,
    visited: BitSet,
}

impl<'a> CdgDfsIterator<'a> {
    fn new(graph: &'a ControlDependenceGraph, start: CdgNodeId) -> Self {
        let mut visited = BitSet::new(graph.node_count());
        let mut stack = Vec::new();
        if start.index() < graph.node_count() {
            visited.insert(start.index());
            stack.push(start);
        }
        CdgDfsIterator {
            graph,
            stack,
            visited,
        }
    }
}

impl Iterator for CdgDfsIterator<'_> {
    type Item = CdgNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Push unvisited children in reverse tag order so true children
        // pop first
        let children: Vec<CdgNodeId> = self.graph.nodes[node.index()]
            .tagged_children()
            .map(|(_, child)| child)
            .collect();
        for &child in children.iter().rev() {
            if !self.visited.contains(child.index()) {
                self.visited.insert(child.index());
                self.stack.push(child);
            }
        }

        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::cfg::{BasicBlock, Terminator};
    use crate::Error;

    fn make_block(id: usize, targets: Vec<usize>) -> BasicBlock {
        BasicBlock::new(id, Terminator::Other { targets })
    }

    fn make_branch(id: usize, true_target: usize, false_target: usize) -> BasicBlock {
        BasicBlock::new(
            id,
            Terminator::Conditional {
                true_target,
                false_target,
            },
        )
    }

    /// entry -> cond; cond -true-> x; cond -false-> y; x, y -> merge; merge exits.
    fn diamond() -> ControlFlowGraph<'static> {
        ControlFlowGraph::from_blocks(vec![
            make_block(0, vec![1]),
            make_branch(1, 2, 3),
            make_block(2, vec![4]),
            make_block(3, vec![4]),
            make_block(4, vec![]),
        ])
        .unwrap()
    }

    /// entry -> header; header -true-> body -> header; header -false-> exit.
    fn while_loop() -> ControlFlowGraph<'static> {
        ControlFlowGraph::from_blocks(vec![
            make_block(0, vec![1]),
            make_branch(1, 2, 3),
            make_block(2, vec![1]),
            make_block(3, vec![]),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_block_graph() {
        let cfg = ControlFlowGraph::from_blocks(vec![make_block(0, vec![])]).unwrap();
        let cdg = ControlDependenceGraph::build(&cfg).unwrap();

        // The block node plus the root region
        assert_eq!(cdg.node_count(), 2);
        assert!(cdg.node(cdg.root()).unwrap().is_region());

        let only = cfg.block_node(0).unwrap();
        assert_eq!(cdg.enclosing_region(only).unwrap(), cdg.root());
    }

    #[test]
    fn test_diamond_controls() {
        let cfg = diamond();
        let cdg = ControlDependenceGraph::build(&cfg).unwrap();

        let cond = cfg.block_node(1).unwrap();
        let x = cfg.block_node(2).unwrap();
        let y = cfg.block_node(3).unwrap();
        let merge = cfg.block_node(4).unwrap();

        assert!(cdg.controls(cond, x).unwrap());
        assert!(cdg.controls(cond, y).unwrap());
        assert!(!cdg.controls(cond, merge).unwrap());
        assert!(!cdg.influences(cond, merge).unwrap());

        // The merge block answers to nothing but function entry
        let merge_node = cdg.node_for(merge).unwrap();
        assert_eq!(cdg.node(merge_node).unwrap().sole_parent(), Some(cdg.root()));
    }

    #[test]
    fn test_controls_implies_influences() {
        for cfg in [diamond(), while_loop()] {
            let cdg = ControlDependenceGraph::build(&cfg).unwrap();
            for a in cfg.node_ids() {
                for b in cfg.node_ids() {
                    if cdg.controls(a, b).unwrap() {
                        assert!(
                            cdg.influences(a, b).unwrap(),
                            "controls({a}, {b}) without influences"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_loop_header_influences_itself() {
        let cfg = while_loop();
        let cdg = ControlDependenceGraph::build(&cfg).unwrap();

        let header = cfg.block_node(1).unwrap();
        let body = cfg.block_node(2).unwrap();

        assert!(cdg.influences(header, header).unwrap());
        assert!(cdg.influences(header, body).unwrap());
        assert!(cdg.controls(header, body).unwrap());

        // The strict chain above the header runs through shared regions
        assert!(!cdg.controls(header, header).unwrap());
    }

    #[test]
    fn test_queries_reject_foreign_blocks() {
        let cfg = diamond();
        let cdg = ControlDependenceGraph::build(&cfg).unwrap();

        let inside = cfg.block_node(0).unwrap();
        let foreign = crate::utils::graph::NodeId::new(99);

        assert!(matches!(
            cdg.controls(foreign, inside),
            Err(Error::GraphError(_))
        ));
        assert!(matches!(
            cdg.influences(inside, foreign),
            Err(Error::GraphError(_))
        ));
        assert!(matches!(
            cdg.enclosing_region(foreign),
            Err(Error::GraphError(_))
        ));
    }

    #[test]
    fn test_enclosing_regions_of_diamond() {
        let cfg = diamond();
        let cdg = ControlDependenceGraph::build(&cfg).unwrap();

        let x = cfg.block_node(2).unwrap();
        let y = cfg.block_node(3).unwrap();

        let x_region = cdg.enclosing_region(x).unwrap();
        let y_region = cdg.enclosing_region(y).unwrap();

        assert!(cdg.node(x_region).unwrap().is_region());
        assert!(cdg.node(y_region).unwrap().is_region());
        assert_ne!(x_region, y_region);

        // A region encloses itself
        assert_eq!(cdg.enclosing_region_of(x_region).unwrap(), x_region);

        // Blocks that always execute live directly under the root
        let entry = cfg.block_node(0).unwrap();
        assert_eq!(cdg.enclosing_region(entry).unwrap(), cdg.root());
    }

    #[test]
    fn test_every_node_keeps_an_exclusive_tag() {
        let cfg = while_loop();
        let cdg = ControlDependenceGraph::build(&cfg).unwrap();

        for (_, node) in cdg.nodes() {
            assert_eq!(node.is_region(), node.block().is_none());
            if let Some(block) = node.block() {
                assert!(cfg.block(block).is_some());
            }
        }
    }

    #[test]
    fn test_branch_fanout_is_bounded() {
        for cfg in [diamond(), while_loop()] {
            let cdg = ControlDependenceGraph::build(&cfg).unwrap();
            for (_, node) in cdg.nodes() {
                if !node.is_region() {
                    assert!(node.true_children().len() <= 1);
                    assert!(node.false_children().len() <= 1);
                }
            }
        }
    }

    #[test]
    fn test_dfs_visits_reachable_nodes_once() {
        let cfg = while_loop();
        let cdg = ControlDependenceGraph::build(&cfg).unwrap();

        let order: Vec<CdgNodeId> = cdg.dfs().collect();
        assert_eq!(order[0], cdg.root());

        let mut sorted = order.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), order.len(), "dfs yielded a node twice");

        // The canonical graph hangs together: everything is reachable
        assert_eq!(order.len(), cdg.node_count());
    }

    #[test]
    fn test_to_dot_output() {
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_block(0, vec![1]).with_name("entry"),
            make_branch(1, 2, 3).with_name("cond"),
            make_block(2, vec![4]).with_name("then"),
            make_block(3, vec![4]).with_name("else"),
            make_block(4, vec![]).with_name("merge"),
        ])
        .unwrap();
        let cdg = ControlDependenceGraph::build(&cfg).unwrap();

        let dot = cdg.to_dot(&cfg, Some("branchy"));
        assert!(dot.contains("digraph CDG"));
        assert!(dot.contains("CDG: branchy"));
        assert!(dot.contains("REGION"));
        assert!(dot.contains("then"));
        assert!(dot.contains("label=\"T\""));
        assert!(dot.contains("label=\"F\""));
    }

    #[test]
    fn test_build_reports_missing_exit() {
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_block(0, vec![1]),
            make_block(1, vec![0]),
        ])
        .unwrap();

        assert!(matches!(
            ControlDependenceGraph::build(&cfg),
            Err(Error::Malformed { .. })
        ));
    }
}
