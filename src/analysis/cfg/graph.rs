//! Control Flow Graph implementation.
//!
//! This module provides the main [`ControlFlowGraph`] structure that wraps basic
//! blocks with proper graph semantics and provides access to edge classification
//! and the post-dominator tree consumed by the dependence analysis.

use std::{collections::HashMap, fmt::Write, sync::OnceLock};

use crate::{
    analysis::cfg::{BasicBlock, CfgEdgeKind, Terminator},
    utils::{
        escape_dot,
        graph::{
            algorithms::{self, PostDominatorTree},
            DirectedGraph, EdgeId, NodeId,
        },
        BitSet,
    },
    Error::GraphError,
    Result,
};

/// A control flow graph built from basic blocks.
///
/// The CFG provides a proper graph abstraction over basic blocks with efficient
/// traversal, edge classification, and post-dominator computation. It wraps an
/// underlying [`DirectedGraph`] and provides domain-specific accessors.
///
/// # Construction
///
/// Create a CFG from a block list using [`from_blocks`](Self::from_blocks). The
/// first block in the list is the function entry; terminator targets name
/// blocks by id, not by list position.
///
/// Construction validates the input: the list must be non-empty, block ids must
/// be unique, every target must name an existing block, and every block must be
/// reachable from the entry. Violations are reported as
/// [`Error::Malformed`](crate::Error::Malformed).
///
/// # Lazy Computation
///
/// The post-dominator tree is computed lazily on first access and cached. A
/// function with no exit block, or with blocks that cannot reach an exit, has
/// no post-dominance relation; the first access reports this as a malformed
/// input.
///
/// # Thread Safety
///
/// `ControlFlowGraph` is [`Send`] and [`Sync`]. The lazy-initialized
/// post-dominator tree uses [`OnceLock`] for thread-safe initialization.
///
/// # Lifetime Parameter
///
/// The `'a` lifetime represents the lifetime of borrowed block data:
/// - Use `ControlFlowGraph<'static>` for owned CFGs (blocks are `Cow::Owned`)
/// - Use `ControlFlowGraph<'a>` when borrowing blocks stored elsewhere
///
/// # Examples
///
/// ```rust
/// use depscope::analysis::{BasicBlock, ControlFlowGraph, Terminator};
///
/// let cfg = ControlFlowGraph::from_blocks(vec![
///     BasicBlock::new(0, Terminator::Conditional { true_target: 1, false_target: 2 }),
///     BasicBlock::new(1, Terminator::Other { targets: vec![2] }),
///     BasicBlock::new(2, Terminator::Other { targets: vec![] }),
/// ])?;
///
/// assert_eq!(cfg.block_count(), 3);
/// assert_eq!(cfg.exit_blocks().len(), 1);
/// # Ok::<(), depscope::Error>(())
/// ```
#[derive(Debug)]
pub struct ControlFlowGraph<'a> {
    /// The underlying directed graph structure.
    graph: DirectedGraph<'a, BasicBlock, CfgEdgeKind>,
    /// The entry block (always the first block of the input list).
    entry: NodeId,
    /// Blocks with no successors.
    exits: Vec<NodeId>,
    /// Block id to node lookup.
    block_index: HashMap<usize, NodeId>,
    /// Lazily computed post-dominator tree, or the failure message when the
    /// input has no total post-dominance relation.
    post_dominators: OnceLock<std::result::Result<PostDominatorTree, String>>,
}

impl ControlFlowGraph<'static> {
    /// Creates a new control flow graph from a vector of basic blocks.
    ///
    /// This constructor builds the CFG by:
    /// 1. Adding each basic block as a node
    /// 2. Resolving terminator targets into typed edges
    /// 3. Identifying the entry and the exit blocks
    ///
    /// # Arguments
    ///
    /// * `blocks` - The basic blocks of one function; the first is the entry
    ///
    /// # Returns
    ///
    /// A new `ControlFlowGraph` or an error if validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`](crate::Error::Malformed) if:
    /// - The block list is empty
    /// - Two blocks share an id
    /// - A terminator target names no block
    /// - A block is unreachable from the entry
    ///
    /// # Examples
    ///
    /// ```rust
    /// use depscope::analysis::{BasicBlock, ControlFlowGraph, Terminator};
    ///
    /// let cfg = ControlFlowGraph::from_blocks(vec![
    ///     BasicBlock::new(0, Terminator::Other { targets: vec![1] }),
    ///     BasicBlock::new(1, Terminator::Other { targets: vec![] }),
    /// ])?;
    /// assert_eq!(cfg.entry(), cfg.block_node(0).unwrap());
    /// # Ok::<(), depscope::Error>(())
    /// ```
    pub fn from_blocks(blocks: Vec<BasicBlock>) -> Result<Self> {
        if blocks.is_empty() {
            return Err(malformed_error!(
                "cannot build a control flow graph from an empty block list"
            ));
        }

        let block_count = blocks.len();
        let block_index = Self::index_blocks(&blocks)?;
        let mut graph: DirectedGraph<BasicBlock, CfgEdgeKind> =
            DirectedGraph::with_capacity(block_count, block_count * 2);

        // First pass: add all blocks as nodes
        let node_ids: Vec<NodeId> = blocks
            .into_iter()
            .map(|block| graph.add_node(block))
            .collect();

        // Second pass: add edges based on terminator targets
        for &node_id in &node_ids {
            let block = graph.node(node_id).ok_or_else(|| {
                GraphError(format!(
                    "internal error: node {} not found in graph",
                    node_id.index()
                ))
            })?;
            let source_id = block.id();
            let terminator = block.terminator().clone();

            for (position, target_id) in terminator.targets().into_iter().enumerate() {
                let target_node = *block_index.get(&target_id).ok_or_else(|| {
                    malformed_error!(
                        "block {} names target {} which does not exist",
                        source_id,
                        target_id
                    )
                })?;

                let kind = Self::classify_target(&terminator, position);
                graph.add_edge(node_id, target_node, kind)?;
            }
        }

        let entry = node_ids[0];
        Self::validate_reachable(&graph, entry)?;

        let exits: Vec<NodeId> = node_ids
            .iter()
            .copied()
            .filter(|&node| graph.successors(node).next().is_none())
            .collect();

        Ok(Self {
            graph,
            entry,
            exits,
            block_index,
            post_dominators: OnceLock::new(),
        })
    }
}

/// Methods available on any `ControlFlowGraph`, regardless of ownership.
impl<'a> ControlFlowGraph<'a> {
    /// Creates a new control flow graph borrowing blocks from a slice.
    ///
    /// This constructor enables zero-copy CFG construction when blocks are
    /// already stored elsewhere. Validation is identical to
    /// [`from_blocks`](Self::from_blocks).
    ///
    /// # Arguments
    ///
    /// * `blocks` - A slice of basic blocks to borrow; the first is the entry
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`](crate::Error::Malformed) under the same
    /// conditions as [`from_blocks`](Self::from_blocks).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use depscope::analysis::{BasicBlock, ControlFlowGraph, Terminator};
    ///
    /// let blocks = vec![
    ///     BasicBlock::new(0, Terminator::Other { targets: vec![1] }),
    ///     BasicBlock::new(1, Terminator::Other { targets: vec![] }),
    /// ];
    ///
    /// let cfg = ControlFlowGraph::from_blocks_ref(&blocks)?;
    /// assert_eq!(cfg.block_count(), 2);
    /// # Ok::<(), depscope::Error>(())
    /// ```
    pub fn from_blocks_ref(blocks: &'a [BasicBlock]) -> Result<Self> {
        if blocks.is_empty() {
            return Err(malformed_error!(
                "cannot build a control flow graph from an empty block list"
            ));
        }

        let block_index = Self::index_blocks(blocks)?;
        let mut graph: DirectedGraph<'a, BasicBlock, CfgEdgeKind> =
            DirectedGraph::from_nodes_borrowed(blocks);

        for (position_in_list, block) in blocks.iter().enumerate() {
            let node_id = NodeId::new(position_in_list);

            for (position, target_id) in block.terminator().targets().into_iter().enumerate() {
                let target_node = *block_index.get(&target_id).ok_or_else(|| {
                    malformed_error!(
                        "block {} names target {} which does not exist",
                        block.id(),
                        target_id
                    )
                })?;

                let kind = Self::classify_target(block.terminator(), position);
                graph.add_edge(node_id, target_node, kind)?;
            }
        }

        let entry = NodeId::new(0);
        Self::validate_reachable(&graph, entry)?;

        let exits: Vec<NodeId> = graph
            .node_ids()
            .filter(|&node| graph.successors(node).next().is_none())
            .collect();

        Ok(Self {
            graph,
            entry,
            exits,
            block_index,
            post_dominators: OnceLock::new(),
        })
    }

    /// Converts this CFG into an owned CFG with `'static` lifetime.
    ///
    /// If the CFG already owns its blocks, this is efficient. If borrowed,
    /// this clones the block data. A cached post-dominator tree is preserved.
    #[must_use]
    pub fn into_owned(self) -> ControlFlowGraph<'static> {
        ControlFlowGraph {
            graph: self.graph.into_owned(),
            entry: self.entry,
            exits: self.exits,
            block_index: self.block_index,
            post_dominators: self.post_dominators,
        }
    }

    /// Builds the block id to node position lookup, rejecting duplicate ids.
    fn index_blocks(blocks: &[BasicBlock]) -> Result<HashMap<usize, NodeId>> {
        let mut block_index = HashMap::with_capacity(blocks.len());
        for (position, block) in blocks.iter().enumerate() {
            if block_index.insert(block.id(), NodeId::new(position)).is_some() {
                return Err(malformed_error!(
                    "duplicate block id {} in block list",
                    block.id()
                ));
            }
        }
        Ok(block_index)
    }

    /// Classifies the edge to the target at the given position of a
    /// terminator's target list.
    fn classify_target(terminator: &Terminator, position: usize) -> CfgEdgeKind {
        match terminator {
            Terminator::Conditional { .. } => {
                // Target order is fixed: true target first, false target second
                if position == 0 {
                    CfgEdgeKind::ConditionalTrue
                } else {
                    CfgEdgeKind::ConditionalFalse
                }
            }
            Terminator::Other { .. } => CfgEdgeKind::Unconditional,
        }
    }

    /// Checks that every block is reachable from the entry.
    ///
    /// Unreachable blocks have no control dependence ancestry, so the
    /// downstream analysis would produce nodes with no parents. They are
    /// rejected up front instead.
    fn validate_reachable(
        graph: &DirectedGraph<'_, BasicBlock, CfgEdgeKind>,
        entry: NodeId,
    ) -> Result<()> {
        let mut visited = BitSet::new(graph.node_count());
        for node in algorithms::dfs(graph, entry) {
            visited.insert(node.index());
        }

        if visited.count() != graph.node_count() {
            let unreachable = graph.node_ids().find(|node| !visited.contains(node.index()));
            if let Some(node) = unreachable {
                let id = graph.node(node).map_or(node.index(), BasicBlock::id);
                return Err(malformed_error!(
                    "block {} is unreachable from the entry block",
                    id
                ));
            }
        }

        Ok(())
    }

    /// Returns the entry block's node.
    ///
    /// The entry is always the first block of the input list.
    #[must_use]
    pub const fn entry(&self) -> NodeId {
        self.entry
    }

    /// Returns the exit blocks' nodes.
    ///
    /// Exit blocks are blocks whose terminator names no successors.
    #[must_use]
    pub fn exit_blocks(&self) -> &[NodeId] {
        &self.exits
    }

    /// Returns the number of blocks in the CFG.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns a reference to the basic block at the given node.
    ///
    /// # Arguments
    ///
    /// * `node` - The node to look up
    ///
    /// # Returns
    ///
    /// A reference to the basic block, or `None` if the node is invalid.
    #[must_use]
    pub fn block(&self, node: NodeId) -> Option<&BasicBlock> {
        self.graph.node(node)
    }

    /// Returns the node holding the block with the given id.
    ///
    /// # Arguments
    ///
    /// * `id` - The caller-chosen block id
    ///
    /// # Returns
    ///
    /// The block's node, or `None` if no block carries this id.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use depscope::analysis::{BasicBlock, ControlFlowGraph, Terminator};
    ///
    /// let cfg = ControlFlowGraph::from_blocks(vec![
    ///     BasicBlock::new(7, Terminator::Other { targets: vec![] }),
    /// ])?;
    ///
    /// assert!(cfg.block_node(7).is_some());
    /// assert!(cfg.block_node(0).is_none());
    /// # Ok::<(), depscope::Error>(())
    /// ```
    #[must_use]
    pub fn block_node(&self, id: usize) -> Option<NodeId> {
        self.block_index.get(&id).copied()
    }

    /// Classifies the control flow edge from `source` to `target`.
    ///
    /// If the source block's terminator is a conditional branch, the edge is
    /// [`CfgEdgeKind::ConditionalTrue`] when `target` is its true target and
    /// [`CfgEdgeKind::ConditionalFalse`] when it is its false target; the true
    /// target is checked first, so a branch whose two targets coincide
    /// classifies as true. All other edges are
    /// [`CfgEdgeKind::Unconditional`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`](crate::Error::GraphError) if either node
    /// is invalid or there is no control flow edge from `source` to `target`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use depscope::analysis::{BasicBlock, CfgEdgeKind, ControlFlowGraph, Terminator};
    ///
    /// let cfg = ControlFlowGraph::from_blocks(vec![
    ///     BasicBlock::new(0, Terminator::Conditional { true_target: 1, false_target: 2 }),
    ///     BasicBlock::new(1, Terminator::Other { targets: vec![] }),
    ///     BasicBlock::new(2, Terminator::Other { targets: vec![] }),
    /// ])?;
    ///
    /// let cond = cfg.block_node(0).unwrap();
    /// let on_true = cfg.block_node(1).unwrap();
    /// assert_eq!(cfg.classify_edge(cond, on_true)?, CfgEdgeKind::ConditionalTrue);
    /// # Ok::<(), depscope::Error>(())
    /// ```
    pub fn classify_edge(&self, source: NodeId, target: NodeId) -> Result<CfgEdgeKind> {
        let source_block = self.block(source).ok_or_else(|| {
            GraphError(format!(
                "source node {} does not exist in graph with {} nodes",
                source.index(),
                self.block_count()
            ))
        })?;
        let target_block = self.block(target).ok_or_else(|| {
            GraphError(format!(
                "target node {} does not exist in graph with {} nodes",
                target.index(),
                self.block_count()
            ))
        })?;

        if !self.graph.successors(source).any(|succ| succ == target) {
            return Err(GraphError(format!(
                "no control flow edge from block {} to block {}",
                source_block.id(),
                target_block.id()
            )));
        }

        match source_block.terminator() {
            Terminator::Conditional {
                true_target,
                false_target,
            } => {
                if *true_target == target_block.id() {
                    Ok(CfgEdgeKind::ConditionalTrue)
                } else if *false_target == target_block.id() {
                    Ok(CfgEdgeKind::ConditionalFalse)
                } else {
                    Err(GraphError(format!(
                        "edge from block {} to block {} matches neither branch target",
                        source_block.id(),
                        target_block.id()
                    )))
                }
            }
            Terminator::Other { .. } => Ok(CfgEdgeKind::Unconditional),
        }
    }

    /// Returns the post-dominator tree for this CFG.
    ///
    /// The tree is computed lazily on first access and cached. This operation
    /// is thread-safe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`](crate::Error::Malformed) if the function
    /// has no exit block, or contains blocks from which no exit is reachable.
    /// Post-dominance is undefined for such inputs, and the failure is
    /// remembered: later calls report it again without recomputation.
    pub fn post_dominators(&self) -> Result<&PostDominatorTree> {
        match self.post_dominators.get_or_init(|| {
            algorithms::compute_post_dominators(&self.graph).map_err(|e| e.to_string())
        }) {
            Ok(tree) => Ok(tree),
            Err(message) => Err(malformed_error!("{}", message)),
        }
    }

    /// Returns the successor nodes of a block.
    ///
    /// A conditional branch whose two targets coincide yields that successor
    /// twice, once per edge.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.successors(node)
    }

    /// Returns the predecessor nodes of a block.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.predecessors(node)
    }

    /// Returns the outgoing edges of a block.
    ///
    /// # Returns
    ///
    /// An iterator over (edge id, target node, edge kind) tuples.
    pub fn outgoing_edges(
        &self,
        node: NodeId,
    ) -> impl Iterator<Item = (EdgeId, NodeId, CfgEdgeKind)> + '_ {
        self.graph
            .outgoing_edges(node)
            .filter_map(|(edge_id, kind)| {
                self.graph
                    .edge_endpoints(edge_id)
                    .map(|(_, target)| (edge_id, target, *kind))
            })
    }

    /// Returns an iterator over all nodes in the graph.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_ids()
    }

    /// Performs a depth-first traversal starting from the entry block.
    pub fn dfs(&self) -> impl Iterator<Item = NodeId> + '_ {
        algorithms::dfs(&self.graph, self.entry)
    }

    /// Returns blocks in postorder.
    ///
    /// Postorder is useful for backward analyses over the control flow.
    #[must_use]
    pub fn postorder(&self) -> Vec<NodeId> {
        algorithms::postorder(&self.graph, self.entry)
    }

    /// Returns blocks in reverse postorder.
    ///
    /// Reverse postorder ensures predecessors are visited before successors
    /// for acyclic regions, which forward analyses rely on.
    #[must_use]
    pub fn reverse_postorder(&self) -> Vec<NodeId> {
        algorithms::reverse_postorder(&self.graph, self.entry)
    }

    /// Returns a reference to the underlying graph.
    ///
    /// This provides access to the full graph API for advanced use cases
    /// such as custom traversals or algorithm applications.
    #[must_use]
    pub fn graph(&self) -> &DirectedGraph<'a, BasicBlock, CfgEdgeKind> {
        &self.graph
    }

    /// Generates a DOT format representation of this control flow graph.
    ///
    /// The generated DOT can be rendered using Graphviz tools. The entry block
    /// is highlighted in green, exit blocks in red; conditional edges carry
    /// true/false labels.
    ///
    /// # Arguments
    ///
    /// * `title` - Optional title for the graph (e.g., function name)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use depscope::analysis::{BasicBlock, ControlFlowGraph, Terminator};
    ///
    /// let cfg = ControlFlowGraph::from_blocks(vec![
    ///     BasicBlock::new(0, Terminator::Other { targets: vec![] }).with_name("entry"),
    /// ])?;
    ///
    /// let dot = cfg.to_dot(Some("tiny"));
    /// assert!(dot.contains("digraph CFG"));
    /// assert!(dot.contains("entry"));
    /// # Ok::<(), depscope::Error>(())
    /// ```
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = String::new();

        dot.push_str("digraph CFG {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"CFG: {}\";", escape_dot(name));
        }
        dot.push_str("    labelloc=t;\n");
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n");
        dot.push_str("    edge [fontname=\"Courier\", fontsize=9];\n\n");

        // Generate nodes
        for node in self.graph.node_ids() {
            if let Some(block) = self.block(node) {
                let is_entry = node == self.entry;
                let is_exit = self.exits.contains(&node);

                let mut label = escape_dot(&block.label());
                if is_entry {
                    label.push_str(" (entry)");
                }
                if is_exit {
                    label.push_str(" (exit)");
                }

                let style = if is_entry {
                    ", style=filled, fillcolor=lightgreen"
                } else if is_exit {
                    ", style=filled, fillcolor=lightcoral"
                } else {
                    ""
                };

                let _ = writeln!(dot, "    b{} [label=\"{label}\"{style}];", node.index());
            }
        }

        dot.push('\n');

        // Generate edges
        for node in self.graph.node_ids() {
            for (_, target, kind) in self.outgoing_edges(node) {
                let color = match kind {
                    CfgEdgeKind::Unconditional => "black",
                    CfgEdgeKind::ConditionalTrue => "green",
                    CfgEdgeKind::ConditionalFalse => "red",
                };

                let _ = writeln!(
                    dot,
                    "    b{} -> b{} [label=\"{}\", color={color}];",
                    node.index(),
                    target.index(),
                    kind.label()
                );
            }
        }

        dot.push_str("}\n");
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    /// Creates a block with a non-conditional terminator.
    fn make_block(id: usize, targets: Vec<usize>) -> BasicBlock {
        BasicBlock::new(id, Terminator::Other { targets })
    }

    /// Creates a block ending in a conditional branch.
    fn make_branch(id: usize, true_target: usize, false_target: usize) -> BasicBlock {
        BasicBlock::new(
            id,
            Terminator::Conditional {
                true_target,
                false_target,
            },
        )
    }

    #[test]
    fn test_cfg_from_empty_blocks() {
        let result = ControlFlowGraph::from_blocks(vec![]);
        assert!(matches!(result, Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_cfg_single_block() {
        let cfg = ControlFlowGraph::from_blocks(vec![make_block(0, vec![])]).unwrap();

        assert_eq!(cfg.block_count(), 1);
        assert_eq!(cfg.entry(), NodeId::new(0));
        assert_eq!(cfg.exit_blocks(), &[NodeId::new(0)]);
    }

    #[test]
    fn test_cfg_linear_blocks() {
        // Block 0 -> Block 1 -> Block 2 (exit)
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_block(0, vec![1]),
            make_block(1, vec![2]),
            make_block(2, vec![]),
        ])
        .unwrap();

        assert_eq!(cfg.block_count(), 3);
        assert_eq!(cfg.entry(), NodeId::new(0));
        assert_eq!(cfg.exit_blocks().len(), 1);

        let succ_0: Vec<_> = cfg.successors(NodeId::new(0)).collect();
        assert_eq!(succ_0, vec![NodeId::new(1)]);

        let succ_2: Vec<_> = cfg.successors(NodeId::new(2)).collect();
        assert!(succ_2.is_empty());
    }

    #[test]
    fn test_cfg_block_ids_are_not_positions() {
        // Ids 10 and 20, entry is the first block regardless of id
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_block(10, vec![20]),
            make_block(20, vec![]),
        ])
        .unwrap();

        let entry = cfg.block_node(10).unwrap();
        let exit = cfg.block_node(20).unwrap();
        assert_eq!(cfg.entry(), entry);
        assert_eq!(cfg.successors(entry).collect::<Vec<_>>(), vec![exit]);
        assert!(cfg.block_node(0).is_none());
    }

    #[test]
    fn test_cfg_diamond_edge_kinds() {
        // Diamond: 0 -> 1 (true), 0 -> 2 (false), 1 -> 3, 2 -> 3
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_branch(0, 1, 2),
            make_block(1, vec![3]),
            make_block(2, vec![3]),
            make_block(3, vec![]),
        ])
        .unwrap();

        let edges: Vec<_> = cfg.outgoing_edges(NodeId::new(0)).collect();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].2, CfgEdgeKind::ConditionalTrue);
        assert_eq!(edges[1].2, CfgEdgeKind::ConditionalFalse);

        let kind = cfg.classify_edge(NodeId::new(0), NodeId::new(1)).unwrap();
        assert_eq!(kind, CfgEdgeKind::ConditionalTrue);
        let kind = cfg.classify_edge(NodeId::new(0), NodeId::new(2)).unwrap();
        assert_eq!(kind, CfgEdgeKind::ConditionalFalse);
        let kind = cfg.classify_edge(NodeId::new(1), NodeId::new(3)).unwrap();
        assert_eq!(kind, CfgEdgeKind::Unconditional);
    }

    #[test]
    fn test_cfg_classify_edge_without_edge() {
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_block(0, vec![1]),
            make_block(1, vec![2]),
            make_block(2, vec![]),
        ])
        .unwrap();

        // 0 -> 2 is not a direct edge
        let result = cfg.classify_edge(NodeId::new(0), NodeId::new(2));
        assert!(matches!(result, Err(Error::GraphError(_))));
    }

    #[test]
    fn test_cfg_classify_duplicate_targets_as_true() {
        // Conditional whose both targets name block 1
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_branch(0, 1, 1),
            make_block(1, vec![]),
        ])
        .unwrap();

        // Two parallel edges exist, but classification resolves to true
        let succs: Vec<_> = cfg.successors(NodeId::new(0)).collect();
        assert_eq!(succs, vec![NodeId::new(1), NodeId::new(1)]);

        let kind = cfg.classify_edge(NodeId::new(0), NodeId::new(1)).unwrap();
        assert_eq!(kind, CfgEdgeKind::ConditionalTrue);
    }

    #[test]
    fn test_cfg_unknown_target_rejected() {
        let result = ControlFlowGraph::from_blocks(vec![make_block(0, vec![5])]);
        assert!(matches!(result, Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_cfg_duplicate_id_rejected() {
        let result =
            ControlFlowGraph::from_blocks(vec![make_block(0, vec![0]), make_block(0, vec![])]);
        assert!(matches!(result, Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_cfg_unreachable_block_rejected() {
        // Block 2 has no incoming edge
        let result = ControlFlowGraph::from_blocks(vec![
            make_block(0, vec![1]),
            make_block(1, vec![]),
            make_block(2, vec![1]),
        ]);
        match result {
            Err(Error::Malformed { message, .. }) => {
                assert!(message.contains("unreachable"), "message: {message}");
            }
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_cfg_with_loop() {
        // Loop: 0 -> 1 -> 2 -> 1 (back edge), 2 -> 3
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_block(0, vec![1]),
            make_block(1, vec![2]),
            make_branch(2, 1, 3),
            make_block(3, vec![]),
        ])
        .unwrap();

        let pred_1: Vec<_> = cfg.predecessors(NodeId::new(1)).collect();
        assert_eq!(pred_1.len(), 2);
        assert!(pred_1.contains(&NodeId::new(0)));
        assert!(pred_1.contains(&NodeId::new(2)));
    }

    #[test]
    fn test_cfg_post_dominators() {
        // Diamond: the merge block post-dominates the branch
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_branch(0, 1, 2),
            make_block(1, vec![3]),
            make_block(2, vec![3]),
            make_block(3, vec![]),
        ])
        .unwrap();

        let pdt = cfg.post_dominators().unwrap();
        assert!(pdt.post_dominates(NodeId::new(3), NodeId::new(0)));
        assert!(!pdt.post_dominates(NodeId::new(1), NodeId::new(0)));
        assert_eq!(
            pdt.immediate_post_dominator(NodeId::new(0)),
            Some(NodeId::new(3))
        );

        // Second access hits the cache and agrees
        let again = cfg.post_dominators().unwrap();
        assert_eq!(
            again.immediate_post_dominator(NodeId::new(0)),
            Some(NodeId::new(3))
        );
    }

    #[test]
    fn test_cfg_no_exit_is_malformed() {
        // Two blocks jumping at each other forever
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_block(0, vec![1]),
            make_block(1, vec![0]),
        ])
        .unwrap();

        let result = cfg.post_dominators();
        assert!(matches!(result, Err(Error::Malformed { .. })));

        // The failure is cached, not recomputed into success
        let again = cfg.post_dominators();
        assert!(matches!(again, Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_cfg_trapped_block_is_malformed() {
        // Block 2 and 3 cycle without reaching the exit
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_branch(0, 1, 2),
            make_block(1, vec![]),
            make_block(2, vec![3]),
            make_block(3, vec![2]),
        ])
        .unwrap();

        match cfg.post_dominators() {
            Err(Error::Malformed { message, .. }) => {
                assert!(message.contains("cannot reach"), "message: {message}");
            }
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_cfg_traversal_orders() {
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_block(0, vec![1]),
            make_block(1, vec![2]),
            make_block(2, vec![]),
        ])
        .unwrap();

        let dfs_order: Vec<_> = cfg.dfs().collect();
        assert_eq!(dfs_order.len(), 3);
        assert_eq!(dfs_order[0], NodeId::new(0));

        let rpo = cfg.reverse_postorder();
        assert_eq!(rpo[0], NodeId::new(0));
        assert_eq!(rpo[2], NodeId::new(2));

        let po = cfg.postorder();
        assert_eq!(po[0], NodeId::new(2));
        assert_eq!(po[2], NodeId::new(0));
    }

    #[test]
    fn test_cfg_from_blocks_ref() {
        let blocks = vec![make_block(0, vec![1]), make_block(1, vec![])];

        let cfg = ControlFlowGraph::from_blocks_ref(&blocks).unwrap();
        assert_eq!(cfg.block_count(), 2);
        assert!(!cfg.graph().is_owned());

        let owned = cfg.into_owned();
        assert_eq!(owned.block_count(), 2);
        assert!(owned.graph().is_owned());
    }

    #[test]
    fn test_cfg_to_dot() {
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_branch(0, 1, 2).with_name("cond"),
            make_block(1, vec![]),
            make_block(2, vec![]),
        ])
        .unwrap();

        let dot = cfg.to_dot(Some("example"));
        assert!(dot.contains("digraph CFG"));
        assert!(dot.contains("CFG: example"));
        assert!(dot.contains("cond (entry)"));
        assert!(dot.contains("label=\"true\""));
        assert!(dot.contains("label=\"false\""));
        assert!(dot.contains("bb1 (exit)"));
    }
}
