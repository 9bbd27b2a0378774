//! Two-phase construction of the control dependence graph.
//!
//! Phase one ([`CdgBuilder::compute_dependencies`]) walks every control flow
//! edge and, guided by the post-dominator tree, records which blocks execute
//! at the discretion of which branches. The raw result may reach the same
//! dependence through many parents and may give a branch several children of
//! the same polarity.
//!
//! Phase two ([`CdgBuilder::insert_regions`]) canonicalizes the raw graph:
//! nodes with identical dependence ancestry are funneled through shared
//! region nodes, and every block node's true/false fan-out is bounded to a
//! single child.
//!
//! All relation mutations go through the paired [`CdgBuilder::add_child`] /
//! [`CdgBuilder::remove_child`] primitives, which keep child-set membership
//! and parent-set membership in lock-step.

use std::collections::{BTreeSet, HashMap};

use crate::{
    analysis::{
        cdg::{
            node::{CdgEdgeKind, CdgNodeId, ControlDependenceNode},
            trace::BuildTrace,
        },
        cfg::ControlFlowGraph,
    },
    utils::graph::{algorithms::PostDominatorTree, NodeId},
    Error::GraphError,
    Result,
};

/// The canonical set of `(classification, parent)` pairs through which a
/// node is reached; the merge key of region insertion.
type Signature = BTreeSet<(CdgEdgeKind, CdgNodeId)>;

/// Arena-building state shared by the two construction phases.
pub(crate) struct CdgBuilder<'a> {
    cfg: &'a ControlFlowGraph<'a>,
    nodes: Vec<ControlDependenceNode>,
    root: CdgNodeId,
    block_nodes: HashMap<NodeId, CdgNodeId>,
}

impl<'a> CdgBuilder<'a> {
    /// Allocates the root region and one node per basic block.
    pub(crate) fn new(cfg: &'a ControlFlowGraph<'a>) -> Self {
        let mut nodes = Vec::with_capacity(cfg.block_count() + 1);
        nodes.push(ControlDependenceNode::region());
        let root = CdgNodeId::new(0);

        let mut block_nodes = HashMap::with_capacity(cfg.block_count());
        for block in cfg.node_ids() {
            let id = CdgNodeId::new(nodes.len());
            nodes.push(ControlDependenceNode::for_block(block));
            block_nodes.insert(block, id);
        }

        CdgBuilder {
            cfg,
            nodes,
            root,
            block_nodes,
        }
    }

    /// Phase one: derive raw dependence edges from the control flow edges.
    ///
    /// For every edge `A -> B` where `B` does not always execute after `A`,
    /// every block between `B` and the nearest common post-dominator
    /// ancestor of `A` and `B` becomes a child of `A` under the edge's
    /// classification. A branch that is its own nearest common ancestor
    /// re-enters its own block and is recorded as its own child. Finally the
    /// root adopts the entry block's whole post-dominator chain: those
    /// blocks execute whenever the function runs.
    pub(crate) fn compute_dependencies(
        &mut self,
        pdt: &PostDominatorTree,
        trace: &mut dyn BuildTrace,
    ) -> Result<()> {
        let cfg = self.cfg;

        for a in cfg.node_ids() {
            let a_node = self.node_for(a)?;

            for b in cfg.successors(a) {
                // B post-dominating A means B executes regardless of A's
                // outcome; only the self edge survives that test
                if a != b && pdt.post_dominates(b, a) {
                    continue;
                }

                let ancestor = pdt.nearest_common_ancestor(a, b);
                let kind = CdgEdgeKind::from(cfg.classify_edge(a, b)?);
                trace.edge_classified(a, b, kind);

                if ancestor == a {
                    self.add_child(a_node, a_node, kind);
                    trace.dependence_added(a_node, a_node, kind);
                }

                let mut cur = b;
                while cur != ancestor {
                    let c_node = self.node_for(cur)?;
                    self.add_child(a_node, c_node, kind);
                    trace.dependence_added(a_node, c_node, kind);

                    cur = pdt.immediate_post_dominator(cur).ok_or_else(|| {
                        GraphError(format!(
                            "post-dominator chain from {cur} ended before the common ancestor"
                        ))
                    })?;
                }
            }
        }

        let root = self.root;
        for cur in pdt.ancestors(cfg.entry()) {
            if pdt.is_virtual_exit(cur) {
                continue;
            }
            let c_node = self.node_for(cur)?;
            self.add_child(root, c_node, CdgEdgeKind::Other);
            trace.dependence_added(root, c_node, CdgEdgeKind::Other);
        }

        Ok(())
    }

    /// Phase two: canonicalize the raw graph with synthetic region nodes.
    ///
    /// Pass 1 visits block nodes in post-order over the post-dominator tree
    /// (children before parents), resolves each node's dependence signature
    /// to a region (reusing one when the signature was seen before), and
    /// rewires the node to sit under that region alone. Pass 2 bounds every
    /// block node's true/false fan-out to one child by interposing a fresh
    /// region where a polarity has several children.
    pub(crate) fn insert_regions(
        &mut self,
        pdt: &PostDominatorTree,
        trace: &mut dyn BuildTrace,
    ) -> Result<()> {
        let mut regions: HashMap<Signature, CdgNodeId> = HashMap::new();

        // Seed with the root's trivial signature so blocks depending on
        // nothing but function entry fold straight onto the root
        let mut root_signature = Signature::new();
        root_signature.insert((CdgEdgeKind::Other, self.root));
        regions.insert(root_signature, self.root);

        for tree_node in pdt.post_order() {
            if pdt.is_virtual_exit(tree_node) {
                continue;
            }
            let node = self.node_for(tree_node)?;
            let signature = self.signature_of(node);

            let region = if let Some(&found) = regions.get(&signature) {
                trace.region_merged(found, node);
                found
            } else if let Some(shared) = self.singleton_region(&signature) {
                regions.insert(signature.clone(), shared);
                trace.region_merged(shared, node);
                shared
            } else {
                let fresh = self.new_region();
                trace.region_created(fresh);
                for &(kind, parent) in &signature {
                    self.add_child(parent, fresh, kind);
                }
                regions.insert(signature.clone(), fresh);
                fresh
            };

            // Rewire: detach the node from every signature parent first,
            // then hang it under the region. Removing first keeps the
            // rewire correct when the region is already one of the node's
            // parents, and leaves the region as the node's sole parent.
            for &(kind, parent) in &signature {
                self.remove_child(parent, node, kind);
            }
            self.add_child(region, node, CdgEdgeKind::Other);
        }

        // Fan-out fix-up over the nodes that existed when the pass started;
        // regions appended here need no visit of their own
        let existing = self.nodes.len();
        for index in 0..existing {
            let node = CdgNodeId::new(index);
            if self.nodes[index].is_region() {
                continue;
            }

            for kind in [CdgEdgeKind::True, CdgEdgeKind::False] {
                if self.nodes[index].children(kind).len() <= 1 {
                    continue;
                }

                let members: Vec<CdgNodeId> =
                    self.nodes[index].children(kind).iter().copied().collect();
                let region = self.new_region();
                trace.region_created(region);

                for member in members {
                    self.remove_child(node, member, kind);
                    self.add_child(region, member, CdgEdgeKind::Other);
                }
                self.add_child(node, region, kind);
            }
        }

        Ok(())
    }

    /// Hands the finished arena to the owning graph.
    pub(crate) fn finish(self) -> (Vec<ControlDependenceNode>, CdgNodeId, HashMap<NodeId, CdgNodeId>) {
        (self.nodes, self.root, self.block_nodes)
    }

    /// Looks up the dependence node allocated for a basic block.
    fn node_for(&self, block: NodeId) -> Result<CdgNodeId> {
        self.block_nodes
            .get(&block)
            .copied()
            .ok_or_else(|| GraphError(format!("block {block} has no dependence node")))
    }

    /// Collects every `(classification, parent)` pair through which the node
    /// is currently reached. A parent holding the node in several sets
    /// contributes one pair per set.
    fn signature_of(&self, node: CdgNodeId) -> Signature {
        let mut signature = Signature::new();
        for &parent in self.nodes[node.index()].parents() {
            for kind in [CdgEdgeKind::True, CdgEdgeKind::False, CdgEdgeKind::Other] {
                if self.nodes[parent.index()].children(kind).contains(&node) {
                    signature.insert((kind, parent));
                }
            }
        }
        signature
    }

    /// Resolves a signature that is exactly "other child of one region" to
    /// that region. This generalizes the root seeding and makes a repeated
    /// canonicalization run leave the graph untouched.
    fn singleton_region(&self, signature: &Signature) -> Option<CdgNodeId> {
        if signature.len() != 1 {
            return None;
        }
        let &(kind, parent) = signature.iter().next()?;
        (kind == CdgEdgeKind::Other && self.nodes[parent.index()].is_region()).then_some(parent)
    }

    /// Allocates a fresh region node.
    fn new_region(&mut self) -> CdgNodeId {
        let id = CdgNodeId::new(self.nodes.len());
        self.nodes.push(ControlDependenceNode::region());
        id
    }

    /// Records `child` as a `kind` child of `parent` and `parent` as a
    /// parent of `child`. Both directions are sets, so repeated additions
    /// are absorbed; self edges are allowed.
    fn add_child(&mut self, parent: CdgNodeId, child: CdgNodeId, kind: CdgEdgeKind) {
        self.nodes[parent.index()].children_mut(kind).insert(child);
        self.nodes[child.index()].parents_mut().insert(parent);
    }

    /// Removes `child` from `parent`'s `kind` set. The parent link is
    /// dropped only once the child is absent from all three of the parent's
    /// sets, keeping the two directions consistent throughout.
    fn remove_child(&mut self, parent: CdgNodeId, child: CdgNodeId, kind: CdgEdgeKind) {
        self.nodes[parent.index()].children_mut(kind).remove(&child);
        if !self.nodes[parent.index()].has_child(child) {
            self.nodes[child.index()].parents_mut().remove(&parent);
        }
    }

    #[cfg(test)]
    pub(crate) fn nodes(&self) -> &[ControlDependenceNode] {
        &self.nodes
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> CdgNodeId {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::cdg::trace::NullTrace;
    use crate::analysis::cfg::{BasicBlock, Terminator};

    /// Trace that records every checkpoint for assertion.
    #[derive(Default)]
    struct RecordingTrace {
        classified: Vec<(NodeId, NodeId, CdgEdgeKind)>,
        added: Vec<(CdgNodeId, CdgNodeId, CdgEdgeKind)>,
        created: Vec<CdgNodeId>,
        merged: Vec<(CdgNodeId, CdgNodeId)>,
    }

    impl BuildTrace for RecordingTrace {
        fn edge_classified(&mut self, source: NodeId, target: NodeId, kind: CdgEdgeKind) {
            self.classified.push((source, target, kind));
        }

        fn dependence_added(&mut self, parent: CdgNodeId, child: CdgNodeId, kind: CdgEdgeKind) {
            self.added.push((parent, child, kind));
        }

        fn region_created(&mut self, region: CdgNodeId) {
            self.created.push(region);
        }

        fn region_merged(&mut self, region: CdgNodeId, node: CdgNodeId) {
            self.merged.push((region, node));
        }
    }

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

    #[test]
    fn test_raw_dependencies_of_diamond() {
        let cfg = diamond();
        let pdt = cfg.post_dominators().unwrap();
        let mut builder = CdgBuilder::new(&cfg);
        builder
            .compute_dependencies(pdt, &mut NullTrace)
            .unwrap();

        let root = builder.root();
        let cond = builder.node_for(NodeId::new(1)).unwrap();
        let x = builder.node_for(NodeId::new(2)).unwrap();
        let y = builder.node_for(NodeId::new(3)).unwrap();
        let merge = builder.node_for(NodeId::new(4)).unwrap();

        // The branch owns its arms, one per polarity
        let nodes = builder.nodes();
        assert!(nodes[cond.index()].true_children().contains(&x));
        assert!(nodes[cond.index()].false_children().contains(&y));

        // The merge block depends on nothing but function entry
        assert_eq!(nodes[merge.index()].parents().len(), 1);
        assert!(nodes[merge.index()].parents().contains(&root));

        // entry, cond, merge sit on the entry's post-dominator chain
        let entry = builder.node_for(NodeId::new(0)).unwrap();
        for always in [entry, cond, merge] {
            assert!(nodes[root.index()].other_children().contains(&always));
        }
    }

    #[test]
    fn test_regions_of_diamond() {
        let cfg = diamond();
        let pdt = cfg.post_dominators().unwrap();
        let mut builder = CdgBuilder::new(&cfg);
        builder
            .compute_dependencies(pdt, &mut NullTrace)
            .unwrap();
        builder.insert_regions(pdt, &mut NullTrace).unwrap();

        let cond = builder.node_for(NodeId::new(1)).unwrap();
        let x = builder.node_for(NodeId::new(2)).unwrap();
        let y = builder.node_for(NodeId::new(3)).unwrap();
        let nodes = builder.nodes();

        // Each arm now sits alone under a region of its polarity
        assert_eq!(nodes[cond.index()].true_children().len(), 1);
        assert_eq!(nodes[cond.index()].false_children().len(), 1);

        let true_region = *nodes[cond.index()].true_children().iter().next().unwrap();
        let false_region = *nodes[cond.index()].false_children().iter().next().unwrap();
        assert!(nodes[true_region.index()].is_region());
        assert!(nodes[false_region.index()].is_region());
        assert_ne!(true_region, false_region);

        assert_eq!(nodes[x.index()].sole_parent(), Some(true_region));
        assert_eq!(nodes[y.index()].sole_parent(), Some(false_region));

        // After canonicalization every block node has exactly one parent
        for node in nodes {
            if !node.is_region() {
                assert_eq!(node.parent_count(), 1);
            }
        }
    }

    #[test]
    fn test_blocks_with_equal_ancestry_share_a_region() {
        // cond -true-> a -> b -> merge; cond -false-> merge: a and b both
        // depend on the true branch alone
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_branch(0, 1, 3),
            make_block(1, vec![2]),
            make_block(2, vec![3]),
            make_block(3, vec![]),
        ])
        .unwrap();
        let pdt = cfg.post_dominators().unwrap();
        let mut builder = CdgBuilder::new(&cfg);
        let mut trace = RecordingTrace::default();
        builder.compute_dependencies(pdt, &mut trace).unwrap();
        builder.insert_regions(pdt, &mut trace).unwrap();

        let cond = builder.node_for(NodeId::new(0)).unwrap();
        let a = builder.node_for(NodeId::new(1)).unwrap();
        let b = builder.node_for(NodeId::new(2)).unwrap();
        let nodes = builder.nodes();

        // One shared region carries both blocks
        assert_eq!(nodes[cond.index()].true_children().len(), 1);
        let region = *nodes[cond.index()].true_children().iter().next().unwrap();
        assert!(nodes[region.index()].is_region());

        assert_eq!(nodes[a.index()].sole_parent(), Some(region));
        assert_eq!(nodes[b.index()].sole_parent(), Some(region));
        assert!(nodes[region.index()].other_children().contains(&a));
        assert!(nodes[region.index()].other_children().contains(&b));

        // The second block arrived by merge, not by a second region
        assert!(trace.merged.iter().any(|&(r, n)| r == region && n == b));
    }

    #[test]
    fn test_loop_header_self_edge() {
        // entry -> header; header -true-> body -> header; header -false-> exit
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_block(0, vec![1]),
            make_branch(1, 2, 3),
            make_block(2, vec![1]),
            make_block(3, vec![]),
        ])
        .unwrap();
        let pdt = cfg.post_dominators().unwrap();
        let mut builder = CdgBuilder::new(&cfg);
        builder
            .compute_dependencies(pdt, &mut NullTrace)
            .unwrap();

        let header = builder.node_for(NodeId::new(1)).unwrap();
        let body = builder.node_for(NodeId::new(2)).unwrap();
        let nodes = builder.nodes();

        // The header decides its own re-execution: raw self edge
        assert!(nodes[header.index()].true_children().contains(&header));
        assert!(nodes[header.index()].parents().contains(&header));
        assert!(nodes[header.index()].true_children().contains(&body));
    }

    #[test]
    fn test_loop_branch_fanout_bounded() {
        // The raw loop header carries two true children (itself and the
        // body's region); pass 2 interposes a single region
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_block(0, vec![1]),
            make_branch(1, 2, 3),
            make_block(2, vec![1]),
            make_block(3, vec![]),
        ])
        .unwrap();
        let pdt = cfg.post_dominators().unwrap();
        let mut builder = CdgBuilder::new(&cfg);
        builder
            .compute_dependencies(pdt, &mut NullTrace)
            .unwrap();
        builder.insert_regions(pdt, &mut NullTrace).unwrap();

        let header = builder.node_for(NodeId::new(1)).unwrap();
        let nodes = builder.nodes();

        assert_eq!(nodes[header.index()].true_children().len(), 1);
        let region = *nodes[header.index()].true_children().iter().next().unwrap();
        assert!(nodes[region.index()].is_region());

        // No block node keeps more than one child per polarity
        for node in nodes {
            if !node.is_region() {
                assert!(node.true_children().len() <= 1);
                assert!(node.false_children().len() <= 1);
            }
        }
    }

    #[test]
    fn test_insert_regions_is_idempotent() {
        let cfg = diamond();
        let pdt = cfg.post_dominators().unwrap();
        let mut builder = CdgBuilder::new(&cfg);
        builder
            .compute_dependencies(pdt, &mut NullTrace)
            .unwrap();
        builder.insert_regions(pdt, &mut NullTrace).unwrap();

        let canonical = builder.nodes().to_vec();
        builder.insert_regions(pdt, &mut NullTrace).unwrap();

        assert_eq!(builder.nodes(), canonical.as_slice());
    }

    #[test]
    fn test_trace_skips_post_dominated_edges() {
        // Every edge of a straight line is skipped before classification:
        // each target post-dominates its source
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_block(0, vec![1]),
            make_block(1, vec![2]),
            make_block(2, vec![]),
        ])
        .unwrap();
        let pdt = cfg.post_dominators().unwrap();
        let mut builder = CdgBuilder::new(&cfg);
        let mut trace = RecordingTrace::default();
        builder.compute_dependencies(pdt, &mut trace).unwrap();

        assert!(trace.classified.is_empty());

        // Both edges of a two-exit conditional survive the skip
        let cfg = ControlFlowGraph::from_blocks(vec![
            make_branch(0, 1, 2),
            make_block(1, vec![]),
            make_block(2, vec![]),
        ])
        .unwrap();
        let pdt = cfg.post_dominators().unwrap();
        let mut builder = CdgBuilder::new(&cfg);
        let mut trace = RecordingTrace::default();
        builder.compute_dependencies(pdt, &mut trace).unwrap();

        assert_eq!(trace.classified.len(), 2);
        assert!(trace
            .classified
            .contains(&(NodeId::new(0), NodeId::new(1), CdgEdgeKind::True)));
        assert!(trace
            .classified
            .contains(&(NodeId::new(0), NodeId::new(2), CdgEdgeKind::False)));
    }

    #[test]
    fn test_trace_records_construction() {
        let cfg = diamond();
        let pdt = cfg.post_dominators().unwrap();
        let mut builder = CdgBuilder::new(&cfg);
        let mut trace = RecordingTrace::default();
        builder.compute_dependencies(pdt, &mut trace).unwrap();

        // Both branch edges were classified with their polarity
        assert!(trace
            .classified
            .contains(&(NodeId::new(1), NodeId::new(2), CdgEdgeKind::True)));
        assert!(trace
            .classified
            .contains(&(NodeId::new(1), NodeId::new(3), CdgEdgeKind::False)));

        // The root adopted the entry chain
        let root = builder.root();
        assert!(trace
            .added
            .iter()
            .any(|&(parent, _, kind)| parent == root && kind == CdgEdgeKind::Other));

        builder.insert_regions(pdt, &mut trace).unwrap();

        // Canonicalizing the diamond created the two polarity regions
        assert_eq!(trace.created.len(), 2);
        // Blocks on the entry chain folded onto the root
        assert!(trace.merged.iter().any(|&(region, _)| region == root));
    }
}
