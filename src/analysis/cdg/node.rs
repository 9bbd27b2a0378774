//! Node model of the control dependence graph.
//!
//! This module provides the [`CdgNodeId`] identifier, the [`CdgEdgeKind`]
//! edge classification, and the [`ControlDependenceNode`] structure holding
//! one node's classified child sets and parent set.

use std::{collections::BTreeSet, fmt};

use crate::{analysis::cfg::CfgEdgeKind, utils::graph::NodeId};

/// A strongly-typed identifier for nodes within a control dependence graph.
///
/// `CdgNodeId` wraps a `usize` index into the owning graph's node arena. Ids
/// are assigned sequentially starting from 0 (the root region is always id 0),
/// so they double as positions into per-node side tables.
///
/// Ids from different graphs are not interchangeable; a `CdgNodeId` is only
/// meaningful together with the [`ControlDependenceGraph`] that allocated it.
///
/// [`ControlDependenceGraph`]: crate::analysis::cdg::ControlDependenceGraph
///
/// # Thread Safety
///
/// `CdgNodeId` is [`Copy`], [`Send`], and [`Sync`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CdgNodeId(pub(crate) usize);

impl CdgNodeId {
    /// Creates a new `CdgNodeId` from a raw index value.
    ///
    /// This constructor is primarily intended for internal use and testing.
    /// Normal usage obtains ids from the owning graph's accessors.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        CdgNodeId(index)
    }

    /// Returns the raw index value of this node identifier.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for CdgNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CdgNodeId({})", self.0)
    }
}

impl fmt::Display for CdgNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

impl From<usize> for CdgNodeId {
    /// Converts a raw `usize` index into a `CdgNodeId`.
    #[inline]
    fn from(index: usize) -> Self {
        CdgNodeId(index)
    }
}

impl From<CdgNodeId> for usize {
    /// Extracts the raw index from a `CdgNodeId`.
    #[inline]
    fn from(node: CdgNodeId) -> Self {
        node.0
    }
}

/// Classification of a control dependence edge.
///
/// Every parent/child relation in the graph carries one of these tags. A
/// block that is a `True` child of a conditional executes when the branch
/// takes its true target; `False` mirrors that for the false target; `Other`
/// covers dependence through non-branching control transfers, region
/// membership, and the root's hold on the function entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CdgEdgeKind {
    /// Dependence on a conditional branch taking its true target.
    True,
    /// Dependence on a conditional branch taking its false target.
    False,
    /// Dependence through a non-branching transfer or region membership.
    Other,
}

impl CdgEdgeKind {
    /// Returns the short label used by the DOT renderer: `"T"`, `"F"`, or
    /// the empty string.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            CdgEdgeKind::True => "T",
            CdgEdgeKind::False => "F",
            CdgEdgeKind::Other => "",
        }
    }
}

impl From<CfgEdgeKind> for CdgEdgeKind {
    /// Maps a control flow edge classification onto the dependence edge tag
    /// it induces.
    fn from(kind: CfgEdgeKind) -> Self {
        match kind {
            CfgEdgeKind::ConditionalTrue => CdgEdgeKind::True,
            CfgEdgeKind::ConditionalFalse => CdgEdgeKind::False,
            CfgEdgeKind::Unconditional => CdgEdgeKind::Other,
        }
    }
}

/// One node of a control dependence graph.
///
/// A node either stands for a basic block of the analyzed function or is a
/// synthetic **region** node (no block) introduced by canonicalization to
/// merge shared dependence ancestry and to bound branch fan-out. The tag is
/// exclusive: a node never carries a block and region-hood at once.
///
/// Children are held in three classified sets ([`CdgEdgeKind`]); the parent
/// set mirrors every classified membership. The owning graph's mutation
/// primitives keep the two directions in lock-step, so after construction:
/// a node `P` appears in `child.parents()` if and only if `child` is present
/// in at least one of `P`'s three child sets.
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
/// let root = cdg.node(cdg.root()).unwrap();
/// assert!(root.is_region());
/// assert!(root.parents().is_empty());
/// # Ok::<(), depscope::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlDependenceNode {
    /// The basic block this node stands for; `None` marks a region node.
    block: Option<NodeId>,
    /// Children reached when the block's branch takes its true target.
    true_children: BTreeSet<CdgNodeId>,
    /// Children reached when the block's branch takes its false target.
    false_children: BTreeSet<CdgNodeId>,
    /// Children reached through non-branching dependence.
    other_children: BTreeSet<CdgNodeId>,
    /// Every node that holds this node in one of its child sets.
    parents: BTreeSet<CdgNodeId>,
}

impl ControlDependenceNode {
    /// Creates a fresh region node with no block and no relations.
    pub(crate) fn region() -> Self {
        ControlDependenceNode {
            block: None,
            true_children: BTreeSet::new(),
            false_children: BTreeSet::new(),
            other_children: BTreeSet::new(),
            parents: BTreeSet::new(),
        }
    }

    /// Creates a node standing for the given basic block.
    pub(crate) fn for_block(block: NodeId) -> Self {
        ControlDependenceNode {
            block: Some(block),
            true_children: BTreeSet::new(),
            false_children: BTreeSet::new(),
            other_children: BTreeSet::new(),
            parents: BTreeSet::new(),
        }
    }

    /// Returns the basic block this node stands for, or `None` for a region.
    #[must_use]
    pub const fn block(&self) -> Option<NodeId> {
        self.block
    }

    /// Returns `true` if this is a synthetic region node.
    #[must_use]
    pub const fn is_region(&self) -> bool {
        self.block.is_none()
    }

    /// Returns the children reached via a true-branch dependence edge.
    #[must_use]
    pub fn true_children(&self) -> &BTreeSet<CdgNodeId> {
        &self.true_children
    }

    /// Returns the children reached via a false-branch dependence edge.
    #[must_use]
    pub fn false_children(&self) -> &BTreeSet<CdgNodeId> {
        &self.false_children
    }

    /// Returns the children reached via a non-branching dependence edge.
    #[must_use]
    pub fn other_children(&self) -> &BTreeSet<CdgNodeId> {
        &self.other_children
    }

    /// Returns the child set for the given edge classification.
    #[must_use]
    pub fn children(&self, kind: CdgEdgeKind) -> &BTreeSet<CdgNodeId> {
        match kind {
            CdgEdgeKind::True => &self.true_children,
            CdgEdgeKind::False => &self.false_children,
            CdgEdgeKind::Other => &self.other_children,
        }
    }

    /// Returns an iterator over all children with their edge classification,
    /// true children first, then false, then other.
    pub fn tagged_children(&self) -> impl Iterator<Item = (CdgEdgeKind, CdgNodeId)> + '_ {
        self.true_children
            .iter()
            .map(|&child| (CdgEdgeKind::True, child))
            .chain(
                self.false_children
                    .iter()
                    .map(|&child| (CdgEdgeKind::False, child)),
            )
            .chain(
                self.other_children
                    .iter()
                    .map(|&child| (CdgEdgeKind::Other, child)),
            )
    }

    /// Returns the set of nodes holding this node as a child.
    #[must_use]
    pub fn parents(&self) -> &BTreeSet<CdgNodeId> {
        &self.parents
    }

    /// Returns the number of parents.
    #[must_use]
    pub fn parent_count(&self) -> usize {
        self.parents.len()
    }

    /// Returns the single parent if this node has exactly one, `None`
    /// otherwise.
    #[must_use]
    pub fn sole_parent(&self) -> Option<CdgNodeId> {
        if self.parents.len() == 1 {
            self.parents.iter().next().copied()
        } else {
            None
        }
    }

    /// Checks whether the given node sits in any of the three child sets.
    pub(crate) fn has_child(&self, child: CdgNodeId) -> bool {
        self.true_children.contains(&child)
            || self.false_children.contains(&child)
            || self.other_children.contains(&child)
    }

    /// Mutable access to the child set for the given edge classification.
    pub(crate) fn children_mut(&mut self, kind: CdgEdgeKind) -> &mut BTreeSet<CdgNodeId> {
        match kind {
            CdgEdgeKind::True => &mut self.true_children,
            CdgEdgeKind::False => &mut self.false_children,
            CdgEdgeKind::Other => &mut self.other_children,
        }
    }

    /// Mutable access to the parent set.
    pub(crate) fn parents_mut(&mut self) -> &mut BTreeSet<CdgNodeId> {
        &mut self.parents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdg_node_id_basics() {
        let id = CdgNodeId::new(42);
        assert_eq!(id.index(), 42);
        assert_eq!(format!("{id:?}"), "CdgNodeId(42)");
        assert_eq!(format!("{id}"), "d42");

        let from_usize: CdgNodeId = 7usize.into();
        assert_eq!(usize::from(from_usize), 7);
    }

    #[test]
    fn test_cdg_node_id_ordering() {
        let mut ids = vec![CdgNodeId::new(3), CdgNodeId::new(1), CdgNodeId::new(2)];
        ids.sort();
        assert_eq!(
            ids,
            vec![CdgNodeId::new(1), CdgNodeId::new(2), CdgNodeId::new(3)]
        );
    }

    #[test]
    fn test_edge_kind_labels() {
        assert_eq!(CdgEdgeKind::True.label(), "T");
        assert_eq!(CdgEdgeKind::False.label(), "F");
        assert_eq!(CdgEdgeKind::Other.label(), "");
    }

    #[test]
    fn test_edge_kind_from_cfg() {
        assert_eq!(
            CdgEdgeKind::from(CfgEdgeKind::ConditionalTrue),
            CdgEdgeKind::True
        );
        assert_eq!(
            CdgEdgeKind::from(CfgEdgeKind::ConditionalFalse),
            CdgEdgeKind::False
        );
        assert_eq!(
            CdgEdgeKind::from(CfgEdgeKind::Unconditional),
            CdgEdgeKind::Other
        );
    }

    #[test]
    fn test_node_tag_is_exclusive() {
        let region = ControlDependenceNode::region();
        assert!(region.is_region());
        assert_eq!(region.block(), None);

        let block_node = ControlDependenceNode::for_block(NodeId::new(3));
        assert!(!block_node.is_region());
        assert_eq!(block_node.block(), Some(NodeId::new(3)));
    }

    #[test]
    fn test_children_routing() {
        let mut node = ControlDependenceNode::region();
        node.children_mut(CdgEdgeKind::True).insert(CdgNodeId::new(1));
        node.children_mut(CdgEdgeKind::False).insert(CdgNodeId::new(2));
        node.children_mut(CdgEdgeKind::Other).insert(CdgNodeId::new(3));

        assert!(node.children(CdgEdgeKind::True).contains(&CdgNodeId::new(1)));
        assert!(node.children(CdgEdgeKind::False).contains(&CdgNodeId::new(2)));
        assert!(node.children(CdgEdgeKind::Other).contains(&CdgNodeId::new(3)));

        assert!(node.has_child(CdgNodeId::new(2)));
        assert!(!node.has_child(CdgNodeId::new(4)));

        let tagged: Vec<_> = node.tagged_children().collect();
        assert_eq!(
            tagged,
            vec![
                (CdgEdgeKind::True, CdgNodeId::new(1)),
                (CdgEdgeKind::False, CdgNodeId::new(2)),
                (CdgEdgeKind::Other, CdgNodeId::new(3)),
            ]
        );
    }

    #[test]
    fn test_sole_parent() {
        let mut node = ControlDependenceNode::for_block(NodeId::new(0));
        assert_eq!(node.sole_parent(), None);

        node.parents_mut().insert(CdgNodeId::new(5));
        assert_eq!(node.parent_count(), 1);
        assert_eq!(node.sole_parent(), Some(CdgNodeId::new(5)));

        node.parents_mut().insert(CdgNodeId::new(6));
        assert_eq!(node.sole_parent(), None);
    }
}
