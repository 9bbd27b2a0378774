//! Injectable construction checkpoints.
//!
//! The two-phase builder reports its progress through the [`BuildTrace`]
//! trait instead of carrying any logging of its own. Hosts that want to
//! narrate or record construction implement the trait and pass it to
//! [`ControlDependenceGraph::build_traced`]; everyone else gets the
//! do-nothing [`NullTrace`] through
//! [`ControlDependenceGraph::build`].
//!
//! [`ControlDependenceGraph::build`]: crate::analysis::cdg::ControlDependenceGraph::build
//! [`ControlDependenceGraph::build_traced`]: crate::analysis::cdg::ControlDependenceGraph::build_traced

use crate::{
    analysis::cdg::node::{CdgEdgeKind, CdgNodeId},
    utils::graph::NodeId,
};

/// Observer of control dependence graph construction.
///
/// Every method has a no-op default, so implementations override only the
/// checkpoints they care about. Methods take `&mut self`; a trace may
/// accumulate state freely.
///
/// # Examples
///
/// ```rust
/// use depscope::analysis::{
///     BasicBlock, BuildTrace, CdgEdgeKind, CdgNodeId, ControlDependenceGraph,
///     ControlFlowGraph, Terminator,
/// };
/// use depscope::graph::NodeId;
///
/// #[derive(Default)]
/// struct EdgeCounter {
///     classified: usize,
/// }
///
/// impl BuildTrace for EdgeCounter {
///     fn edge_classified(&mut self, _source: NodeId, _target: NodeId, _kind: CdgEdgeKind) {
///         self.classified += 1;
///     }
/// }
///
/// // Only edges that carry dependence are classified: an edge whose target
/// // post-dominates its source is skipped first. A conditional with two
/// // exits keeps both of its edges.
/// let cfg = ControlFlowGraph::from_blocks(vec![
///     BasicBlock::new(0, Terminator::Conditional { true_target: 1, false_target: 2 }),
///     BasicBlock::new(1, Terminator::Other { targets: vec![] }),
///     BasicBlock::new(2, Terminator::Other { targets: vec![] }),
/// ])?;
///
/// let mut counter = EdgeCounter::default();
/// let _cdg = ControlDependenceGraph::build_traced(&cfg, &mut counter)?;
/// assert_eq!(counter.classified, 2);
/// # Ok::<(), depscope::Error>(())
/// ```
pub trait BuildTrace {
    /// A control flow edge from `_source` to `_target` was classified as
    /// `_kind` during dependence propagation.
    fn edge_classified(&mut self, _source: NodeId, _target: NodeId, _kind: CdgEdgeKind) {}

    /// A dependence edge was recorded: `_child` became a `_kind` child of
    /// `_parent`. Fired for self-referential edges and for the root's hold
    /// on the entry chain as well.
    fn dependence_added(&mut self, _parent: CdgNodeId, _child: CdgNodeId, _kind: CdgEdgeKind) {}

    /// A fresh region node `_region` was allocated during canonicalization.
    fn region_created(&mut self, _region: CdgNodeId) {}

    /// Node `_node` was folded into the existing region `_region` because
    /// their dependence signatures coincide.
    fn region_merged(&mut self, _region: CdgNodeId, _node: CdgNodeId) {}
}

/// The do-nothing trace used by the untraced construction path.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTrace;

impl BuildTrace for NullTrace {}
