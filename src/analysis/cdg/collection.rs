//! Per-unit collection of control dependence graphs.
//!
//! Building the CDG for different functions is embarrassingly parallel:
//! each function's post-dominator tree is an independent prerequisite and
//! each graph is built into its own arena. [`ControlDependenceGraphs`]
//! fans the construction out with `rayon` and gathers the results into a
//! concurrent map keyed by function name, so only the final insertion
//! touches shared state.

use std::sync::Arc;

use dashmap::DashMap;
use rayon::prelude::*;

use crate::{
    analysis::{cdg::graph::ControlDependenceGraph, cfg::ControlFlowGraph},
    Result,
};

/// Control dependence graphs for every function of a compilation unit.
///
/// Functions are identified by a caller-chosen name; the collection owns one
/// [`ControlDependenceGraph`] per name. Graphs are handed out as
/// [`Arc`] clones, so lookups never block construction of other entries and
/// results can be shared across threads freely.
///
/// # Thread Safety
///
/// The underlying map is a [`DashMap`]; insertion and lookup are safe from
/// any thread.
///
/// # Examples
///
/// ```rust
/// use depscope::analysis::{
///     BasicBlock, ControlDependenceGraphs, ControlFlowGraph, Terminator,
/// };
///
/// let main_cfg = ControlFlowGraph::from_blocks(vec![
///     BasicBlock::new(0, Terminator::Conditional { true_target: 1, false_target: 2 }),
///     BasicBlock::new(1, Terminator::Other { targets: vec![2] }),
///     BasicBlock::new(2, Terminator::Other { targets: vec![] }),
/// ])?;
/// let helper_cfg = ControlFlowGraph::from_blocks(vec![
///     BasicBlock::new(0, Terminator::Other { targets: vec![] }),
/// ])?;
///
/// let graphs = ControlDependenceGraphs::analyze_all(vec![
///     ("main".to_string(), main_cfg),
///     ("helper".to_string(), helper_cfg),
/// ])?;
///
/// assert_eq!(graphs.len(), 2);
/// let main_cdg = graphs.graph("main").unwrap();
/// assert!(main_cdg.node_count() > 3);
/// # Ok::<(), depscope::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ControlDependenceGraphs {
    /// Function name to graph map.
    graphs: DashMap<String, Arc<ControlDependenceGraph>>,
}

impl ControlDependenceGraphs {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        ControlDependenceGraphs {
            graphs: DashMap::new(),
        }
    }

    /// Builds the control dependence graph of every function in parallel.
    ///
    /// Each function's graph is constructed independently on the rayon
    /// thread pool; the first failure aborts the remaining work and is
    /// returned.
    ///
    /// # Arguments
    ///
    /// * `functions` - `(name, CFG)` pairs, one per function of the unit
    ///
    /// # Errors
    ///
    /// Returns the first construction failure, e.g.
    /// [`Error::Malformed`](crate::Error::Malformed) for a function whose
    /// blocks cannot all reach an exit.
    pub fn analyze_all(functions: Vec<(String, ControlFlowGraph<'_>)>) -> Result<Self> {
        let collection = Self::new();

        functions.into_par_iter().try_for_each(|(name, cfg)| {
            let cdg = ControlDependenceGraph::build(&cfg)?;
            collection.graphs.insert(name, Arc::new(cdg));
            Ok(())
        })?;

        Ok(collection)
    }

    /// Builds and inserts the graph for one function, replacing any
    /// previous entry under the same name.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ControlDependenceGraph::build`].
    pub fn analyze(&self, name: impl Into<String>, cfg: &ControlFlowGraph<'_>) -> Result<()> {
        let cdg = ControlDependenceGraph::build(cfg)?;
        self.graphs.insert(name.into(), Arc::new(cdg));
        Ok(())
    }

    /// Returns the graph built for the named function, if any.
    #[must_use]
    pub fn graph(&self, name: &str) -> Option<Arc<ControlDependenceGraph>> {
        self.graphs.get(name).map(|entry| entry.value().clone())
    }

    /// Returns `true` if a graph exists for the named function.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.graphs.contains_key(name)
    }

    /// Returns the number of functions analyzed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Returns `true` if no function has been analyzed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Returns the names of all analyzed functions.
    ///
    /// The order is unspecified.
    #[must_use]
    pub fn function_names(&self) -> Vec<String> {
        self.graphs.iter().map(|entry| entry.key().clone()).collect()
    }
}
