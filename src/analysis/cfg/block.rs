//! Basic block input model for control flow graph construction.
//!
//! This module defines the block representation callers hand to
//! [`ControlFlowGraph`](crate::analysis::ControlFlowGraph): an opaque numeric
//! id, an optional human-readable name, and a terminator describing where
//! control can go next. Blocks carry no instructions; the dependence analysis
//! only needs the branching structure.

/// How a basic block transfers control when it finishes executing.
///
/// The terminator is decided once per block at construction time. Analyses
/// never re-derive it from instruction inspection; they match on this tag.
///
/// # Examples
///
/// ```rust
/// use depscope::analysis::Terminator;
///
/// let branch = Terminator::Conditional { true_target: 1, false_target: 2 };
/// assert!(branch.is_conditional());
/// assert_eq!(branch.targets(), vec![1, 2]);
///
/// let ret = Terminator::Other { targets: vec![] };
/// assert!(ret.targets().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminator {
    /// A two-way branch on a condition.
    ///
    /// `true_target` and `false_target` name successor blocks by id. The two
    /// targets may be equal; such a degenerate branch behaves like an
    /// unconditional jump but is still classified through its true edge.
    Conditional {
        /// Block id executed when the condition holds.
        true_target: usize,
        /// Block id executed when the condition does not hold.
        false_target: usize,
    },

    /// Any non-conditional transfer: unconditional jump, switch, return.
    ///
    /// `targets` names the successor blocks by id, in any order. An empty
    /// list marks the block as a function exit.
    Other {
        /// Successor block ids; empty for exits.
        targets: Vec<usize>,
    },
}

impl Terminator {
    /// Returns `true` if this terminator is a two-way conditional branch.
    #[must_use]
    pub const fn is_conditional(&self) -> bool {
        matches!(self, Self::Conditional { .. })
    }

    /// Returns the successor block ids named by this terminator.
    ///
    /// For a conditional branch the true target comes first. Duplicates are
    /// preserved; each entry becomes its own control flow edge.
    #[must_use]
    pub fn targets(&self) -> Vec<usize> {
        match self {
            Self::Conditional {
                true_target,
                false_target,
            } => vec![*true_target, *false_target],
            Self::Other { targets } => targets.clone(),
        }
    }

    /// Returns `true` if this terminator ends the function (no successors).
    #[must_use]
    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Other { targets } if targets.is_empty())
    }
}

/// A basic block as seen by the control flow analyses.
///
/// Blocks are identified by a caller-chosen numeric id; terminator targets
/// refer to these ids, not to positions in the block list. The first block
/// in the list handed to the graph constructor is the function entry.
///
/// # Examples
///
/// ```rust
/// use depscope::analysis::{BasicBlock, Terminator};
///
/// let block = BasicBlock::new(3, Terminator::Other { targets: vec![4] })
///     .with_name("loop.latch");
///
/// assert_eq!(block.id(), 3);
/// assert_eq!(block.name(), Some("loop.latch"));
/// assert!(!block.terminator().is_conditional());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    /// Caller-chosen identity of this block.
    id: usize,
    /// Optional human-readable name, used by the DOT renderers.
    name: Option<String>,
    /// How control leaves this block.
    terminator: Terminator,
}

impl BasicBlock {
    /// Creates a new basic block with the given id and terminator.
    #[must_use]
    pub const fn new(id: usize, terminator: Terminator) -> Self {
        Self {
            id,
            name: None,
            terminator,
        }
    }

    /// Attaches a human-readable name to this block.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the caller-chosen id of this block.
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Returns the block's name, if one was attached.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the block's terminator.
    #[must_use]
    pub const fn terminator(&self) -> &Terminator {
        &self.terminator
    }

    /// Returns the label used for this block in rendered output: the name if
    /// present, otherwise `bb<id>`.
    #[must_use]
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("bb{}", self.id))
    }
}
