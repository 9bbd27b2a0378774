//! Control flow edge types for the CFG.
//!
//! This module defines the edge classification used in the control flow graph,
//! providing semantic information about how control flows between basic blocks.
//! The dependence analysis maps this classification onto its own edge tags, so
//! every CFG edge must carry exactly one of these kinds.

/// The kind of control flow represented by an edge.
///
/// This enum classifies edges by their control flow semantics, which drives
/// how control dependence edges are tagged during graph construction.
///
/// # Examples
///
/// ```rust
/// use depscope::analysis::CfgEdgeKind;
///
/// let edge_kind = CfgEdgeKind::ConditionalTrue;
/// assert!(edge_kind.is_conditional());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CfgEdgeKind {
    /// Unconditional control flow: a direct jump, a switch case, or
    /// fall-through to a single successor.
    Unconditional,

    /// The "true" branch of a conditional.
    ///
    /// Taken when the condition evaluates to true. When a conditional's two
    /// targets name the same block, the edge pair is classified through this
    /// variant first.
    ConditionalTrue,

    /// The "false" branch of a conditional.
    ///
    /// Taken when the condition evaluates to false.
    ConditionalFalse,
}

impl CfgEdgeKind {
    /// Returns `true` if this is a conditional branch edge.
    ///
    /// # Returns
    ///
    /// `true` for [`ConditionalTrue`](Self::ConditionalTrue) and
    /// [`ConditionalFalse`](Self::ConditionalFalse), `false` otherwise.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use depscope::analysis::CfgEdgeKind;
    ///
    /// assert!(CfgEdgeKind::ConditionalTrue.is_conditional());
    /// assert!(CfgEdgeKind::ConditionalFalse.is_conditional());
    /// assert!(!CfgEdgeKind::Unconditional.is_conditional());
    /// ```
    #[must_use]
    pub const fn is_conditional(&self) -> bool {
        matches!(self, Self::ConditionalTrue | Self::ConditionalFalse)
    }

    /// Returns the label used for this edge in rendered output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unconditional => "",
            Self::ConditionalTrue => "true",
            Self::ConditionalFalse => "false",
        }
    }
}
