use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Control dependence analysis is a pure computation over an already validated control flow
/// graph, so there is no recoverable error class: every variant reflects either misuse of the
/// API (a precondition violation by the caller) or an internal defect surfaced by a consistency
/// check. Callers are expected to propagate these, not retry them.
///
/// # Error Categories
///
/// ## Input Validation Errors
/// - [`Error::Malformed`] - Invalid control flow graph structure
///
/// ## Analysis Errors
/// - [`Error::GraphError`] - Graph precondition or internal consistency violation
///
/// # Examples
///
/// ```rust
/// use depscope::{Error, analysis::{BasicBlock, ControlFlowGraph, Terminator}};
///
/// // A branch target that does not name any block is rejected up front.
/// let blocks = vec![BasicBlock::new(0, Terminator::Other { targets: vec![7] })];
/// match ControlFlowGraph::from_blocks(blocks) {
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed CFG: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The control flow graph input is invalid and could not be analyzed.
    ///
    /// This error indicates that the supplied blocks do not form a well-formed
    /// function body: an empty block list, duplicate block ids, a branch target
    /// that names no block, a function without an exit block, or a block from
    /// which no exit is reachable (post-dominance is undefined for it). The
    /// error includes the source location where the problem was detected for
    /// debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Graph precondition or internal consistency violation.
    ///
    /// Errors related to graph structure: querying with a basic block that is
    /// not part of the analyzed function, classifying a block pair with no
    /// direct control flow edge, adding an edge with an out-of-bounds node id,
    /// or a canonicalization invariant that no longer holds (a bug in the
    /// construction passes, never something to patch over silently).
    #[error("{0}")]
    GraphError(String),
}
