//! Error types for building the document tree

use thiserror::Error;

/// Errors that can occur while folding parser events into a [`Document`](super::Document)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The parser produced a construct the renderer has no rule for
    #[error("Unsupported node kind: {kind}")]
    UnsupportedNodeKind {
        /// Name of the unrecognized construct (e.g. `InlineMath`)
        kind: String,
    },

    /// An end event arrived that does not close the innermost open node
    #[error("Unbalanced event stream: expected end of {expected}, found {found}")]
    Unbalanced {
        /// The node kind that is currently open
        expected: String,
        /// The end event that was received
        found: String,
    },

    /// Nodes are nested deeper than the renderer accepts
    #[error("Document nesting exceeds {limit} levels")]
    NestingTooDeep {
        /// The deepest nesting accepted
        limit: usize,
    },
}

impl TreeError {
    pub(crate) fn unsupported(kind: impl Into<String>) -> Self {
        TreeError::UnsupportedNodeKind { kind: kind.into() }
    }
}
