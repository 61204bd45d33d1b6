//! Error types for hookpin-yaml

use thiserror::Error;

/// Result type alias using hookpin-yaml Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or editing a document
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input text is not a well-formed document
    #[error("YAML parse error at line {line}: {message}")]
    Parse {
        /// 1-indexed line of the offending token
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Input decodes to nothing editable (comments/whitespace only)
    #[error("document is empty, nothing to edit")]
    EmptyDocument,

    /// Container-style access or mutation on the wrong node kind
    #[error("invalid traversal: expected {expected}, found {found}")]
    InvalidTraversal {
        /// Node kind the operation requires
        expected: &'static str,
        /// Node kind actually present
        found: &'static str,
    },

    /// Sequence write past the append boundary
    #[error("sequence index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Current sequence length
        len: usize,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}
