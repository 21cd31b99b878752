//! Error types and handling for the corpus graph system
//!
//! Expected absence (a token past the end of the corpus, a node id already
//! deleted) is never an error: those paths return `Option::None` or succeed
//! as no-ops. The types here cover genuine failures only, with enough
//! context on multi-step mutations to allow idempotent manual retry.

use crate::core::types::GraphNodeType;
use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the corpus graph system
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage layer errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Graph layer errors
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A multi-step mutation failed partway through. The sequence has no
    /// rollback; `step` names the failed write so the caller can retry the
    /// operation idempotently.
    #[error("Mutation failed at step '{step}': {source}")]
    Mutation {
        /// Name of the write step that failed
        step: &'static str,
        /// Underlying failure
        source: Box<Error>,
    },

    /// Internal system errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors from std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Prometheus metrics errors
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Storage-specific errors
///
/// An in-memory store never raises these; they model the failure surface of
/// a real backend so that every mutating call site is already fallible.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend unreachable or refusing writes
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Corruption detected in stored data
    #[error("Data corruption detected: {0}")]
    Corruption(String),

    /// Disk I/O operation failed
    #[error("Disk I/O failed: {0}")]
    DiskIo(#[from] std::io::Error),
}

/// Graph operation errors
#[derive(Error, Debug)]
pub enum GraphError {
    /// A graph record references a chapter/verse outside its declared span
    #[error("Token range references verse {verse_number} outside chapter {chapter_number}")]
    RangeOutsideChapter {
        /// Declared chapter of the graph
        chapter_number: u16,
        /// Offending verse number
        verse_number: u16,
    },

    /// A node variant resolved to no storage collection where one is required
    #[error("No collection for node type '{node_type}'")]
    MissingCollection {
        /// The unresolvable node type
        node_type: GraphNodeType,
    },

    /// Invalid graph structure
    #[error("Invalid graph structure: {0}")]
    InvalidStructure(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Wrap a failure with the name of the mutation step it occurred in
    pub fn mutation(step: &'static str, source: Error) -> Self {
        Self::Mutation {
            step,
            source: Box::new(source),
        }
    }

    /// The failed mutation step, if this error came out of a multi-step
    /// sequence.
    pub fn mutation_step(&self) -> Option<&'static str> {
        match self {
            Self::Mutation { step, .. } => Some(step),
            _ => None,
        }
    }

    /// Check if this is a client error (bad input rather than system failure)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::Graph(_) | Error::Serialization(_)
        )
    }

    /// Check if this is a retryable infrastructure error
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Store(StoreError::Unavailable(_)) | Error::Store(StoreError::DiskIo(_)) => true,
            Error::Mutation { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_step_context() {
        let inner = Error::Store(StoreError::Unavailable("connection refused".into()));
        let err = Error::mutation("persist graph record", inner);
        assert_eq!(err.mutation_step(), Some("persist graph record"));
        assert!(err.is_retryable());
        assert!(err
            .to_string()
            .contains("Mutation failed at step 'persist graph record'"));
    }

    #[test]
    fn test_classification() {
        assert!(Error::invalid_input("bad address").is_client_error());
        assert!(!Error::invalid_input("bad address").is_retryable());
        assert!(Error::from(GraphError::MissingCollection {
            node_type: GraphNodeType::Root
        })
        .is_client_error());
    }
}
