//! Error types for yndex-core

use std::fmt;

use thiserror::Error;

/// Result type alias for yndex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across the yndex crates
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The index is structurally invalid and must be rebuilt before use.
    #[error("index '{index}' requires rebuild before further use")]
    RebuildRequired {
        /// Name of the affected index.
        index: String,
    },

    /// A key failed the index's declared key type contract.
    #[error("index '{index}' expects {expected} keys, got {actual}")]
    InvalidKeyType {
        /// Name of the affected index.
        index: String,
        /// The declared key type.
        expected: String,
        /// The offending key's type.
        actual: String,
    },

    /// The search engine failed while executing a delegated operation.
    #[error("engine '{engine}' failed during {operation}: {message}")]
    Engine {
        /// Engine name, as reported by the engine itself.
        engine: String,
        /// The operation being delegated (put, get, remove, clear).
        operation: String,
        /// Engine-reported failure detail.
        message: String,
    },

    /// A managed-index binding was attempted on an engine that already
    /// holds one.
    #[error("engine '{0}' is already bound to a managed index")]
    AlreadyBound(String),

    /// Any other operational failure.
    #[error("operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// The index needs a rebuild before it can serve the operation.
    pub fn rebuild_required(index: impl Into<String>) -> Self {
        Self::RebuildRequired {
            index: index.into(),
        }
    }

    /// The supplied key does not match the index's declared key type.
    pub fn invalid_key_type(
        index: impl Into<String>,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Self::InvalidKeyType {
            index: index.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// A delegated engine operation failed.
    pub fn engine(
        engine: impl Into<String>,
        operation: impl Into<String>,
        message: impl fmt::Display,
    ) -> Self {
        Self::Engine {
            engine: engine.into(),
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// An engine rejected a second managed-index binding.
    pub fn already_bound(engine: impl Into<String>) -> Self {
        Self::AlreadyBound(engine.into())
    }

    /// General operational failure.
    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation(message.into())
    }
}

// ============================================================================
// Tests
// ============================================================================
