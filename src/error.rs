//! Error handling module for modchange
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Sequencing itself only fails on caller precondition violations; those are
//! carried by [`SequenceError`] and wrapped here for the CLI and review layer.

use thiserror::Error;

/// Precondition violations detected while ordering a change set.
///
/// Well-formed input (an acyclic reason graph of reasonable depth) never
/// produces one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// A chain of parent reasons loops back onto itself
    #[error("cyclic dependency reasons: {}", chain.join(" -> "))]
    CycleDetected { chain: Vec<String> },

    /// A dependency chain is deeper than the configured limit
    #[error("dependency chain deeper than {limit} levels at '{identifier}'")]
    DepthExceeded { limit: usize, identifier: String },
}

/// Main error type for modchange
#[derive(Error, Debug)]
pub enum ModChangeError {
    /// IO errors (reading change files, configs)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors (malformed change files)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Sequencing precondition violations
    #[error("Sequencing failed: {0}")]
    Sequence(#[from] SequenceError),
}

/// Result type alias for modchange operations
pub type Result<T> = std::result::Result<T, ModChangeError>;

impl ModChangeError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
