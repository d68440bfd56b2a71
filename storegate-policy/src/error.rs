//! Error types for the policy module.

use thiserror::Error;

/// Policy-specific errors.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The obfuscated store failed to read or write.
    #[error("policy store error: {0}")]
    Store(#[from] storegate_obfuscator::ObfuscatorError),

    /// A persisted snapshot failed to serialize.
    #[error("policy serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;
