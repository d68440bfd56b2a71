//! Error types for the obfuscation module.

use thiserror::Error;

/// Obfuscation-specific errors.
#[derive(Debug, Error)]
pub enum ObfuscatorError {
    /// The integrator salt is too short to derive a key from.
    #[error("salt too short: need at least {min} bytes, got {got}")]
    SaltTooShort { min: usize, got: usize },

    /// Sealing a value failed.
    #[error("obfuscation failed: {0}")]
    Obfuscation(String),

    /// A sealed value failed authentication (tampered, or obfuscated on a
    /// different device or for a different app).
    #[error("validation failed: {0}")]
    Validation(String),

    /// No platform cache directory is available for the store file.
    #[error("no cache directory available on this platform")]
    NoCacheDir,

    /// Reading or writing the store file failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store file is not valid JSON.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for obfuscation operations.
pub type ObfuscatorResult<T> = Result<T, ObfuscatorError>;
