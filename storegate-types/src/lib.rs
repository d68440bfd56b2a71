//! Core type definitions for Storegate licensing.
//!
//! This crate defines the vocabulary shared by the policy, client, and
//! controller crates:
//! - Grant decisions (the tagged outcome of one license check)
//! - Denial reasons and their static mapping to recovery actions
//! - Server response codes and application (setup) error codes
//!
//! Everything here is plain data. Verification, caching, and presentation
//! logic belong to the crates that consume these types.

mod codes;
mod decision;
mod reason;

pub use codes::{ErrorCode, ResponseCode};
pub use decision::{GrantDecision, GrantReason};
pub use reason::{DenialReason, RecoveryAction};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown response code: {0}")]
    UnknownResponseCode(i32),

    #[error("unknown error code: {0}")]
    UnknownErrorCode(i32),
}
