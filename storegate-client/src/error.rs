//! Error types for the verification client.

use thiserror::Error;

/// Client-specific errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The response string is not two base64url parts joined by a dot.
    #[error("invalid response format: {0}")]
    InvalidResponseFormat(String),

    /// Ed25519 signature verification failed.
    #[error("response signature invalid")]
    InvalidSignature,

    /// The configured public key does not parse.
    #[error("invalid public key")]
    InvalidPublicKey,

    /// Payload JSON is malformed or missing required fields.
    #[error("invalid response payload: {0}")]
    InvalidPayload(String),

    /// The response nonce does not match the request nonce.
    #[error("response nonce mismatch")]
    NonceMismatch,

    /// The response names a different app than the request.
    #[error("response app id mismatch: {0}")]
    AppIdMismatch(String),

    /// The transport failed to reach the server.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
