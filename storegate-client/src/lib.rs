//! Asynchronous license verification client.
//!
//! This crate owns the check itself:
//! - Signed response parsing and Ed25519 verification
//! - Per-check nonces matched against the response (replay defense)
//! - A transport seam, with an HTTP implementation behind the `online`
//!   feature
//! - [`LicenseChecker::check_access`]: one call, exactly one callback
//!   invocation — allow, deny, or application error
//!
//! # Response Format
//!
//! Responses are formatted as `base64url(payload).base64url(signature)`.
//! The payload is a JSON object signed with Ed25519, carrying the verdict
//! code, the echoed nonce, the app id, and policy extras. The signature
//! covers the base64url-encoded payload string, not the decoded JSON.
//!
//! # Threading
//!
//! `check_access` must be called from within a tokio runtime. The callback
//! fires on the calling thread for decisions that need no network round
//! trip (setup errors, cache hits) and on a worker thread otherwise;
//! callers that own a UI must marshal display work themselves.

mod checker;
mod error;
mod response;
mod transport;

pub use checker::{AccessVerifier, CheckerConfig, LicenseChecker, LicenseCheckerCallback};
pub use error::{ClientError, ClientResult};
pub use response::{ResponsePayload, SignedResponse};
pub use transport::{CheckRequest, Transport};

#[cfg(feature = "online")]
pub use transport::HttpTransport;
