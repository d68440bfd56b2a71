//! Signed response parsing and Ed25519 verification.
//!
//! Responses use the format: `base64url(payload).base64url(signature)`
//!
//! The payload is a JSON object containing:
//! - `code`: the verdict ([`ResponseCode`] wire encoding)
//! - `nonce`: the request nonce, echoed back
//! - `app`: the app id the verdict applies to
//! - `ver`: the app version the server saw
//! - `uid`: an opaque account identifier
//! - `iat`: issued-at timestamp (seconds since epoch)
//! - `extra`: string map of policy extras (`VT`, `GT`, `GR`)
//!
//! The signature covers `payload_b64.as_bytes()` (the base64url-encoded
//! payload string, not the decoded JSON), matching the server
//! implementation.

use crate::error::{ClientError, ClientResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use storegate_types::ResponseCode;

/// The decoded response payload (matches server JSON structure).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload {
    /// The verdict.
    pub code: ResponseCode,
    /// The request nonce, echoed back.
    pub nonce: u64,
    /// The app id the verdict applies to.
    #[serde(rename = "app")]
    pub app_id: String,
    /// The app version the server saw.
    #[serde(rename = "ver")]
    pub version: String,
    /// Opaque account identifier.
    #[serde(rename = "uid")]
    pub user_id: String,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Policy extras (`VT`, `GT`, `GR`); unknown keys are preserved.
    #[serde(rename = "extra", default)]
    pub extras: BTreeMap<String, String>,
}

/// A parsed and signature-verified server response.
#[derive(Debug, Clone)]
pub struct SignedResponse {
    raw: String,
    payload: ResponsePayload,
}

impl SignedResponse {
    /// Parses and verifies a raw response string against a public key.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is invalid, the signature does not
    /// verify, or the payload JSON is malformed.
    pub fn parse_with_key(raw: &str, pub_key_bytes: &[u8; 32]) -> ClientResult<Self> {
        let raw = raw.trim();

        let parts: Vec<&str> = raw.split('.').collect();
        if parts.len() != 2 {
            return Err(ClientError::InvalidResponseFormat(
                "response must have exactly two parts separated by a dot".to_string(),
            ));
        }

        let payload_b64 = parts[0];
        let signature_b64 = parts[1];

        let sig_bytes = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
            ClientError::InvalidResponseFormat(format!("invalid signature base64: {e}"))
        })?;

        let signature = Signature::from_slice(&sig_bytes).map_err(|_| {
            ClientError::InvalidResponseFormat("invalid signature length".to_string())
        })?;

        let verifying_key =
            VerifyingKey::from_bytes(pub_key_bytes).map_err(|_| ClientError::InvalidPublicKey)?;

        // Verify over the base64url-encoded payload bytes (matches server).
        verifying_key
            .verify(payload_b64.as_bytes(), &signature)
            .map_err(|_| ClientError::InvalidSignature)?;

        let payload_json = URL_SAFE_NO_PAD.decode(payload_b64).map_err(|e| {
            ClientError::InvalidResponseFormat(format!("invalid payload base64: {e}"))
        })?;

        let payload: ResponsePayload = serde_json::from_slice(&payload_json)
            .map_err(|e| ClientError::InvalidPayload(format!("invalid payload JSON: {e}")))?;

        Ok(Self {
            raw: raw.to_string(),
            payload,
        })
    }

    /// Returns the raw response string.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the decoded payload.
    #[must_use]
    pub fn payload(&self) -> &ResponsePayload {
        &self.payload
    }

    /// Checks that the response answers this request: nonce and app id
    /// must both match.
    ///
    /// # Errors
    ///
    /// Returns `NonceMismatch` or `AppIdMismatch` accordingly.
    pub fn validate_for(&self, nonce: u64, app_id: &str) -> ClientResult<()> {
        if self.payload.nonce != nonce {
            return Err(ClientError::NonceMismatch);
        }
        if self.payload.app_id != app_id {
            return Err(ClientError::AppIdMismatch(self.payload.app_id.clone()));
        }
        Ok(())
    }
}
