//! Shared test helpers for client tests.

#![allow(dead_code)]

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ed25519_dalek::{Signer, SigningKey};
use std::collections::BTreeMap;
use std::sync::Arc;
use storegate_client::{CheckRequest, ClientError, ClientResult, LicenseCheckerCallback, Transport};
use storegate_types::{DenialReason, ErrorCode, GrantDecision, GrantReason, ResponseCode};
use tokio::sync::mpsc;

/// Returns a deterministic Ed25519 key pair from a fixed seed.
pub fn test_keypair() -> (SigningKey, [u8; 32]) {
    let seed: [u8; 32] = [
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
        25, 26, 27, 28, 29, 30, 31, 32,
    ];
    let signing_key = SigningKey::from_bytes(&seed);
    let verifying_key = signing_key.verifying_key();
    (signing_key, verifying_key.to_bytes())
}

/// Signs a payload JSON string: `base64url(payload).base64url(signature)`.
/// Signs over the base64url-encoded payload bytes (matching server behavior).
pub fn sign_response(signing_key: &SigningKey, payload_json: &str) -> String {
    let payload_b64 = URL_SAFE_NO_PAD.encode(payload_json.as_bytes());
    let signature = signing_key.sign(payload_b64.as_bytes());
    let sig_b64 = URL_SAFE_NO_PAD.encode(signature.to_bytes());
    format!("{payload_b64}.{sig_b64}")
}

/// Builds a response payload JSON for the given verdict and request echo.
pub fn payload_json(
    code: ResponseCode,
    nonce: u64,
    app_id: &str,
    extras: &BTreeMap<String, String>,
) -> String {
    serde_json::json!({
        "code": code.code(),
        "nonce": nonce,
        "app": app_id,
        "ver": "1.0.0",
        "uid": "account-1",
        "iat": chrono::Utc::now().timestamp(),
        "extra": extras,
    })
    .to_string()
}

/// How a [`SigningTransport`] should corrupt its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mangle {
    /// Answer honestly.
    None,
    /// Echo the wrong nonce.
    Nonce,
    /// Name the wrong app.
    AppId,
    /// Sign with a different key.
    Signature,
}

/// A transport that locally signs a scripted verdict, echoing the request.
pub struct SigningTransport {
    key: SigningKey,
    code: ResponseCode,
    extras: BTreeMap<String, String>,
    mangle: Mangle,
    calls: std::sync::atomic::AtomicUsize,
}

impl SigningTransport {
    pub fn new(key: SigningKey, code: ResponseCode) -> Self {
        Self {
            key,
            code,
            extras: BTreeMap::new(),
            mangle: Mangle::None,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of times `submit` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn with_extras(mut self, extras: BTreeMap<String, String>) -> Self {
        self.extras = extras;
        self
    }

    pub fn with_mangle(mut self, mangle: Mangle) -> Self {
        self.mangle = mangle;
        self
    }
}

#[async_trait]
impl Transport for SigningTransport {
    async fn submit(&self, request: &CheckRequest) -> ClientResult<String> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let nonce = match self.mangle {
            Mangle::Nonce => request.nonce.wrapping_add(1),
            _ => request.nonce,
        };
        let app_id = match self.mangle {
            Mangle::AppId => "com.other.app".to_string(),
            _ => request.app_id.clone(),
        };
        let payload = payload_json(self.code, nonce, &app_id, &self.extras);

        if self.mangle == Mangle::Signature {
            let wrong_key = SigningKey::from_bytes(&[0x55; 32]);
            return Ok(sign_response(&wrong_key, &payload));
        }
        Ok(sign_response(&self.key, &payload))
    }
}

/// A transport that always fails to reach the server.
pub struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    async fn submit(&self, _request: &CheckRequest) -> ClientResult<String> {
        Err(ClientError::Transport("connection refused".to_string()))
    }
}

/// A transport that must never be reached (cache-hit tests).
pub struct UnreachableTransport;

#[async_trait]
impl Transport for UnreachableTransport {
    async fn submit(&self, _request: &CheckRequest) -> ClientResult<String> {
        panic!("transport must not be consulted");
    }
}

/// A transport that stalls until released, then fails.
pub struct StallingTransport {
    pub release: Arc<tokio::sync::Notify>,
}

impl StallingTransport {
    pub fn new() -> (Self, Arc<tokio::sync::Notify>) {
        let release = Arc::new(tokio::sync::Notify::new());
        (
            Self {
                release: Arc::clone(&release),
            },
            release,
        )
    }
}

#[async_trait]
impl Transport for StallingTransport {
    async fn submit(&self, _request: &CheckRequest) -> ClientResult<String> {
        self.release.notified().await;
        Err(ClientError::Transport("released".to_string()))
    }
}

/// A callback that forwards each invocation to a channel as a
/// [`GrantDecision`].
pub struct ChannelCallback {
    tx: mpsc::UnboundedSender<GrantDecision>,
}

impl ChannelCallback {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<GrantDecision>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl LicenseCheckerCallback for ChannelCallback {
    fn allow(&self, reason: GrantReason) {
        let _ = self.tx.send(GrantDecision::Allowed { reason });
    }

    fn dont_allow(&self, reason: DenialReason) {
        let _ = self.tx.send(GrantDecision::Denied { reason });
    }

    fn application_error(&self, code: ErrorCode) {
        let _ = self.tx.send(GrantDecision::ApplicationError { code });
    }
}
