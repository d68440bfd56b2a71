//! The license checker: one call in, exactly one callback out.
//!
//! `check_access` resolves in this order:
//! 1. configuration problems → `application_error`, synchronously
//! 2. a policy cache hit → `allow`, synchronously, no network
//! 3. otherwise a transport round trip on a spawned task, whose verified
//!    (or failed) outcome is fed to the policy and reported through the
//!    callback
//!
//! Every path invokes exactly one callback method exactly once.

use crate::error::ClientError;
use crate::response::SignedResponse;
use crate::transport::{CheckRequest, Transport};
use ed25519_dalek::VerifyingKey;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use storegate_policy::{Policy, ResponseExtras};
use storegate_types::{DenialReason, ErrorCode, GrantReason, ResponseCode};
use tracing::{debug, warn};

/// Checker configuration.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// The app id to check (the marketplace package identifier).
    pub app_id: String,
    /// The installed app version.
    pub version: String,
    /// Opaque account identifier sent with the request.
    pub user_id: String,
    /// Ed25519 public key for response verification.
    pub public_key: [u8; 32],
}

/// The three-way completion boundary of a check.
///
/// The checker invokes exactly one of these methods exactly once per
/// check, possibly from a worker thread.
pub trait LicenseCheckerCallback: Send + Sync {
    /// Access is granted.
    fn allow(&self, reason: GrantReason);

    /// Access is denied; `reason` selects the recovery action.
    fn dont_allow(&self, reason: DenialReason);

    /// The check could not run due to a setup defect.
    fn application_error(&self, code: ErrorCode);
}

/// Anything that can run an asynchronous license check.
///
/// The presentation layer consumes this rather than the concrete checker
/// so tests can substitute a scripted verifier.
pub trait AccessVerifier: Send + Sync {
    /// Starts a check; exactly one callback method fires exactly once.
    fn check_access(&self, callback: Arc<dyn LicenseCheckerCallback>);
}

/// The license verification client.
pub struct LicenseChecker {
    config: CheckerConfig,
    policy: Arc<Mutex<Box<dyn Policy + Send>>>,
    transport: Arc<dyn Transport>,
    in_flight: Arc<AtomicBool>,
}

impl std::fmt::Debug for LicenseChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseChecker")
            .field("app_id", &self.config.app_id)
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish()
    }
}

impl LicenseChecker {
    /// Creates a checker over a policy and a transport.
    #[must_use]
    pub fn new(
        config: CheckerConfig,
        policy: Box<dyn Policy + Send>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config,
            policy: Arc::new(Mutex::new(policy)),
            transport,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns true if a check is currently outstanding.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Starts a license check. Must be called from within a tokio runtime.
    ///
    /// Exactly one of the callback's methods fires exactly once. Overlapping
    /// calls on the same checker are rejected with
    /// [`ErrorCode::CheckInProgress`].
    pub fn check_access(&self, callback: Arc<dyn LicenseCheckerCallback>) {
        if VerifyingKey::from_bytes(&self.config.public_key).is_err() {
            warn!("configured public key does not parse");
            callback.application_error(ErrorCode::InvalidPublicKey);
            return;
        }
        if self.config.app_id.is_empty() {
            warn!("configured app id is empty");
            callback.application_error(ErrorCode::InvalidPackageName);
            return;
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("check already in progress, rejecting");
            callback.application_error(ErrorCode::CheckInProgress);
            return;
        }

        // Cached decision first: inside its windows no round trip is needed.
        if let Some(reason) = lock_policy(&self.policy).allow_access() {
            debug!(?reason, "policy cache grants access");
            self.in_flight.store(false, Ordering::SeqCst);
            callback.allow(reason);
            return;
        }

        let nonce: u64 = rand::random();
        let request = CheckRequest {
            nonce,
            app_id: self.config.app_id.clone(),
            version: self.config.version.clone(),
            user_id: self.config.user_id.clone(),
        };
        let public_key = self.config.public_key;
        let transport = Arc::clone(&self.transport);
        let policy = Arc::clone(&self.policy);
        let in_flight = Arc::clone(&self.in_flight);

        debug!(nonce, app_id = %request.app_id, "starting server check");
        tokio::spawn(async move {
            let submitted = transport.submit(&request).await;
            let outcome = conclude(submitted, &public_key, &request, &policy);
            in_flight.store(false, Ordering::SeqCst);
            match outcome {
                Outcome::Allow(reason) => callback.allow(reason),
                Outcome::DontAllow(reason) => callback.dont_allow(reason),
                Outcome::ApplicationError(code) => callback.application_error(code),
            }
        });
    }
}

impl AccessVerifier for LicenseChecker {
    fn check_access(&self, callback: Arc<dyn LicenseCheckerCallback>) {
        LicenseChecker::check_access(self, callback);
    }
}

/// Which callback arm to fire.
enum Outcome {
    Allow(GrantReason),
    DontAllow(DenialReason),
    ApplicationError(ErrorCode),
}

/// Turns the transport result into a single callback outcome.
fn conclude(
    submitted: Result<String, ClientError>,
    public_key: &[u8; 32],
    request: &CheckRequest,
    policy: &Arc<Mutex<Box<dyn Policy + Send>>>,
) -> Outcome {
    let raw = match submitted {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "transport failed, treating as contact error");
            return settle(policy, ResponseCode::ErrorContactingServer, &ResponseExtras::default());
        }
    };

    let response = match SignedResponse::parse_with_key(&raw, public_key)
        .and_then(|r| r.validate_for(request.nonce, &request.app_id).map(|()| r))
    {
        Ok(response) => response,
        Err(e) => {
            // A response that fails verification must not grant or extend
            // access, and must not poison the cached state either.
            warn!(error = %e, "response failed verification");
            return Outcome::DontAllow(DenialReason::NotLicensed);
        }
    };

    let payload = response.payload();
    debug!(code = %payload.code, "verified server response");

    match payload.code {
        ResponseCode::ErrorInvalidPackageName => {
            Outcome::ApplicationError(ErrorCode::InvalidPackageName)
        }
        ResponseCode::ErrorNonMatchingAccount => {
            Outcome::ApplicationError(ErrorCode::NonMatchingAccount)
        }
        ResponseCode::NotManaged => Outcome::ApplicationError(ErrorCode::NotManaged),
        code => settle(policy, code, &ResponseExtras::from_map(&payload.extras)),
    }
}

/// Feeds a response to the policy and reads back the decision.
fn settle(
    policy: &Arc<Mutex<Box<dyn Policy + Send>>>,
    code: ResponseCode,
    extras: &ResponseExtras,
) -> Outcome {
    let mut policy = lock_policy(policy);
    if let Err(e) = policy.process_server_response(code, extras) {
        // The in-memory decision state is still updated; only the cache
        // write failed.
        warn!(error = %e, "failed to persist policy state");
    }
    match policy.allow_access() {
        Some(reason) => Outcome::Allow(reason),
        None => Outcome::DontAllow(policy.denial_reason()),
    }
}

/// Locks the policy. A poisoned lock still holds consistent state (the
/// policy never panics mid-update), so recover the guard.
fn lock_policy(
    policy: &Arc<Mutex<Box<dyn Policy + Send>>>,
) -> MutexGuard<'_, Box<dyn Policy + Send>> {
    match policy.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
