//! Server-managed policy with obfuscated caching.
//!
//! The server steers this policy through response extras: how long a grant
//! stays valid without re-checking, and how generous to be when the server
//! cannot be reached. State survives restarts through the obfuscated
//! store, so a licensed app keeps working offline inside its validity
//! window.

use crate::error::PolicyResult;
use crate::extras::ResponseExtras;
use crate::Policy;
use serde::{Deserialize, Serialize};
use storegate_obfuscator::ObfuscatedStore;
use storegate_types::{DenialReason, GrantReason, ResponseCode};
use tracing::{debug, warn};

/// Store key for the persisted snapshot.
const SNAPSHOT_KEY: &str = "policy";

/// Default validity window when a licensed response carries no `VT`.
pub const DEFAULT_VALIDITY_SECS: i64 = 60;

/// Provisional access after a retryable response only holds this close to
/// the response itself; beyond it the denial stands until a new check.
pub const RETRY_WINDOW_SECS: i64 = 60;

/// Persisted decision state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PolicyState {
    /// The last server response code, if any check has completed.
    last_response: Option<ResponseCode>,
    /// When the last response was processed (seconds since epoch).
    last_response_at: i64,
    /// `VT`: the grant holds until this instant.
    validity_until: i64,
    /// `GT`: provisional access holds until this instant.
    retry_until: i64,
    /// `GR`: provisional access holds for this many failed checks.
    max_retries: u32,
    /// Consecutive retryable responses since the last conclusive one.
    retry_count: u32,
}

/// A policy that caches the last response inside server-provided windows.
#[derive(Debug)]
pub struct ServerManagedPolicy {
    store: ObfuscatedStore,
    state: PolicyState,
}

impl ServerManagedPolicy {
    /// Opens the policy over an obfuscated store, loading any persisted
    /// snapshot.
    ///
    /// A snapshot that fails validation (tampered file, cache copied from
    /// another device) is discarded and the policy starts fresh — the
    /// cached grant is lost, nothing more.
    #[must_use]
    pub fn open(store: ObfuscatedStore) -> Self {
        let state = match store.get(SNAPSHOT_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(e) => {
                    warn!(error = %e, "policy snapshot unreadable, starting fresh");
                    PolicyState::default()
                }
            },
            Ok(None) => PolicyState::default(),
            Err(e) => {
                warn!(error = %e, "policy snapshot failed validation, starting fresh");
                PolicyState::default()
            }
        };

        Self { store, state }
    }

    /// Records a response as of a given instant. The trait method calls
    /// this with the current time; tests pass explicit instants.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the snapshot fails; the in-memory
    /// state is updated regardless.
    pub fn process_server_response_at(
        &mut self,
        code: ResponseCode,
        extras: &ResponseExtras,
        now: i64,
    ) -> PolicyResult<()> {
        self.state.last_response = Some(code);
        self.state.last_response_at = now;

        if code.is_retryable() {
            // Transient failure: count it, keep the previous windows so a
            // still-valid grant is not thrown away.
            self.state.retry_count += 1;
        } else {
            self.state.retry_count = 0;
            if code.is_licensed() {
                self.state.validity_until = extras
                    .validity_until
                    .unwrap_or(now + DEFAULT_VALIDITY_SECS);
                self.state.retry_until = extras.retry_until.unwrap_or(0);
                self.state.max_retries = extras.max_retries.unwrap_or(0);
            } else {
                // Conclusive denial wipes the windows.
                self.state.validity_until = 0;
                self.state.retry_until = 0;
                self.state.max_retries = 0;
            }
        }

        debug!(
            code = %code,
            retry_count = self.state.retry_count,
            validity_until = self.state.validity_until,
            "processed server response"
        );

        self.save()
    }

    /// Evaluates access as of a given instant.
    #[must_use]
    pub fn allow_access_at(&self, now: i64) -> Option<GrantReason> {
        let code = self.state.last_response?;

        if code.is_licensed() {
            if now <= self.state.validity_until {
                return Some(GrantReason::Licensed);
            }
        } else if code.is_retryable() && now < self.state.last_response_at + RETRY_WINDOW_SECS {
            // Server trouble must not lock out a paying user: allow while
            // inside the retry window or under the retry budget.
            if now <= self.state.retry_until || self.state.retry_count <= self.state.max_retries
            {
                return Some(GrantReason::Provisional);
            }
        }

        None
    }

    /// Returns the retry count since the last conclusive response.
    #[must_use]
    pub fn retry_count(&self) -> u32 {
        self.state.retry_count
    }

    fn save(&mut self) -> PolicyResult<()> {
        let raw = serde_json::to_string(&self.state)?;
        self.store.put(SNAPSHOT_KEY, &raw)?;
        self.store.commit()?;
        Ok(())
    }
}

impl Policy for ServerManagedPolicy {
    fn process_server_response(
        &mut self,
        code: ResponseCode,
        extras: &ResponseExtras,
    ) -> PolicyResult<()> {
        self.process_server_response_at(code, extras, chrono::Utc::now().timestamp())
    }

    fn allow_access(&self) -> Option<GrantReason> {
        self.allow_access_at(chrono::Utc::now().timestamp())
    }

    fn denial_reason(&self) -> DenialReason {
        match self.state.last_response {
            // A lapsed grant is worth re-checking before demanding a
            // purchase.
            Some(code) if code.is_licensed() => DenialReason::Retry,
            Some(code) => DenialReason::from_response(code),
            None => DenialReason::NotLicensed,
        }
    }
}
