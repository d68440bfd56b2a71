//! Strict no-cache policy.

use crate::error::PolicyResult;
use crate::extras::ResponseExtras;
use crate::Policy;
use storegate_types::{DenialReason, GrantReason, ResponseCode};

/// A policy that allows access only on a fresh `Licensed` response.
///
/// Nothing is persisted and no provisional access is granted; every run of
/// the app requires a successful round trip. Suited to apps where a missed
/// check is cheaper than a wrong grant.
#[derive(Debug, Default)]
pub struct StrictPolicy {
    last_response: Option<ResponseCode>,
}

impl StrictPolicy {
    /// Creates a strict policy with no recorded response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for StrictPolicy {
    fn process_server_response(
        &mut self,
        code: ResponseCode,
        _extras: &ResponseExtras,
    ) -> PolicyResult<()> {
        self.last_response = Some(code);
        Ok(())
    }

    fn allow_access(&self) -> Option<GrantReason> {
        match self.last_response {
            Some(code) if code.is_licensed() => Some(GrantReason::Licensed),
            _ => None,
        }
    }

    fn denial_reason(&self) -> DenialReason {
        match self.last_response {
            Some(code) => DenialReason::from_response(code),
            None => DenialReason::Retry,
        }
    }
}
