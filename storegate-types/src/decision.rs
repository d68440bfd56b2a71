//! The tagged outcome of a single license check.

use crate::{DenialReason, ErrorCode};
use serde::{Deserialize, Serialize};

/// Why access was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", from = "i32")]
pub enum GrantReason {
    /// A verified server response (fresh or cached within its validity
    /// window) confirmed the license.
    Licensed,
    /// The server could not be consulted; access is allowed provisionally
    /// inside the retry window rather than locking out a paying user.
    Provisional,
}

impl GrantReason {
    /// Returns the numeric encoding of this reason.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Licensed => 0x0,
            Self::Provisional => 0x100,
        }
    }
}

impl From<i32> for GrantReason {
    fn from(code: i32) -> Self {
        // Anything other than a definitive grant is a provisional one.
        if code == 0x0 {
            Self::Licensed
        } else {
            Self::Provisional
        }
    }
}

impl From<GrantReason> for i32 {
    fn from(reason: GrantReason) -> i32 {
        reason.code()
    }
}

/// The outcome of one license check.
///
/// The value form of the three-way callback: each checker callback
/// invocation corresponds to exactly one variant. Hosts that want a check
/// result as data (channels, logs, test assertions) build this instead of
/// implementing the callback trait piecemeal. The controller consumes it
/// as display state; it is never persisted (caching, if any, is the
/// policy's concern).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GrantDecision {
    /// Access is granted.
    Allowed {
        /// Why access was granted.
        reason: GrantReason,
    },
    /// Access is denied; the reason selects the recovery action.
    Denied {
        /// Why access was denied.
        reason: DenialReason,
    },
    /// The check could not run because the integration is misconfigured.
    ApplicationError {
        /// The setup defect, reported verbatim to the developer.
        code: ErrorCode,
    },
}

impl GrantDecision {
    /// Returns true if this decision grants access.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the denial reason, if this decision is a denial.
    #[must_use]
    pub fn denial_reason(&self) -> Option<DenialReason> {
        match self {
            Self::Denied { reason } => Some(*reason),
            _ => None,
        }
    }
}
