//! Denial reasons and their recovery actions.
//!
//! When a check denies access, the reason classifies what the user can do
//! about it. The reason → recovery mapping is a static total table: every
//! reason, including codes this build has never heard of, resolves to
//! exactly one recovery action.

use crate::ResponseCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", from = "i32")]
pub enum DenialReason {
    /// A transient condition (server unreachable, over quota). A later
    /// check may succeed.
    Retry,
    /// The install is definitively not entitled.
    NotLicensed,
    /// The companion store app is missing from this device.
    StoreNotInstalled,
    /// The installed companion store app is too old.
    StoreNotSupported,
    /// A code newer than this build. Treated as not entitled.
    Unknown(i32),
}

impl DenialReason {
    /// Returns the numeric encoding of this reason.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Retry => 0x100,
            Self::NotLicensed => 0x101,
            Self::StoreNotInstalled => 0x102,
            Self::StoreNotSupported => 0x103,
            Self::Unknown(code) => code,
        }
    }

    /// Returns the recovery action to offer for this reason.
    ///
    /// The table is total: unrecognized reasons fall back to the
    /// acquisition flow, the same as a plain "not entitled" denial.
    #[must_use]
    pub fn recovery_action(self) -> RecoveryAction {
        match self {
            Self::Retry => RecoveryAction::Retry,
            Self::StoreNotInstalled => RecoveryAction::InstallStore,
            Self::StoreNotSupported => RecoveryAction::UpdateStore,
            Self::NotLicensed | Self::Unknown(_) => RecoveryAction::Purchase,
        }
    }

    /// Returns true if a later check may resolve this denial without any
    /// user action.
    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Retry)
    }

    /// Derives the denial reason from a server response code.
    ///
    /// Only meaningful for non-licensed codes; a `Licensed` code maps to
    /// `NotLicensed` here because a grant should never reach this path.
    #[must_use]
    pub fn from_response(code: ResponseCode) -> Self {
        match code {
            ResponseCode::ErrorNotInstalled => Self::StoreNotInstalled,
            ResponseCode::ErrorNotSupported => Self::StoreNotSupported,
            c if c.is_retryable() => Self::Retry,
            _ => Self::NotLicensed,
        }
    }
}

impl From<i32> for DenialReason {
    fn from(code: i32) -> Self {
        match code {
            0x100 => Self::Retry,
            0x101 => Self::NotLicensed,
            0x102 => Self::StoreNotInstalled,
            0x103 => Self::StoreNotSupported,
            other => Self::Unknown(other),
        }
    }
}

impl From<DenialReason> for i32 {
    fn from(reason: DenialReason) -> i32 {
        reason.code()
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retry => write!(f, "retryable"),
            Self::NotLicensed => write!(f, "not licensed"),
            Self::StoreNotInstalled => write!(f, "store not installed"),
            Self::StoreNotSupported => write!(f, "store not supported"),
            Self::Unknown(code) => write!(f, "unknown ({code})"),
        }
    }
}

/// The user-facing action offered to recover from a denial.
///
/// Every recovery dialog also carries a secondary quit action; that is a
/// property of the dialog, not of the reason, so it is not encoded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    /// Run the license check again.
    Retry,
    /// Open the install flow for the companion store app.
    InstallStore,
    /// Open the update flow for the companion store app.
    UpdateStore,
    /// Open the acquisition flow for this app.
    Purchase,
}
