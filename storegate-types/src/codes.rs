//! Numeric codes exchanged with the licensing server and reported to
//! integrators.
//!
//! `ResponseCode` is the verdict field of a signed server response.
//! `ErrorCode` classifies setup mistakes on the integrating app's side;
//! these are surfaced verbatim to the developer, never retried.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The verdict carried by a signed licensing server response.
///
/// Codes at or above `0x100` indicate the check itself could not be
/// completed, as opposed to a definitive licensed/unlicensed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ResponseCode {
    /// The install is licensed.
    Licensed,
    /// The install is not licensed.
    NotLicensed,
    /// Licensed, but the signing key has been rotated since purchase.
    LicensedOldKey,
    /// The app is not managed by the marketplace (e.g. sideloaded build).
    NotManaged,
    /// The server failed to process the request.
    ServerFailure,
    /// The server is over its request quota.
    OverQuota,
    /// The client could not reach the server at all.
    ErrorContactingServer,
    /// The request named an app id the server does not know.
    ErrorInvalidPackageName,
    /// The requesting account does not match the purchasing account.
    ErrorNonMatchingAccount,
    /// The companion store app is not installed on this device.
    ErrorNotInstalled,
    /// The installed companion store app is too old to answer checks.
    ErrorNotSupported,
}

impl ResponseCode {
    /// Returns the wire encoding of this code.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Licensed => 0x0,
            Self::NotLicensed => 0x1,
            Self::LicensedOldKey => 0x2,
            Self::NotManaged => 0x3,
            Self::ServerFailure => 0x4,
            Self::OverQuota => 0x5,
            Self::ErrorContactingServer => 0x101,
            Self::ErrorInvalidPackageName => 0x102,
            Self::ErrorNonMatchingAccount => 0x103,
            Self::ErrorNotInstalled => 0x104,
            Self::ErrorNotSupported => 0x105,
        }
    }

    /// Returns true if this code is a definitive grant.
    #[must_use]
    pub fn is_licensed(self) -> bool {
        matches!(self, Self::Licensed | Self::LicensedOldKey)
    }

    /// Returns true if this code reflects a transient condition that a
    /// later check may resolve.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::ServerFailure | Self::OverQuota | Self::ErrorContactingServer
        )
    }
}

impl TryFrom<i32> for ResponseCode {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Error> {
        match code {
            0x0 => Ok(Self::Licensed),
            0x1 => Ok(Self::NotLicensed),
            0x2 => Ok(Self::LicensedOldKey),
            0x3 => Ok(Self::NotManaged),
            0x4 => Ok(Self::ServerFailure),
            0x5 => Ok(Self::OverQuota),
            0x101 => Ok(Self::ErrorContactingServer),
            0x102 => Ok(Self::ErrorInvalidPackageName),
            0x103 => Ok(Self::ErrorNonMatchingAccount),
            0x104 => Ok(Self::ErrorNotInstalled),
            0x105 => Ok(Self::ErrorNotSupported),
            other => Err(Error::UnknownResponseCode(other)),
        }
    }
}

impl From<ResponseCode> for i32 {
    fn from(code: ResponseCode) -> i32 {
        code.code()
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Licensed => "licensed",
            Self::NotLicensed => "not licensed",
            Self::LicensedOldKey => "licensed (old key)",
            Self::NotManaged => "not managed",
            Self::ServerFailure => "server failure",
            Self::OverQuota => "over quota",
            Self::ErrorContactingServer => "error contacting server",
            Self::ErrorInvalidPackageName => "invalid package name",
            Self::ErrorNonMatchingAccount => "non-matching account",
            Self::ErrorNotInstalled => "store not installed",
            Self::ErrorNotSupported => "store not supported",
        };
        write!(f, "{name}")
    }
}

/// A setup/integration defect on the caller's side.
///
/// These indicate a developer mistake (bad key, wrong app id, overlapping
/// checks), not a licensing verdict. They are reported with their numeric
/// value so the integrator can look them up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ErrorCode {
    /// The configured app id is empty or malformed.
    InvalidPackageName,
    /// The check was issued for an account that does not own the app.
    NonMatchingAccount,
    /// The app is not managed by the marketplace.
    NotManaged,
    /// A check was started while another was still outstanding.
    CheckInProgress,
    /// The configured verification key does not parse.
    InvalidPublicKey,
    /// The host environment denies the client the access it needs.
    MissingPermission,
}

impl ErrorCode {
    /// Returns the numeric encoding of this code.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::InvalidPackageName => 1,
            Self::NonMatchingAccount => 2,
            Self::NotManaged => 3,
            Self::CheckInProgress => 4,
            Self::InvalidPublicKey => 5,
            Self::MissingPermission => 6,
        }
    }
}

impl TryFrom<i32> for ErrorCode {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Error> {
        match code {
            1 => Ok(Self::InvalidPackageName),
            2 => Ok(Self::NonMatchingAccount),
            3 => Ok(Self::NotManaged),
            4 => Ok(Self::CheckInProgress),
            5 => Ok(Self::InvalidPublicKey),
            6 => Ok(Self::MissingPermission),
            other => Err(Error::UnknownErrorCode(other)),
        }
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> i32 {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidPackageName => "invalid package name",
            Self::NonMatchingAccount => "non-matching account",
            Self::NotManaged => "not managed by marketplace",
            Self::CheckInProgress => "check already in progress",
            Self::InvalidPublicKey => "invalid public key",
            Self::MissingPermission => "missing permission",
        };
        write!(f, "{name}")
    }
}
