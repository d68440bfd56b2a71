//! Server-provided response extras.
//!
//! Licensed responses carry windows the policy honors:
//! - `VT`: validity timestamp — the grant holds until this instant
//! - `GT`: retry-until timestamp — provisional access holds until this
//!   instant while the server is unreachable
//! - `GR`: maximum retry count — provisional access holds for this many
//!   failed checks even past `GT`
//!
//! Unknown keys and unparsable values are ignored; the policy falls back
//! to its defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parsed extras from a server response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseExtras {
    /// `VT`: grant validity timestamp (seconds since epoch).
    pub validity_until: Option<i64>,
    /// `GT`: retry-until timestamp (seconds since epoch).
    pub retry_until: Option<i64>,
    /// `GR`: maximum retry count.
    pub max_retries: Option<u32>,
}

impl ResponseExtras {
    /// Parses extras from the raw key-value map of a response payload.
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self {
            validity_until: map.get("VT").and_then(|v| v.parse().ok()),
            retry_until: map.get("GT").and_then(|v| v.parse().ok()),
            max_retries: map.get("GR").and_then(|v| v.parse().ok()),
        }
    }

    /// Sets the validity timestamp.
    #[must_use]
    pub fn with_validity_until(mut self, ts: i64) -> Self {
        self.validity_until = Some(ts);
        self
    }

    /// Sets the retry-until timestamp.
    #[must_use]
    pub fn with_retry_until(mut self, ts: i64) -> Self {
        self.retry_until = Some(ts);
        self
    }

    /// Sets the maximum retry count.
    #[must_use]
    pub fn with_max_retries(mut self, count: u32) -> Self {
        self.max_retries = Some(count);
        self
    }
}
