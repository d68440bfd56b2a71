//! License policy state machine.
//!
//! A policy turns verified server responses into access decisions. Two
//! implementations:
//!
//! - [`ServerManagedPolicy`]: honors server-provided validity and retry
//!   windows, persists its state through the obfuscated store, and allows
//!   provisionally while the server is unreachable. The recommended
//!   policy.
//! - [`StrictPolicy`]: no caching, no provisional grants. Access requires
//!   a fresh `Licensed` response every time.
//!
//! Policies never talk to the network; the client feeds them responses and
//! asks them for decisions.

mod error;
mod extras;
mod server_managed;
mod strict;

pub use error::{PolicyError, PolicyResult};
pub use extras::ResponseExtras;
pub use server_managed::{ServerManagedPolicy, DEFAULT_VALIDITY_SECS, RETRY_WINDOW_SECS};
pub use strict::StrictPolicy;

use storegate_types::{DenialReason, GrantReason, ResponseCode};

/// Decides access from server responses.
///
/// `process_server_response` is called once per verified response;
/// `allow_access` may be consulted any number of times between responses
/// (including before the first one, against cached state).
pub trait Policy {
    /// Records a verified server response and its extras.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the updated state fails. The
    /// in-memory decision state is updated regardless.
    fn process_server_response(
        &mut self,
        code: ResponseCode,
        extras: &ResponseExtras,
    ) -> PolicyResult<()>;

    /// Returns the grant reason if access is currently allowed, `None` if
    /// denied.
    fn allow_access(&self) -> Option<GrantReason>;

    /// Returns why access is denied. Only meaningful when `allow_access`
    /// returned `None`.
    fn denial_reason(&self) -> DenialReason;
}
