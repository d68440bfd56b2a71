//! The presentation controller.

use crate::dispatch::DispatchHandle;
use crate::view::{DialogSpec, ExternalFlows, StatusView};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use storegate_client::{AccessVerifier, LicenseCheckerCallback};
use storegate_types::{DenialReason, ErrorCode, GrantReason, RecoveryAction};
use tracing::{debug, info};

/// Status line while a check is outstanding.
pub const STATUS_CHECKING: &str = "Checking license...";

/// Status line after a granted check.
pub const STATUS_ALLOWED: &str = "License check passed: access granted.";

/// Status line after a denied check.
pub const STATUS_DENIED: &str = "License check failed: access denied.";

/// Status line for a setup defect, embedding the literal numeric code.
#[must_use]
pub fn application_error_status(code: ErrorCode) -> String {
    format!("Application error {}: {}.", code.code(), code)
}

/// Controller configuration: the symbolic targets for recovery flows.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// This app's marketplace identifier (acquisition flow target).
    pub app_id: String,
    /// The companion store app's identifier (install/update flow target).
    pub store_app_id: String,
}

/// One outstanding check, identified by its generation.
struct Session {
    generation: u64,
    outstanding: bool,
}

struct Inner<V: StatusView> {
    config: ControllerConfig,
    verifier: Arc<dyn AccessVerifier>,
    view: Arc<Mutex<V>>,
    flows: Arc<dyn ExternalFlows>,
    ui: DispatchHandle,
    torn_down: AtomicBool,
    session: Mutex<Session>,
}

/// Drives a display surface through license checks.
///
/// Cloning yields another handle to the same controller.
pub struct Controller<V: StatusView> {
    inner: Arc<Inner<V>>,
}

impl<V: StatusView> Clone for Controller<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: StatusView> Controller<V> {
    /// Creates a controller over a verifier, a display surface, and the
    /// host's recovery flows. `ui` must be drained on the display-owning
    /// thread.
    #[must_use]
    pub fn new(
        config: ControllerConfig,
        verifier: Arc<dyn AccessVerifier>,
        view: Arc<Mutex<V>>,
        flows: Arc<dyn ExternalFlows>,
        ui: DispatchHandle,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                verifier,
                view,
                flows,
                ui,
                torn_down: AtomicBool::new(false),
                session: Mutex::new(Session {
                    generation: 0,
                    outstanding: false,
                }),
            }),
        }
    }

    /// Starts a license check. Call on the display-owning thread.
    ///
    /// A no-op while a prior check is outstanding or after teardown; two
    /// checks never overlap from one controller.
    pub fn start_check(&self) {
        let inner = &self.inner;
        if inner.torn_down.load(Ordering::SeqCst) {
            debug!("start_check after teardown ignored");
            return;
        }

        let generation = {
            let mut session = lock(&inner.session);
            if session.outstanding {
                debug!("check already outstanding, ignoring trigger");
                return;
            }
            session.generation += 1;
            session.outstanding = true;
            session.generation
        };

        debug!(generation, "starting license check");
        {
            let mut view = lock(&inner.view);
            view.set_check_enabled(false);
            view.set_busy(true);
            view.set_status(STATUS_CHECKING);
        }

        let callback = Arc::new(SessionCallback {
            inner: Arc::clone(inner),
            generation,
        });
        inner.verifier.check_access(callback);
    }

    /// Returns true if a check is currently outstanding.
    #[must_use]
    pub fn is_check_outstanding(&self) -> bool {
        lock(&self.inner.session).outstanding
    }

    /// Handles the primary action of a recovery dialog.
    pub fn on_dialog_action(&self, action: RecoveryAction) {
        let inner = &self.inner;
        match action {
            RecoveryAction::Retry => self.start_check(),
            RecoveryAction::InstallStore => {
                inner.flows.open_install_flow(&inner.config.store_app_id);
            }
            RecoveryAction::UpdateStore => {
                inner.flows.open_update_flow(&inner.config.store_app_id);
            }
            RecoveryAction::Purchase => {
                inner.flows.open_acquisition_flow(&inner.config.app_id);
            }
        }
    }

    /// Handles the quit action, present on every recovery dialog.
    pub fn on_dialog_quit(&self) {
        self.inner.flows.quit();
    }

    /// Tears the controller down: the outstanding session (if any) is
    /// abandoned and every later callback is dropped without touching the
    /// display.
    pub fn teardown(&self) {
        self.inner.torn_down.store(true, Ordering::SeqCst);
        lock(&self.inner.session).outstanding = false;
        info!("controller torn down");
    }
}

impl<V: StatusView> Inner<V> {
    /// Settles the session for `generation` and posts its display work.
    /// Stale callbacks (torn down, superseded, or already settled) are
    /// dropped here.
    fn finish(self: &Arc<Self>, generation: u64, completion: Completion) {
        if self.torn_down.load(Ordering::SeqCst) {
            debug!(generation, "callback after teardown dropped");
            return;
        }
        {
            let mut session = lock(&self.session);
            if !session.outstanding || session.generation != generation {
                debug!(generation, "stale callback dropped");
                return;
            }
            session.outstanding = false;
        }

        let inner = Arc::clone(self);
        self.ui.post(move || {
            // Teardown may have happened between the callback and this
            // drain; the display must not be touched in that case.
            if inner.torn_down.load(Ordering::SeqCst) {
                debug!(generation, "queued display update dropped after teardown");
                return;
            }
            let mut view = lock(&inner.view);
            view.set_busy(false);
            match completion {
                Completion::Allowed(reason) => {
                    debug!(?reason, "access granted");
                    view.set_status(STATUS_ALLOWED);
                }
                Completion::Denied(reason) => {
                    debug!(%reason, "access denied");
                    view.set_status(STATUS_DENIED);
                    view.show_dialog(DialogSpec::for_reason(reason));
                }
                Completion::Errored(code) => {
                    debug!(%code, "application error");
                    view.set_status(&application_error_status(code));
                }
            }
            view.set_check_enabled(true);
        });
    }
}

/// What a finished check reported.
enum Completion {
    Allowed(GrantReason),
    Denied(DenialReason),
    Errored(ErrorCode),
}

/// Callback bound to one session generation.
struct SessionCallback<V: StatusView> {
    inner: Arc<Inner<V>>,
    generation: u64,
}

impl<V: StatusView> LicenseCheckerCallback for SessionCallback<V> {
    fn allow(&self, reason: GrantReason) {
        self.inner.finish(self.generation, Completion::Allowed(reason));
    }

    fn dont_allow(&self, reason: DenialReason) {
        self.inner.finish(self.generation, Completion::Denied(reason));
    }

    fn application_error(&self, code: ErrorCode) {
        self.inner.finish(self.generation, Completion::Errored(code));
    }
}

/// Locks a mutex, recovering the guard from a poisoned lock. Display
/// state stays consistent because every mutation is a single setter call.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
