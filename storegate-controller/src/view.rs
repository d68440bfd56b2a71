//! Display and recovery seams.
//!
//! The controller mutates the display only through [`StatusView`] and
//! triggers outward effects only through [`ExternalFlows`]; both are
//! opaque to it. What "open the install flow" actually does (a deep link,
//! a browser, a store client) is the host's business.

use storegate_types::{DenialReason, RecoveryAction};

/// The display surface the controller drives.
///
/// All methods are invoked on the display-owning thread (directly from
/// [`Controller::start_check`], or from a dispatcher drain for callback
/// results).
///
/// [`Controller::start_check`]: crate::Controller::start_check
pub trait StatusView: Send + 'static {
    /// Replaces the status line.
    fn set_status(&mut self, text: &str);

    /// Shows or hides the indeterminate-progress indication.
    fn set_busy(&mut self, busy: bool);

    /// Enables or disables the control that triggers a check.
    fn set_check_enabled(&mut self, enabled: bool);

    /// Presents a recovery dialog. The host reports the user's choice
    /// back through [`Controller::on_dialog_action`] or
    /// [`Controller::on_dialog_quit`].
    ///
    /// [`Controller::on_dialog_action`]: crate::Controller::on_dialog_action
    /// [`Controller::on_dialog_quit`]: crate::Controller::on_dialog_quit
    fn show_dialog(&mut self, dialog: DialogSpec);
}

/// Outward recovery effects, keyed by symbolic target.
pub trait ExternalFlows: Send + Sync {
    /// Opens the install flow for the companion store app.
    fn open_install_flow(&self, target: &str);

    /// Opens the update flow for the companion store app.
    fn open_update_flow(&self, target: &str);

    /// Opens the acquisition flow for this app.
    fn open_acquisition_flow(&self, target: &str);

    /// Terminates the host surface.
    fn quit(&self);
}

/// A recovery dialog: body text, one primary action, and an implicit quit
/// secondary action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSpec {
    /// Dialog title.
    pub title: String,
    /// Body text explaining the denial.
    pub body: String,
    /// The primary action.
    pub action: RecoveryAction,
    /// Label for the primary action button.
    pub action_label: String,
}

impl DialogSpec {
    /// Selects the dialog for a denial reason per the static recovery
    /// table.
    #[must_use]
    pub fn for_reason(reason: DenialReason) -> Self {
        let action = reason.recovery_action();
        let (body, action_label) = match action {
            RecoveryAction::Retry => (
                "The license could not be verified right now. Check your \
                 connection and retry.",
                "Retry",
            ),
            RecoveryAction::InstallStore => (
                "Verifying the license requires the companion store app, \
                 which is not installed.",
                "Install store app",
            ),
            RecoveryAction::UpdateStore => (
                "The installed companion store app is too old to verify \
                 the license.",
                "Update store app",
            ),
            RecoveryAction::Purchase => (
                "This application is not licensed. Acquire it from the \
                 marketplace.",
                "Buy app",
            ),
        };
        Self {
            title: "Application not licensed".to_string(),
            body: body.to_string(),
            action,
            action_label: action_label.to_string(),
        }
    }
}
