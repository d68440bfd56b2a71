//! Presentation controller for license checks.
//!
//! Sits between a display surface and the verification client:
//! - starts checks and refuses to overlap them (at most one outstanding
//!   session per controller)
//! - marshals callback results onto the display-owning thread through an
//!   explicit [`Dispatcher`] queue
//! - drops callbacks that arrive after [`Controller::teardown`], so a
//!   torn-down surface is never touched
//! - maps denial reasons to recovery dialogs (retry / install store /
//!   update store / purchase, always with a quit option)
//!
//! The controller never returns errors to its caller; every outcome of a
//! check becomes a status line or a dialog.

mod controller;
mod dispatch;
mod view;

pub use controller::{
    application_error_status, Controller, ControllerConfig, STATUS_ALLOWED, STATUS_CHECKING,
    STATUS_DENIED,
};
pub use dispatch::{DispatchHandle, Dispatcher};
pub use view::{DialogSpec, ExternalFlows, StatusView};
