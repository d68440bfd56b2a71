//! Shared test helpers for controller tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use storegate_client::{AccessVerifier, LicenseCheckerCallback};
use storegate_controller::{
    Controller, ControllerConfig, DialogSpec, DispatchHandle, Dispatcher, ExternalFlows,
    StatusView,
};

/// A display surface that records every mutation in order.
#[derive(Default)]
pub struct RecordingView {
    pub statuses: Vec<String>,
    pub busy: Vec<bool>,
    pub enabled: Vec<bool>,
    pub dialogs: Vec<DialogSpec>,
}

impl RecordingView {
    pub fn mutation_count(&self) -> usize {
        self.statuses.len() + self.busy.len() + self.enabled.len() + self.dialogs.len()
    }
}

impl StatusView for RecordingView {
    fn set_status(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy.push(busy);
    }

    fn set_check_enabled(&mut self, enabled: bool) {
        self.enabled.push(enabled);
    }

    fn show_dialog(&mut self, dialog: DialogSpec) {
        self.dialogs.push(dialog);
    }
}

/// An external-flow event as recorded by [`RecordingFlows`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    Install(String),
    Update(String),
    Acquire(String),
    Quit,
}

/// Recovery flows that record what was opened.
#[derive(Default)]
pub struct RecordingFlows {
    pub events: Mutex<Vec<FlowEvent>>,
}

impl RecordingFlows {
    pub fn events(&self) -> Vec<FlowEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ExternalFlows for RecordingFlows {
    fn open_install_flow(&self, target: &str) {
        self.events
            .lock()
            .unwrap()
            .push(FlowEvent::Install(target.to_string()));
    }

    fn open_update_flow(&self, target: &str) {
        self.events
            .lock()
            .unwrap()
            .push(FlowEvent::Update(target.to_string()));
    }

    fn open_acquisition_flow(&self, target: &str) {
        self.events
            .lock()
            .unwrap()
            .push(FlowEvent::Acquire(target.to_string()));
    }

    fn quit(&self) {
        self.events.lock().unwrap().push(FlowEvent::Quit);
    }
}

/// A verifier that captures callbacks for the test to settle by hand.
#[derive(Default)]
pub struct ManualVerifier {
    pub callbacks: Mutex<Vec<Arc<dyn LicenseCheckerCallback>>>,
}

impl ManualVerifier {
    pub fn call_count(&self) -> usize {
        self.callbacks.lock().unwrap().len()
    }

    /// Returns the callback of the `index`-th check.
    pub fn callback(&self, index: usize) -> Arc<dyn LicenseCheckerCallback> {
        Arc::clone(&self.callbacks.lock().unwrap()[index])
    }
}

impl AccessVerifier for ManualVerifier {
    fn check_access(&self, callback: Arc<dyn LicenseCheckerCallback>) {
        self.callbacks.lock().unwrap().push(callback);
    }
}

/// A fully wired controller over recording fakes.
pub struct Harness {
    pub controller: Controller<RecordingView>,
    pub dispatcher: Dispatcher,
    pub view: Arc<Mutex<RecordingView>>,
    pub flows: Arc<RecordingFlows>,
    pub verifier: Arc<ManualVerifier>,
}

impl Harness {
    pub fn new() -> Self {
        let (dispatcher, ui) = Dispatcher::new();
        Self::with_ui(dispatcher, ui)
    }

    pub fn with_ui(dispatcher: Dispatcher, ui: DispatchHandle) -> Self {
        let view = Arc::new(Mutex::new(RecordingView::default()));
        let flows = Arc::new(RecordingFlows::default());
        let verifier = Arc::new(ManualVerifier::default());
        let controller = Controller::new(
            ControllerConfig {
                app_id: "com.example.app".to_string(),
                store_app_id: "com.example.store".to_string(),
            },
            Arc::clone(&verifier) as _,
            Arc::clone(&view),
            Arc::clone(&flows) as _,
            ui,
        );
        Self {
            controller,
            dispatcher,
            view,
            flows,
            verifier,
        }
    }

    pub fn view(&self) -> std::sync::MutexGuard<'_, RecordingView> {
        self.view.lock().unwrap()
    }
}
