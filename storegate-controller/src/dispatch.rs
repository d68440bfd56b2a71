//! Post-to-queue hand-off onto the display-owning thread.
//!
//! Callbacks arrive on arbitrary threads; display state belongs to one.
//! Work is posted from anywhere through a [`DispatchHandle`] and runs only
//! when the owning thread drains the [`Dispatcher`], in FIFO order.

use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::trace;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// The draining end of the queue, owned by the display thread.
pub struct Dispatcher {
    rx: Receiver<Task>,
}

/// The posting end of the queue. Cheap to clone, usable from any thread.
#[derive(Clone)]
pub struct DispatchHandle {
    tx: Sender<Task>,
}

impl Dispatcher {
    /// Creates a queue, returning the draining end and a posting handle.
    #[must_use]
    pub fn new() -> (Self, DispatchHandle) {
        let (tx, rx) = channel();
        (Self { rx }, DispatchHandle { tx })
    }

    /// Runs every task currently queued, in posting order. Returns how
    /// many ran.
    pub fn drain(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        if ran > 0 {
            trace!(ran, "drained dispatch queue");
        }
        ran
    }

    /// Runs tasks as they arrive, blocking the calling thread until every
    /// [`DispatchHandle`] has been dropped. For hosts whose display thread
    /// has no event loop of its own.
    pub fn run(self) {
        while let Ok(task) = self.rx.recv() {
            task();
        }
        trace!("dispatch queue closed");
    }
}

impl DispatchHandle {
    /// Posts a task to run on the next drain. Returns false if the
    /// draining end is gone.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) -> bool {
        self.tx.send(Box::new(task)).is_ok()
    }
}
