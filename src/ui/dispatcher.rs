//! Channel-backed scheduler for the UI-owning thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::core::driver::{UiExecutor, UiJob};

/// Handle background work uses to reach the UI thread
#[derive(Clone)]
pub struct UiDispatcher {
    tx: mpsc::UnboundedSender<UiJob>,
    live: Arc<AtomicBool>,
}

/// Owned by the UI thread, which drains it between frames
pub struct UiLoop {
    rx: mpsc::UnboundedReceiver<UiJob>,
    live: Arc<AtomicBool>,
}

/// Create a connected dispatcher/loop pair. The thread holding the `UiLoop`
/// is the UI thread until it drops it.
pub fn ui_channel() -> (UiDispatcher, UiLoop) {
    let (tx, rx) = mpsc::unbounded_channel();
    let live = Arc::new(AtomicBool::new(true));

    (
        UiDispatcher {
            tx,
            live: Arc::clone(&live),
        },
        UiLoop { rx, live },
    )
}

impl UiExecutor for UiDispatcher {
    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst) && !self.tx.is_closed()
    }

    fn submit(&self, job: UiJob) -> Result<(), UiJob> {
        self.tx.send(job).map_err(|e| e.0)
    }
}

impl UiLoop {
    /// Run every job queued so far; returns how many ran
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }
}

impl Drop for UiLoop {
    fn drop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
    }
}

/// Executor for sessions without a UI thread; jobs run on the caller
#[derive(Debug, Default, Clone, Copy)]
pub struct NoUiThread;

impl UiExecutor for NoUiThread {
    fn is_live(&self) -> bool {
        false
    }

    fn submit(&self, job: UiJob) -> Result<(), UiJob> {
        Err(job)
    }
}
