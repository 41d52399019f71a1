use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Asks a running consumer to stop at the next poll boundary
///
/// Cloneable and thread-safe; hand a clone to whatever reacts to the
/// interrupt. The consumer never stops mid-acknowledgment, it finishes
/// settling the delivery in hand and exits before the next blocking wait.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> StopHandle {
        StopHandle::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
