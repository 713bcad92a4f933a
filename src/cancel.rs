use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cooperative cancellation flag, checked by the batch drivers between
/// units of work (one site, one constraint). Cloning shares the flag, so a
/// controlling thread can hold one clone while the triangulating thread
/// consumes another.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The outcome of a batch insertion. Cancellation is a normal outcome, not an
/// error: the mesh is structurally valid, just incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRun {
    /// Units of work completed before the run ended.
    pub completed: usize,
    /// True when the run stopped because the flag was raised.
    pub cancelled: bool,
}
