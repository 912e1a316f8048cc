//! Cooperative cancellation via an `AtomicBool` flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cancellation flag shared between a caller and the searches it started.
///
/// A child token reports cancelled when it or any ancestor is cancelled;
/// cancelling a child leaves the parent untouched.
///
/// # Example
///
/// ```
/// use raptor_router::search::CancelToken;
///
/// let request = CancelToken::new();
/// let task = request.child();
///
/// task.cancel();
/// assert!(task.is_cancelled());
/// assert!(!request.is_cancelled());
///
/// request.cancel();
/// assert!(request.child().is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    parent: Option<Box<CancelToken>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token cancelled together with `self`, but cancellable on its own.
    pub fn child(&self) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            parent: Some(Box::new(self.clone())),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst) || self.parent.as_ref().is_some_and(|p| p.is_cancelled())
    }
}
