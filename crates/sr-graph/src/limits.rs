//! Bounds on a single shortest-path search: wall-clock deadline and
//! cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use sr_core::NodeId;

use crate::GraphError;

/// Shared cancellation flag.  Cloning shares the same underlying flag.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Return a guard that cancels this flag when dropped.
    ///
    /// Hold it in a request future: if the future is dropped before the
    /// blocking search finishes, the search stops at its next checkpoint.
    pub fn guard(&self) -> CancelGuard {
        CancelGuard(self.clone())
    }
}

/// Cancels its [`CancelFlag`] on drop.  See [`CancelFlag::guard`].
#[derive(Debug)]
pub struct CancelGuard(CancelFlag);

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Limits applied to one search.
#[derive(Clone, Debug, Default)]
pub struct SearchLimits {
    pub deadline: Option<Instant>,
    pub cancel: CancelFlag,
}

impl SearchLimits {
    /// No deadline, never cancelled.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Deadline `timeout` from now (if any), observing `cancel`.
    pub fn new(timeout: Option<Duration>, cancel: CancelFlag) -> Self {
        Self {
            deadline: timeout.map(|t| Instant::now() + t),
            cancel,
        }
    }

    /// Checkpoint called periodically from the search loop.
    pub(crate) fn check(&self, from: NodeId, to: NodeId, started: Instant) -> Result<(), GraphError> {
        if self.cancel.is_cancelled() {
            return Err(GraphError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            let now = Instant::now();
            if now >= deadline {
                return Err(GraphError::Timeout { from, to, elapsed: now - started });
            }
        }
        Ok(())
    }
}
