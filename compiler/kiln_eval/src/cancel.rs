//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Request that a session stop at the next statement boundary.
///
/// Clones share one flag; any thread may cancel. The running session then
/// fails with `Cancelled`, unwinding every frame it entered. A request made
/// while no run is in progress applies to the next run; `Session::run`
/// clears the flag when it returns.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear a previous request.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}
