//! Settle-once cells for asynchronous host computations.
//!
//! Host operations that start work in the background hand back a [`Pending`]
//! wrapped in a `Value::Future` or `Value::Signal`. The worker settles it from
//! whatever thread it runs on; the interpreter blocks on it when the program
//! awaits. Nothing here schedules work: evaluation stays on one thread and an
//! `await` simply waits in place until the cell is settled.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::Value;

#[derive(Debug)]
enum PendingState {
    Running,
    Completed(Value),
    Faulted(String),
}

struct PendingInner {
    state: Mutex<PendingState>,
    settled: Condvar,
}

/// Handle to an asynchronous computation that settles exactly once.
#[derive(Clone)]
pub struct Pending(Arc<PendingInner>);

impl Pending {
    /// A computation still running.
    pub fn new() -> Self {
        Pending(Arc::new(PendingInner {
            state: Mutex::new(PendingState::Running),
            settled: Condvar::new(),
        }))
    }

    /// An already completed computation.
    pub fn completed(value: Value) -> Self {
        let pending = Self::new();
        pending.settle(PendingState::Completed(value));
        pending
    }

    /// Complete with `value`. Returns `false` if it was already settled.
    pub fn complete(&self, value: Value) -> bool {
        self.settle(PendingState::Completed(value))
    }

    /// Fail with `message`. Returns `false` if it was already settled.
    pub fn fault(&self, message: impl Into<String>) -> bool {
        self.settle(PendingState::Faulted(message.into()))
    }

    fn settle(&self, outcome: PendingState) -> bool {
        let mut state = self.0.state.lock();
        if !matches!(*state, PendingState::Running) {
            return false;
        }
        *state = outcome;
        self.0.settled.notify_all();
        true
    }

    pub fn is_settled(&self) -> bool {
        !matches!(*self.0.state.lock(), PendingState::Running)
    }

    /// Block until settled; returns the result or the fault message.
    pub fn wait(&self) -> Result<Value, String> {
        let mut state = self.0.state.lock();
        while matches!(*state, PendingState::Running) {
            self.0.settled.wait(&mut state);
        }
        match &*state {
            PendingState::Completed(value) => Ok(value.clone()),
            PendingState::Faulted(message) => Err(message.clone()),
            PendingState::Running => unreachable!("loop exits only once settled"),
        }
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Pending) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Pending {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pending").field(&*self.0.state.lock()).finish()
    }
}
