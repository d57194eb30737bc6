//! Live call stack of interpreted methods.
//!
//! Every in-program call pushes the display name of the method it entered;
//! the depth check is integrated into `push()`. When an error unwinds, the
//! stack is captured into an [`EvalBacktrace`] attached to the error.

use crate::errors::{recursion_limit_exceeded, EvalBacktrace, EvalError};

/// Methods currently executing, outermost first.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<String>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `max_depth` is `None` for unlimited.
    pub fn new(max_depth: Option<usize>) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, checking the depth limit.
    ///
    /// The frame is NOT pushed on overflow.
    pub fn push(&mut self, method: String) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(method);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "CallStack::pop() on empty stack");
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Snapshot of the stack, most recent call first.
    pub fn capture(&self) -> EvalBacktrace {
        EvalBacktrace::new(self.frames.iter().rev().cloned().collect())
    }

    /// Attach the current backtrace to `err` (no-op when nothing is running).
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        if self.frames.is_empty() {
            return err;
        }
        err.with_backtrace(self.capture())
    }
}

impl Default for CallStack {
    /// Unlimited depth.
    fn default() -> Self {
        Self::new(None)
    }
}
