//! RAII frame management for method calls.
//!
//! Entering a method pushes both a call-stack entry and a locals frame; the
//! guard pops both when dropped, including while an error or a panic
//! unwinds, so no partially bound locals survive a failed call.

use std::ops::{Deref, DerefMut};

use super::Session;
use crate::errors::EvalResult;

/// Guard holding `&mut Session` for the duration of one method activation.
///
/// Implements `Deref`/`DerefMut` so the session is used through it directly.
pub(crate) struct FrameGuard<'s> {
    session: &'s mut Session,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.session.frames.pop_frame();
        self.session.call_stack.pop();
    }
}

impl Deref for FrameGuard<'_> {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        self.session
    }
}

impl DerefMut for FrameGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session
    }
}

impl Session {
    /// Enter `method`: check the depth limit, then push a fresh frame.
    ///
    /// Nothing is pushed when the depth limit is exceeded.
    pub(crate) fn enter_frame(&mut self, method: String) -> EvalResult<FrameGuard<'_>> {
        self.call_stack
            .push(method)
            .map_err(|e| self.call_stack.attach_backtrace(e))?;
        self.frames.push_frame();
        Ok(FrameGuard { session: self })
    }
}
