//! Call frames for method locals.
//!
//! Uses a frame stack (not cloning) for frame management. Unlike lexical
//! scopes, frames never chain: lookups see the innermost frame only, so a
//! callee cannot observe its caller's locals.

use rustc_hash::FxHashMap;

use kiln_ir::Name;

use crate::Value;

/// Locals of one method activation.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    /// Local bindings (`FxHashMap` for faster hashing with `Name` keys).
    locals: FxHashMap<Name, Value>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, overwriting any existing binding.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.locals.insert(name, value);
    }

    #[inline]
    pub fn lookup(&self, name: Name) -> Option<&Value> {
        self.locals.get(&name)
    }

    pub fn len(&self) -> usize {
        self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }
}

/// Stack of frames, innermost at the top.
///
/// The bottom frame belongs to the host context that started execution and is
/// never popped; it is where `Session::set_local` writes when no method is
/// running.
#[derive(Debug)]
pub struct CallFrames {
    frames: Vec<Frame>,
}

impl CallFrames {
    /// Frame stack holding only the root frame.
    pub fn new() -> Self {
        CallFrames {
            frames: vec![Frame::new()],
        }
    }

    /// Number of frames, root included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(Frame::new());
    }

    /// Pop the innermost frame. The root frame stays.
    #[inline]
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    #[inline]
    fn current_mut(&mut self) -> &mut Frame {
        if self.frames.is_empty() {
            self.frames.push(Frame::new());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Bind `name` in the innermost frame.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.current_mut().define(name, value);
    }

    /// Look up `name` in the innermost frame.
    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.frames.last().and_then(|f| f.lookup(name)).cloned()
    }
}

impl Default for CallFrames {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
