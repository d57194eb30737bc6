//! The operand stack, plus native stack growth for deep evaluation.
//!
//! Every expression leaves its result on the [`OperandStack`]; consumers pop
//! in strict LIFO order. Arguments are pushed left to right, so they come off
//! last-first and [`OperandStack::pop_n`] restores call order.

use smallvec::SmallVec;

use crate::errors::{stack_underflow, type_mismatch, EvalResult};
use crate::Value;

/// Arguments reassembled in call order.
pub type ArgList = SmallVec<[Value; 4]>;

/// Growable LIFO of values shared by every frame of one session.
#[derive(Debug, Default)]
pub struct OperandStack {
    values: Vec<Value>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        OperandStack {
            values: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    #[inline]
    pub fn pop(&mut self) -> EvalResult<Value> {
        self.values.pop().ok_or_else(stack_underflow)
    }

    /// Pop `count` values and return them in the order they were pushed.
    ///
    /// Nothing is popped when fewer than `count` values are available.
    pub fn pop_n(&mut self, count: usize) -> EvalResult<ArgList> {
        let Some(start) = self.values.len().checked_sub(count) else {
            return Err(stack_underflow());
        };
        Ok(self.values.drain(start..).collect())
    }

    pub fn pop_bool(&mut self) -> EvalResult<bool> {
        match self.pop()? {
            Value::Bool(b) => Ok(b),
            other => Err(type_mismatch("bool", other.type_name())),
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop everything above `depth`. Used to discard the partial results of
    /// a call that unwound with an error.
    pub fn truncate(&mut self, depth: usize) {
        self.values.truncate(depth);
    }
}

/// Run `f` with enough native stack for another level of recursion.
///
/// Nested expressions and nested calls recurse on the native stack; on
/// native targets it is grown on demand, WASM manages its own.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Grow when less than this remains.
    const RED_ZONE: usize = 128 * 1024;

    /// Size of each new segment.
    const GROWTH: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
