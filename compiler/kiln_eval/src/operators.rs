//! Binary operator table.
//!
//! The engine never hard-codes operator semantics: each `BinaryOp` maps to an
//! implementation in an [`OperatorTable`]. The default table covers the
//! executable subset (integer addition and equality); embedders register more.
//! An operator with no entry fails with `UnsupportedOperator` when evaluated,
//! so the binder may produce any operator without the engine guessing at it.

use rustc_hash::FxHashMap;

use kiln_ir::BinaryOp;

use crate::errors::{integer_overflow, type_mismatch, unsupported_operator, EvalResult};
use crate::Value;

/// Implementation of one binary operator, called with `(left, right)`.
pub type BinaryFn = fn(Value, Value) -> EvalResult<Value>;

/// Operator implementations keyed by operator.
#[derive(Clone, Debug)]
pub struct OperatorTable {
    ops: FxHashMap<BinaryOp, BinaryFn>,
}

impl OperatorTable {
    /// Table with no operators at all.
    pub fn empty() -> Self {
        OperatorTable {
            ops: FxHashMap::default(),
        }
    }

    /// Table with the default operators: `+` on integers and `==`.
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.register(BinaryOp::Add, add);
        table.register(BinaryOp::Equal, equal);
        table
    }

    /// Install `f` for `op`, replacing any previous implementation.
    pub fn register(&mut self, op: BinaryOp, f: BinaryFn) {
        self.ops.insert(op, f);
    }

    #[inline]
    pub fn get(&self, op: BinaryOp) -> Option<BinaryFn> {
        self.ops.get(&op).copied()
    }

    pub fn supports(&self, op: BinaryOp) -> bool {
        self.ops.contains_key(&op)
    }

    /// Apply `op` to already-evaluated operands.
    #[inline]
    pub fn apply(&self, op: BinaryOp, left: Value, right: Value) -> EvalResult<Value> {
        let f = self.get(op).ok_or_else(|| unsupported_operator(op))?;
        f(left, right)
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::new()
    }
}

// Default implementations

#[allow(
    clippy::needless_pass_by_value,
    reason = "signature fixed by BinaryFn"
)]
fn add(left: Value, right: Value) -> EvalResult<Value> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_add(*b)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("addition")),
        (Value::Int(_), other) | (other, _) => Err(type_mismatch("int", other.type_name())),
    }
}

#[allow(
    clippy::needless_pass_by_value,
    reason = "signature fixed by BinaryFn"
)]
fn equal(left: Value, right: Value) -> EvalResult<Value> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a == b)),
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a == b)),
        (Value::Str(a), Value::Str(b)) => Ok(Value::Bool(a == b)),
        _ => Err(type_mismatch(left.type_name(), right.type_name())),
    }
}
