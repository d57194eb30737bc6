//! Runtime values.
//!
//! The operand stack and call frames hold `Value`s without any static type
//! attached; type discipline is enforced where values are consumed.

use std::fmt;
use std::sync::Arc;

use crate::Pending;

/// A dynamically-typed runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    /// Result of a host operation with no value.
    Void,
    Int(i64),
    Bool(bool),
    Str(Arc<str>),
    /// Asynchronous computation that yields a value.
    Future(Pending),
    /// Asynchronous computation that only signals completion.
    Signal(Pending),
    /// Cooperative yield point with no payload.
    Yield,
}

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// A future that has already completed with `value`.
    pub fn ready(value: Value) -> Self {
        Value::Future(Pending::completed(value))
    }

    /// A completion signal that has already fired.
    pub fn done() -> Self {
        Value::Signal(Pending::completed(Value::Void))
    }

    /// Runtime kind name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Future(_) => "Task<T>",
            Value::Signal(_) => "Task",
            Value::Yield => "YieldAwaitable",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(&**s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) | (Value::Yield, Value::Yield) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Future(a), Value::Future(b)) | (Value::Signal(a), Value::Signal(b)) => {
                a.ptr_eq(b)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => Ok(()),
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Future(_) | Value::Signal(_) | Value::Yield => f.write_str(self.type_name()),
        }
    }
}
