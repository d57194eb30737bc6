//! Static types attached to bound nodes.
//!
//! The binder resolves every expression's type before a snapshot reaches the
//! engine. The engine only asks a handful of questions of a type: is it void,
//! is it an awaitable, and how is it spelled in a host signature.

use crate::{Name, StringInterner};

/// Static type of a bound expression, parameter or method result.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// No value.
    Void,
    /// 64-bit signed integer.
    Int,
    /// Boolean.
    Bool,
    /// Immutable string.
    Str,
    /// Any value (host parameters that accept everything).
    Object,
    /// Generic asynchronous result, `Task<T>`.
    Task(Box<Type>),
    /// Non-generic asynchronous completion, `Task`.
    Signal,
    /// Awaitable cooperative yield point.
    Yield,
    /// Nominal type the engine treats opaquely.
    Named(Name),
}

impl Type {
    /// Create a `Task<T>` type.
    pub fn task(inner: Type) -> Self {
        Type::Task(Box::new(inner))
    }

    /// True when expressions of this type leave nothing on the operand stack.
    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// True for results an `await` can suspend on.
    pub fn is_awaitable(&self) -> bool {
        matches!(self, Type::Task(_) | Type::Signal | Type::Yield)
    }

    /// Type produced by awaiting a value of this type.
    ///
    /// `Task<T>` yields `T`; completion signals and yield points yield nothing.
    pub fn awaited(&self) -> Option<Type> {
        match self {
            Type::Task(inner) => Some((**inner).clone()),
            Type::Signal | Type::Yield => Some(Type::Void),
            _ => None,
        }
    }

    /// Canonical spelling, as used in host signatures and diagnostics.
    pub fn display_name(&self, interner: &StringInterner) -> String {
        match self {
            Type::Void => "void".to_string(),
            Type::Int => "int".to_string(),
            Type::Bool => "bool".to_string(),
            Type::Str => "string".to_string(),
            Type::Object => "object".to_string(),
            Type::Task(inner) => format!("Task<{}>", inner.display_name(interner)),
            Type::Signal => "Task".to_string(),
            Type::Yield => "YieldAwaitable".to_string(),
            Type::Named(name) => interner.lookup(*name).to_string(),
        }
    }
}
