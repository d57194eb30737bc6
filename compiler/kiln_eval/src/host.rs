//! External call bridge.
//!
//! Host operations are callables supplied by the embedding runtime and
//! registered ahead of time in a [`HostCatalog`], keyed by declaring scope,
//! operation name and ordered parameter types. The catalog is built once and
//! then shared read-only; lookup is an exact structural match on the
//! [`HostSignature`] the binder attached to the call site.
//!
//! Dispatch pops the arguments off the operand stack (last argument first,
//! then restored to call order), invokes the callable synchronously and
//! pushes its result unless the signature's result type is `void`.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use kiln_ir::{HostSignature, Name, SharedInterner, Type};

use crate::errors::{host_fault, host_operation_not_found, EvalResult};
use crate::{OperandStack, SharedRegistry, Value};

/// Failure reported by a host callable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        HostError {
            message: message.into(),
        }
    }

    /// Argument `index` does not have the kind the operation needs.
    pub fn argument(index: usize, expected: &str, got: &Value) -> Self {
        Self::new(format!(
            "argument {index}: expected {expected}, got {}",
            got.type_name()
        ))
    }
}

/// Signature of a host callable.
pub type HostFn = dyn Fn(&[Value]) -> Result<Value, HostError> + Send + Sync;

/// A registered host operation.
#[derive(Clone)]
pub struct HostOperation {
    func: Arc<HostFn>,
}

impl HostOperation {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        HostOperation { func: Arc::new(f) }
    }

    /// Call with arguments in declaration order.
    #[inline]
    pub fn invoke(&self, args: &[Value]) -> Result<Value, HostError> {
        (self.func)(args)
    }
}

impl fmt::Debug for HostOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HostOperation(<fn>)")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct HostKey {
    scope: Name,
    name: Name,
    params: Vec<Type>,
}

/// Statically registered table of host operations.
#[derive(Debug)]
pub struct HostCatalog {
    interner: SharedInterner,
    ops: FxHashMap<HostKey, HostOperation>,
}

/// Host catalog shared read-only between sessions.
pub type SharedHostCatalog = SharedRegistry<HostCatalog>;

impl HostCatalog {
    /// Empty catalog. `interner` must be the one the programs it serves use.
    pub fn new(interner: SharedInterner) -> Self {
        HostCatalog {
            interner,
            ops: FxHashMap::default(),
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Register a static operation `scope.name(params)`.
    ///
    /// Re-registering the same signature replaces the previous callable.
    pub fn register<F>(&mut self, scope: &str, name: &str, params: Vec<Type>, f: F)
    where
        F: Fn(&[Value]) -> Result<Value, HostError> + Send + Sync + 'static,
    {
        let key = HostKey {
            scope: self.interner.intern(scope),
            name: self.interner.intern(name),
            params,
        };
        self.ops.insert(key, HostOperation::new(f));
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Find the operation a call site refers to.
    ///
    /// Instance operations are never dispatched: the bridge has no receiver
    /// to call them on.
    pub fn resolve(&self, signature: &HostSignature) -> EvalResult<&HostOperation> {
        if !signature.is_static {
            return Err(self.not_found(signature, "instance operations cannot be called"));
        }
        let key = HostKey {
            scope: signature.scope,
            name: signature.name,
            params: signature.params.clone(),
        };
        if let Some(op) = self.ops.get(&key) {
            return Ok(op);
        }
        let overloaded = self
            .ops
            .keys()
            .any(|k| k.scope == signature.scope && k.name == signature.name);
        Err(if overloaded {
            self.not_found(signature, "no overload takes these parameter types")
        } else {
            self.not_found(signature, "no such operation is registered")
        })
    }

    /// Pop arguments, invoke the operation, push its result if non-void.
    ///
    /// Nothing is popped if the operation cannot be resolved.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(operation = self.interner.lookup(signature.name))
    )]
    pub fn dispatch(&self, signature: &HostSignature, stack: &mut OperandStack) -> EvalResult<()> {
        let op = self.resolve(signature)?;
        let args = stack.pop_n(signature.params.len())?;
        let result = op.invoke(&args).map_err(|e| {
            tracing::debug!(error = %e, "host operation failed");
            host_fault(e.message)
        })?;
        if !signature.return_ty.is_void() {
            stack.push(result);
        }
        Ok(())
    }

    fn not_found(&self, signature: &HostSignature, reason: &str) -> crate::EvalError {
        host_operation_not_found(signature.display_name(&self.interner), reason)
    }
}
