//! Kiln Eval - hot-reloading tree-walking interpreter.
//!
//! This crate executes validated [`kiln_ir::Snapshot`]s by walking their bound
//! syntax directly, and lets a newer snapshot be installed while the program
//! runs.
//!
//! # Architecture
//!
//! - [`OperandStack`]: one LIFO of values per session
//! - [`Interpreter`]: the execution engine, one per method activation
//! - [`Session`]: the call-frame manager; resolves every in-program call
//!   against the active snapshot
//! - [`HostCatalog`]: the external call bridge to host operations
//! - [`ReloadHandle`]: thread-safe access to the active snapshot slot
//! - [`OperatorTable`]: binary operator implementations
//!
//! # Hot reload
//!
//! Method references are structural descriptors. A call made after a new
//! snapshot is installed resolves its callee by name, generic arity,
//! parameter count, namespace and declaring type in that snapshot. Method
//! activations already running finish against the snapshot they started in.

mod cancel;
mod diagnostics;
mod environment;
pub mod errors;
mod host;
mod interpreter;
mod logging;
mod operators;
mod pending;
mod print_handler;
mod reload;
mod session;
mod shared;
mod stack;
pub mod stdlib;
mod value;

#[cfg(test)]
mod tests;

pub use cancel::CancelHandle;
pub use diagnostics::CallStack;
pub use environment::{CallFrames, Frame};
pub use errors::{EvalBacktrace, EvalError, EvalErrorKind, EvalResult};
pub use host::{HostCatalog, HostError, HostFn, HostOperation, SharedHostCatalog};
pub use interpreter::{Flow, Interpreter};
pub use logging::init_tracing;
pub use operators::{BinaryFn, OperatorTable};
pub use pending::Pending;
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use reload::{InstallOutcome, ReloadHandle};
pub use session::{Session, SessionBuilder, SessionConfig};
pub use shared::SharedRegistry;
pub use stack::{ensure_sufficient_stack, ArgList, OperandStack};
pub use value::Value;
