//! Program sessions: the call-frame manager.
//!
//! A [`Session`] owns everything one running program needs: the operand
//! stack, the frame stack, the live call stack and the slot holding the
//! active snapshot. Every in-program call goes through [`Session::call`],
//! which reads the active snapshot once and re-resolves the callee by
//! structure. That single read is what makes hot reload work: a frame that
//! is already executing keeps walking the snapshot it started in, while the
//! next call it makes lands in whatever snapshot is active by then.

mod builder;
mod frame_guard;

pub use builder::{SessionBuilder, SessionConfig};

use std::sync::Arc;

use kiln_ir::{
    resolve_method, BoundProgram, MethodId, MethodRef, Name, Resolution, SharedInterner, Snapshot,
};

use crate::errors::{
    arity_mismatch, entry_point_count, invalid_node, no_snapshot, stack_imbalance,
    stack_underflow, unbound_name, unresolved_method, EvalResult,
};
use crate::stack::ensure_sufficient_stack;
use crate::{
    CallFrames, CallStack, CancelHandle, InstallOutcome, Interpreter, OperandStack,
    OperatorTable, ReloadHandle, SharedHostCatalog, SharedPrintHandler, SharedRegistry, Value,
};

/// One running program.
pub struct Session {
    pub(crate) slot: ReloadHandle,
    pub(crate) interner: SharedInterner,
    pub(crate) stack: OperandStack,
    pub(crate) frames: CallFrames,
    pub(crate) call_stack: CallStack,
    pub(crate) hosts: SharedHostCatalog,
    pub(crate) operators: SharedRegistry<OperatorTable>,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) cancel: CancelHandle,
}

impl Session {
    /// Session with default configuration and the standard host catalog.
    pub fn new(interner: SharedInterner) -> Self {
        SessionBuilder::new().interner(interner).build()
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Validate `program` and make it the active snapshot.
    ///
    /// The sole hot-reload entry point on the session itself; other threads
    /// use a [`ReloadHandle`].
    pub fn install_snapshot(&self, program: BoundProgram) -> InstallOutcome {
        self.slot.install_snapshot(program)
    }

    /// The active snapshot.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.slot.current()
    }

    pub fn reload_handle(&self) -> ReloadHandle {
        self.slot.clone()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Number of programs rejected since the slot was created.
    pub fn rejected_installs(&self) -> usize {
        self.slot.rejected_installs()
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut OperandStack {
        &mut self.stack
    }

    /// Number of interpreted methods currently executing.
    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    /// Call an in-program method.
    ///
    /// Arguments are taken from the operand stack (pushed in declaration
    /// order); the result, if the method has one, is left there. On error the
    /// stack is restored to its depth before the arguments were pushed.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(method = self.interner.lookup(method.name), params = method.param_count)
    )]
    pub fn call(&mut self, method: &MethodRef) -> EvalResult<()> {
        let snapshot = self.slot.current().ok_or_else(no_snapshot)?;
        let resolution = resolve_method(&snapshot, method)
            .ok_or_else(|| unresolved_method(method.display_name(&self.interner)))?;
        if let Resolution::Structural(id) = resolution {
            tracing::trace!(
                snapshot = snapshot.id().raw(),
                method = id.index(),
                "re-resolved structurally"
            );
        }
        self.invoke(&snapshot, resolution.method())
    }

    fn invoke(&mut self, snapshot: &Arc<Snapshot>, id: MethodId) -> EvalResult<()> {
        let decl = snapshot
            .method(id)
            .ok_or_else(|| invalid_node(format!("method {}", id.index())))?;
        let name = decl.display_name(&self.interner);
        let Some(base) = self.stack.depth().checked_sub(decl.params.len()) else {
            return Err(stack_underflow());
        };
        let expected = base + usize::from(!decl.return_ty.is_void());

        let result = ensure_sufficient_stack(|| {
            let mut scoped = self.enter_frame(name)?;
            // Last argument is on top.
            for param in decl.params.iter().rev() {
                let value = scoped.stack.pop()?;
                scoped.frames.define(param.name, value);
            }

            let outcome = Interpreter::new(&mut scoped, snapshot).run_method(decl);
            let outcome = outcome.and_then(|()| {
                let actual = scoped.stack.depth();
                if actual == expected {
                    Ok(())
                } else {
                    Err(stack_imbalance(expected, actual))
                }
            });
            outcome.map_err(|e| scoped.call_stack.attach_backtrace(e))
        });

        if result.is_err() {
            self.stack.truncate(base);
        }
        result
    }

    /// Value bound to `name` in the innermost frame.
    pub fn get_local(&self, name: Name) -> EvalResult<Value> {
        self.frames
            .lookup(name)
            .ok_or_else(|| unbound_name(self.interner.lookup(name)))
    }

    /// Bind `name` in the innermost frame, overwriting any previous binding.
    pub fn set_local(&mut self, name: Name, value: Value) {
        self.frames.define(name, value);
    }

    /// The single method of the active snapshot flagged as entry point.
    pub fn find_entry_point(&self) -> EvalResult<MethodRef> {
        let snapshot = self.slot.current().ok_or_else(no_snapshot)?;
        match snapshot.entry_points().as_slice() {
            [id] => snapshot
                .method_ref(*id)
                .ok_or_else(|| invalid_node(format!("method {}", id.index()))),
            others => Err(entry_point_count(others.len())),
        }
    }

    /// Run the entry point without arguments.
    pub fn run(&mut self) -> EvalResult<Option<Value>> {
        self.run_with_args(Vec::new())
    }

    /// Run the entry point with `args` and return its result, if it has one.
    ///
    /// A cancellation requested before the run starts stops it at its first
    /// statement. The request is cleared once the run is over, however it
    /// ended, so the next run starts uncancelled.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run_with_args(&mut self, args: Vec<Value>) -> EvalResult<Option<Value>> {
        let result = self.run_entry_point(args);
        self.cancel.reset();
        result
    }

    fn run_entry_point(&mut self, args: Vec<Value>) -> EvalResult<Option<Value>> {
        let entry = self.find_entry_point()?;
        if args.len() != entry.param_count {
            return Err(arity_mismatch(
                entry.display_name(&self.interner),
                entry.param_count,
                args.len(),
            ));
        }

        let base = self.stack.depth();
        for arg in args {
            self.stack.push(arg);
        }
        self.call(&entry)?;
        if self.stack.depth() > base {
            Ok(Some(self.stack.pop()?))
        } else {
            Ok(None)
        }
    }
}
