//! Helpers for writing bound programs by hand in tests.

use kiln_ir::{
    BoundProgram, ExprId, MethodFlags, MethodSig, ProgramBuilder, SharedInterner, SnapshotId,
    StmtId, Type,
};

use crate::stdlib::{standard_catalog, CONSOLE, TASK};
use crate::{
    buffer_handler, CancelHandle, HostCatalog, InstallOutcome, ReloadHandle, Session,
    SharedPrintHandler,
};

pub(crate) const NAMESPACE: &str = "Test";
pub(crate) const PROGRAM: &str = "Program";
/// Scope of the host operations tests register themselves.
pub(crate) const HOOKS: &str = "Test.Hooks";

/// A session printing into a buffer.
pub(crate) struct Harness {
    pub session: Session,
    pub print: SharedPrintHandler,
}

impl Harness {
    pub fn new() -> Self {
        let print = buffer_handler();
        let session = Session::builder()
            .interner(SharedInterner::new())
            .print_handler(print.clone())
            .build();
        Harness { session, print }
    }

    /// Session over `interner` with the standard catalog plus whatever
    /// `register` adds, sharing `reload` and `cancel` with those operations.
    pub fn with_hosts(
        interner: &SharedInterner,
        reload: &ReloadHandle,
        cancel: &CancelHandle,
        register: impl FnOnce(&mut HostCatalog),
    ) -> Self {
        let print = buffer_handler();
        let mut catalog = standard_catalog(interner.clone(), &print);
        register(&mut catalog);
        let session = Session::builder()
            .interner(interner.clone())
            .print_handler(print.clone())
            .host_catalog(catalog)
            .reload_handle(reload.clone())
            .cancel_handle(cancel.clone())
            .build();
        Harness { session, print }
    }

    pub fn builder(&self) -> ProgramBuilder {
        ProgramBuilder::new(self.session.interner().clone())
    }

    /// Install `program`, failing the test if it is rejected.
    pub fn install(&self, program: BoundProgram) -> SnapshotId {
        match self.session.install_snapshot(program) {
            InstallOutcome::Installed { id } => id,
            InstallOutcome::Rejected { diagnostics } => {
                panic!("program rejected: {diagnostics:?}")
            }
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.print.lines()
    }
}

/// `Program.name()` in the test namespace, static, returning void.
pub(crate) fn method(b: &ProgramBuilder, name: &str) -> MethodSig {
    b.signature(NAMESPACE, PROGRAM, name)
}

/// `static void Main()` flagged as entry point.
pub(crate) fn main_sig(b: &ProgramBuilder) -> MethodSig {
    method(b, "Main").flags(MethodFlags::ENTRY_POINT)
}

/// `Console.WriteLine(arg);` as a statement.
pub(crate) fn write_line(b: &mut ProgramBuilder, arg: ExprId) -> StmtId {
    let sig = b.host(CONSOLE, "WriteLine", vec![Type::Str], Type::Void);
    let call = b.call_host(sig, vec![arg]);
    b.expr_stmt(call)
}

/// `Console.WriteLine("text");` as a statement.
pub(crate) fn print_str(b: &mut ProgramBuilder, text: &str) -> StmtId {
    let arg = b.str(text);
    write_line(b, arg)
}

/// `Task.FromResult(arg)` typed as `Task<ty>`.
pub(crate) fn from_result(b: &mut ProgramBuilder, arg: ExprId, ty: Type) -> ExprId {
    let sig = b.host(TASK, "FromResult", vec![Type::Object], Type::task(ty));
    b.call_host(sig, vec![arg])
}

/// `Test.Hooks.name();` as a statement (static, no arguments, void).
pub(crate) fn hook(b: &mut ProgramBuilder, name: &str) -> StmtId {
    let sig = b.host(HOOKS, name, vec![], Type::Void);
    let call = b.call_host(sig, vec![]);
    b.expr_stmt(call)
}
