use super::*;
use kiln_ir::{Diagnostic, ErrorCode, ProgramBuilder, SharedInterner, Type};
use pretty_assertions::assert_eq;

/// `Program.Greeting()` returning `greeting`.
fn program(interner: &SharedInterner, greeting: &str) -> BoundProgram {
    let mut b = ProgramBuilder::new(interner.clone());
    let text = b.str(greeting);
    let ret = b.ret(Some(text));
    let sig = b.signature("Demo", "Program", "Greeting").returns(Type::Str);
    b.declare(sig, ret);
    b.finish()
}

fn broken(interner: &SharedInterner) -> BoundProgram {
    let mut b = ProgramBuilder::new(interner.clone());
    b.diagnostic(Diagnostic::error(ErrorCode::E1002, "`Foo` is not defined"));
    b.finish()
}

#[test]
fn test_install_replaces_active_snapshot() {
    let interner = SharedInterner::new();
    let handle = ReloadHandle::new(interner.clone());
    assert!(handle.current().is_none());

    let first = handle.install_snapshot(program(&interner, "one"));
    let second = handle.install_snapshot(program(&interner, "two"));
    assert!(first.is_installed() && second.is_installed());
    assert!(second.snapshot_id() > first.snapshot_id());
    assert_eq!(handle.current().map(|s| s.id()), second.snapshot_id());
}

#[test]
fn test_rejected_install_keeps_previous() {
    let interner = SharedInterner::new();
    let handle = ReloadHandle::new(interner.clone());
    let installed = handle.install_snapshot(program(&interner, "one"));

    let outcome = handle.install_snapshot(broken(&interner));
    assert!(!outcome.is_installed());
    assert_eq!(outcome.diagnostics().len(), 1);
    assert_eq!(outcome.diagnostics()[0].code, ErrorCode::E1002);
    assert_eq!(handle.current().map(|s| s.id()), installed.snapshot_id());
    assert_eq!(handle.rejected_installs(), 1);
}

#[test]
fn test_rejected_first_install_leaves_slot_empty() {
    let interner = SharedInterner::new();
    let handle = ReloadHandle::new(interner.clone());
    let outcome = handle.install_snapshot(broken(&interner));
    assert_eq!(outcome.snapshot_id(), None);
    assert!(handle.current().is_none());
}

#[test]
fn test_rebuild_goes_through_builder() {
    struct Greeter(SharedInterner);

    impl SnapshotBuilder for Greeter {
        type Source = str;

        fn build(&self, source: &str) -> BoundProgram {
            program(&self.0, source)
        }
    }

    let interner = SharedInterner::new();
    let handle = ReloadHandle::new(interner.clone());
    let outcome = handle.rebuild(&Greeter(interner.clone()), "from source");
    assert!(outcome.is_installed());
    let snapshot = handle.current().unwrap_or_else(|| panic!("nothing installed"));
    assert_eq!(snapshot.method_count(), 1);
    assert!(interner.get("from source").is_some());
}

#[test]
fn test_clones_share_slot_across_threads() {
    let interner = SharedInterner::new();
    let handle = ReloadHandle::new(interner.clone());
    let remote = handle.clone();
    assert!(handle.same_slot(&remote));

    let worker_interner = interner.clone();
    let installed = std::thread::spawn(move || {
        remote
            .install_snapshot(program(&worker_interner, "remote"))
            .snapshot_id()
    })
    .join()
    .ok()
    .flatten();

    assert!(installed.is_some());
    assert_eq!(handle.current().map(|s| s.id()), installed);
}

#[test]
fn test_in_flight_snapshot_outlives_replacement() {
    let interner = SharedInterner::new();
    let handle = ReloadHandle::new(interner.clone());
    handle.install_snapshot(program(&interner, "old"));
    let held = handle.current().unwrap_or_else(|| panic!("nothing installed"));

    handle.install_snapshot(program(&interner, "new"));
    let current = handle.current().unwrap_or_else(|| panic!("nothing installed"));
    assert_ne!(held.id(), current.id());
    // The superseded snapshot is still fully readable by whoever holds it.
    assert_eq!(held.method_count(), 1);
}

#[test]
fn test_program_from_another_interner_is_rejected() {
    let interner = SharedInterner::new();
    let handle = ReloadHandle::new(interner.clone());
    let installed = handle.install_snapshot(program(&interner, "ours"));

    let outcome = handle.install_snapshot(program(&SharedInterner::new(), "theirs"));
    assert!(!outcome.is_installed());
    assert_eq!(
        outcome.diagnostics().iter().map(|d| d.code).collect::<Vec<_>>(),
        vec![ErrorCode::E9005]
    );
    assert_eq!(handle.current().map(|s| s.id()), installed.snapshot_id());
    assert_eq!(handle.rejected_installs(), 1);
}
