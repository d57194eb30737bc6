//! Hot-reload slot.
//!
//! The active snapshot lives behind an `Arc<RwLock<..>>` shared by a session
//! and every [`ReloadHandle`] cloned from it. Installing validates the
//! candidate first and only then takes the write lock for the swap, so a
//! concurrent `call` sees either the old snapshot or the new one in full.
//! Frames already executing keep the `Arc` of the snapshot they started in.
//!
//! The slot is tied to the interner of its session: a program whose names
//! were interned anywhere else is rejected rather than installed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use kiln_ir::{
    BoundProgram, Diagnostic, SharedInterner, Snapshot, SnapshotBuilder, SnapshotId,
};

/// Result of offering a rebuilt program to a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The program is now the active snapshot.
    Installed { id: SnapshotId },
    /// The program failed validation; the previous snapshot stays active.
    Rejected { diagnostics: Vec<Diagnostic> },
}

impl InstallOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, InstallOutcome::Installed { .. })
    }

    /// Id of the installed snapshot, if any.
    pub fn snapshot_id(&self) -> Option<SnapshotId> {
        match self {
            InstallOutcome::Installed { id } => Some(*id),
            InstallOutcome::Rejected { .. } => None,
        }
    }

    /// Diagnostics of a rejected install; empty when installed.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            InstallOutcome::Installed { .. } => &[],
            InstallOutcome::Rejected { diagnostics } => diagnostics,
        }
    }
}

/// Cloneable, thread-safe access to a session's active snapshot.
///
/// This is how a rebuild trigger running on another thread (a file watcher,
/// an editor integration) hands new programs to a running session.
#[derive(Clone, Debug)]
pub struct ReloadHandle {
    interner: SharedInterner,
    slot: Arc<RwLock<Option<Arc<Snapshot>>>>,
    rejected: Arc<AtomicUsize>,
}

impl ReloadHandle {
    /// Handle to a fresh, empty slot accepting programs built over `interner`.
    pub fn new(interner: SharedInterner) -> Self {
        ReloadHandle {
            interner,
            slot: Arc::default(),
            rejected: Arc::default(),
        }
    }

    /// Interner every installed program must share.
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// The active snapshot, read once.
    #[inline]
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.slot.read().clone()
    }

    /// Validate `program` and make it the active snapshot.
    ///
    /// A rejected program leaves the active snapshot untouched.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn install_snapshot(&self, program: BoundProgram) -> InstallOutcome {
        match Snapshot::validate_for(program, &self.interner) {
            Ok(snapshot) => {
                let id = snapshot.id();
                let methods = snapshot.method_count();
                for warning in snapshot.warnings() {
                    tracing::debug!(%warning, "snapshot warning");
                }
                let previous = self.slot.write().replace(Arc::new(snapshot));
                tracing::debug!(
                    snapshot = id.raw(),
                    previous = previous.map_or(0, |s| s.id().raw()),
                    methods,
                    "installed snapshot"
                );
                InstallOutcome::Installed { id }
            }
            Err(diagnostics) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                let first = diagnostics
                    .first()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                tracing::warn!(
                    errors = diagnostics.len(),
                    %first,
                    "rejected snapshot; keeping the active program"
                );
                InstallOutcome::Rejected { diagnostics }
            }
        }
    }

    /// Run `builder` over `source` and install the result.
    pub fn rebuild<B: SnapshotBuilder>(&self, builder: &B, source: &B::Source) -> InstallOutcome {
        self.install_snapshot(builder.build(source))
    }

    /// Number of programs rejected so far.
    pub fn rejected_installs(&self) -> usize {
        self.rejected.load(Ordering::Relaxed)
    }

    /// True if both handles share one slot.
    pub fn same_slot(&self, other: &ReloadHandle) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

#[cfg(test)]
mod tests;
