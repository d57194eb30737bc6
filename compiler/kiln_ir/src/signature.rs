//! Structural re-resolution of method references.
//!
//! A call site bound against one snapshot may be executed after a newer
//! snapshot was installed. Resolution never trusts object identity from the
//! old snapshot; it looks for a declaration with the same name, generic
//! arity, parameter count, namespace and declaring type in the snapshot it is
//! given.

use crate::{MethodId, MethodRef, Snapshot};

/// How a reference was resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The reference was bound against this very snapshot.
    Origin(MethodId),
    /// Found by structural search.
    Structural(MethodId),
}

impl Resolution {
    #[inline]
    pub fn method(self) -> MethodId {
        match self {
            Resolution::Origin(id) | Resolution::Structural(id) => id,
        }
    }
}

/// Resolve `reference` against `snapshot`.
///
/// Candidates are scanned in declaration order and the first structural
/// match wins, so resolving the same reference twice against the same
/// snapshot always yields the same method. Overloads with a different
/// parameter count never match.
pub fn resolve_method(snapshot: &Snapshot, reference: &MethodRef) -> Option<Resolution> {
    if let Some(origin) = reference.origin {
        if origin.snapshot == snapshot.id() {
            if let Some(decl) = snapshot.method(origin.method) {
                if reference.matches(decl) {
                    return Some(Resolution::Origin(origin.method));
                }
            }
        }
    }

    snapshot
        .methods()
        .find(|(_, decl)| reference.matches(decl))
        .map(|(id, _)| Resolution::Structural(id))
}
