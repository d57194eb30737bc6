//! Method declarations and the references call sites hold to them.

use bitflags::bitflags;

use crate::{Name, SnapshotId, Span, StmtId, StringInterner, Type};

/// Index of a method declaration within one snapshot.
///
/// Only meaningful together with the snapshot it was taken from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct MethodId(u32);

impl MethodId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        MethodId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    /// Declaration modifiers the engine cares about.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct MethodFlags: u8 {
        /// `static` method.
        const STATIC = 1 << 0;
        /// `async` method; its result is wrapped on exit.
        const ASYNC = 1 << 1;
        /// Designated program entry point.
        const ENTRY_POINT = 1 << 2;
    }
}

/// A declared parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: Name,
    pub ty: Type,
}

/// A method declared by the interpreted program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: Name,
    /// Number of generic type parameters.
    pub arity: u32,
    pub params: Vec<Param>,
    pub return_ty: Type,
    /// Declaring namespace.
    pub namespace: Name,
    /// Metadata name of the declaring type.
    pub declaring_type: Name,
    pub flags: MethodFlags,
    pub body: StmtId,
    pub span: Span,
}

impl MethodDecl {
    #[inline]
    pub fn is_async(&self) -> bool {
        self.flags.contains(MethodFlags::ASYNC)
    }

    #[inline]
    pub fn is_entry_point(&self) -> bool {
        self.flags.contains(MethodFlags::ENTRY_POINT)
    }

    /// `Type.Name/params` for logs and backtraces.
    pub fn display_name(&self, interner: &StringInterner) -> String {
        format!(
            "{}.{}/{}",
            interner.lookup(self.declaring_type),
            interner.lookup(self.name),
            self.params.len()
        )
    }
}

/// Where a [`MethodRef`] was originally bound.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodOrigin {
    pub snapshot: SnapshotId,
    pub method: MethodId,
}

/// Reference from a call site to an in-program method.
///
/// The reference is a structural descriptor, not a pointer: resolving it
/// against any snapshot compares name, generic arity, parameter count,
/// namespace and declaring type. The optional origin only enables a shortcut
/// when the reference is resolved against the very snapshot it came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub name: Name,
    pub arity: u32,
    pub param_count: usize,
    pub namespace: Name,
    pub declaring_type: Name,
    pub origin: Option<MethodOrigin>,
}

impl MethodRef {
    /// Structural descriptor of `decl`, without origin.
    pub fn for_decl(decl: &MethodDecl) -> Self {
        MethodRef {
            name: decl.name,
            arity: decl.arity,
            param_count: decl.params.len(),
            namespace: decl.namespace,
            declaring_type: decl.declaring_type,
            origin: None,
        }
    }

    /// Attach the snapshot/method this reference was bound against.
    #[must_use]
    pub fn with_origin(mut self, snapshot: SnapshotId, method: MethodId) -> Self {
        self.origin = Some(MethodOrigin { snapshot, method });
        self
    }

    /// Structural match against a declaration.
    pub fn matches(&self, decl: &MethodDecl) -> bool {
        self.name == decl.name
            && self.arity == decl.arity
            && self.param_count == decl.params.len()
            && self.namespace == decl.namespace
            && self.declaring_type == decl.declaring_type
    }

    /// `Namespace.Type.Name/params` for diagnostics.
    pub fn display_name(&self, interner: &StringInterner) -> String {
        format!(
            "{}.{}.{}/{}",
            interner.lookup(self.namespace),
            interner.lookup(self.declaring_type),
            interner.lookup(self.name),
            self.param_count
        )
    }
}

/// Descriptor of an operation supplied by the host runtime.
///
/// Matched against the host catalog by exact scope, name and ordered
/// parameter types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HostSignature {
    /// Fully qualified declaring scope, e.g. `System.Console`.
    pub scope: Name,
    pub name: Name,
    pub params: Vec<Type>,
    pub return_ty: Type,
    /// Instance operations cannot be dispatched by the bridge.
    pub is_static: bool,
}

impl HostSignature {
    /// `Scope.Name(types)` for diagnostics.
    pub fn display_name(&self, interner: &StringInterner) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|ty| ty.display_name(interner))
            .collect();
        format!(
            "{}.{}({})",
            interner.lookup(self.scope),
            interner.lookup(self.name),
            params.join(", ")
        )
    }
}
