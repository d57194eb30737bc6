//! Kiln IR - bound program representation.
//!
//! This crate contains the data the interpreter executes:
//! - Names and the interner shared by every rebuild of a program
//! - Static types attached to bound nodes
//! - The expression/statement arena and node kinds
//! - Method declarations, method references and host signatures
//! - Diagnostics and validated, immutable [`Snapshot`]s
//! - Structural re-resolution of method references across snapshots
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers and string literals are `Name(u32)`
//! - **Flatten Everything**: nodes refer to each other through `ExprId`/`StmtId`
//! - **Match by Structure**: a [`MethodRef`] is a descriptor, never a pointer
//!   into a particular snapshot

mod arena;
mod ast;
mod builder;
mod diagnostic;
mod interner;
mod method;
mod name;
mod program;
mod signature;
mod span;
mod ty;

pub use arena::NodeArena;
pub use ast::{
    BinaryOp, CallTarget, Expr, ExprId, ExprKind, Literal, Stmt, StmtId, StmtKind,
};
pub use builder::{DeclareError, MethodSig, ProgramBuilder, SnapshotBuilder};
pub use diagnostic::{Diagnostic, ErrorCode, Severity};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use method::{HostSignature, MethodDecl, MethodFlags, MethodId, MethodOrigin, MethodRef, Param};
pub use name::Name;
pub use program::{BoundProgram, Snapshot, SnapshotId};
pub use signature::{resolve_method, Resolution};
pub use span::Span;
pub use ty::Type;
