//! Construction of bound programs.
//!
//! Parsing and binding happen outside this workspace. Whatever front end is
//! plugged in implements [`SnapshotBuilder`]; [`ProgramBuilder`] is the
//! programmatic way to assemble its output (and what tests use to write
//! programs by hand). The builder does no inference: node types and call
//! targets are whatever the caller says they are.

use std::fmt;

use crate::{
    BinaryOp, BoundProgram, CallTarget, Diagnostic, Expr, ExprId, ExprKind, HostSignature,
    Literal, MethodDecl, MethodFlags, MethodId, MethodRef, Name, Param, SharedInterner, Span,
    Stmt, StmtId, StmtKind, Type,
};

/// Error when declaring a method fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclareError {
    /// More than `u32::MAX` methods.
    Overflow { count: usize },
}

impl fmt::Display for DeclareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclareError::Overflow { count } => write!(
                f,
                "program exceeded method capacity: {count} methods, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for DeclareError {}

/// Id for the method declared after `count` others.
fn next_method_id(count: usize) -> Result<MethodId, DeclareError> {
    u32::try_from(count)
        .map(MethodId::new)
        .map_err(|_| DeclareError::Overflow { count })
}

/// Produces a new bound program from some representation of the source.
///
/// Implemented by the front end. The session never calls it on its own; the
/// rebuild trigger does, and hands the result to the session's reload handle.
pub trait SnapshotBuilder {
    type Source: ?Sized;

    fn build(&self, source: &Self::Source) -> BoundProgram;
}

/// Signature half of a method declaration.
#[derive(Clone, Debug)]
pub struct MethodSig {
    pub namespace: Name,
    pub declaring_type: Name,
    pub name: Name,
    pub arity: u32,
    pub params: Vec<Param>,
    pub return_ty: Type,
    pub flags: MethodFlags,
}

impl MethodSig {
    #[must_use]
    pub fn param(mut self, name: Name, ty: Type) -> Self {
        self.params.push(Param { name, ty });
        self
    }

    #[must_use]
    pub fn returns(mut self, ty: Type) -> Self {
        self.return_ty = ty;
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: MethodFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn generic_arity(mut self, arity: u32) -> Self {
        self.arity = arity;
        self
    }

    /// Call-site reference to this signature.
    pub fn reference(&self) -> MethodRef {
        MethodRef {
            name: self.name,
            arity: self.arity,
            param_count: self.params.len(),
            namespace: self.namespace,
            declaring_type: self.declaring_type,
            origin: None,
        }
    }
}

/// Fluent builder for a [`BoundProgram`].
pub struct ProgramBuilder {
    program: BoundProgram,
}

impl ProgramBuilder {
    pub fn new(interner: SharedInterner) -> Self {
        ProgramBuilder {
            program: BoundProgram::new(interner),
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.program.interner
    }

    /// Intern an identifier.
    pub fn name(&self, s: &str) -> Name {
        self.program.interner.intern(s)
    }

    fn expr(&mut self, kind: ExprKind, ty: Type) -> ExprId {
        self.program.arena.alloc_expr(Expr {
            kind,
            ty,
            span: Span::DUMMY,
        })
    }

    fn stmt(&mut self, kind: StmtKind) -> StmtId {
        self.program.arena.alloc_stmt(Stmt {
            kind,
            span: Span::DUMMY,
        })
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Int(value)), Type::Int)
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Bool(value)), Type::Bool)
    }

    pub fn str(&mut self, value: &str) -> ExprId {
        let name = self.name(value);
        self.expr(ExprKind::Literal(Literal::Str(name)), Type::Str)
    }

    pub fn ident(&mut self, name: &str, ty: Type) -> ExprId {
        let name = self.name(name);
        self.expr(ExprKind::Ident(name), ty)
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId, ty: Type) -> ExprId {
        self.expr(ExprKind::Binary { op, left, right }, ty)
    }

    /// Call an in-program method; `ty` is the call's result type.
    pub fn call(&mut self, target: MethodRef, args: Vec<ExprId>, ty: Type) -> ExprId {
        self.expr(
            ExprKind::Call {
                target: CallTarget::Method(target),
                args,
            },
            ty,
        )
    }

    /// Call a host operation; the result type comes from its signature.
    pub fn call_host(&mut self, target: HostSignature, args: Vec<ExprId>) -> ExprId {
        let ty = target.return_ty.clone();
        self.expr(
            ExprKind::Call {
                target: CallTarget::Host(target),
                args,
            },
            ty,
        )
    }

    /// `await inner`; typed from the awaited expression.
    pub fn await_(&mut self, inner: ExprId) -> ExprId {
        let ty = self
            .program
            .arena
            .expr(inner)
            .and_then(|e| e.ty.awaited())
            .unwrap_or(Type::Void);
        self.expr(ExprKind::Await(inner), ty)
    }

    pub fn unsupported_expr(&mut self, construct: &str, ty: Type) -> ExprId {
        let construct = self.name(construct);
        self.expr(ExprKind::Unsupported { construct }, ty)
    }

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.stmt(StmtKind::Expr(expr))
    }

    pub fn let_(&mut self, name: &str, init: Option<ExprId>) -> StmtId {
        let name = self.name(name);
        self.stmt(StmtKind::Let { name, init })
    }

    pub fn if_(&mut self, cond: ExprId, then_branch: StmtId, else_branch: Option<StmtId>) -> StmtId {
        self.stmt(StmtKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    pub fn while_(&mut self, cond: ExprId, body: StmtId) -> StmtId {
        self.stmt(StmtKind::While { cond, body })
    }

    pub fn block(&mut self, stmts: Vec<StmtId>) -> StmtId {
        self.stmt(StmtKind::Block(stmts))
    }

    pub fn ret(&mut self, value: Option<ExprId>) -> StmtId {
        self.stmt(StmtKind::Return(value))
    }

    pub fn unsupported_stmt(&mut self, construct: &str) -> StmtId {
        let construct = self.name(construct);
        self.stmt(StmtKind::Unsupported { construct })
    }

    /// Start a static method signature returning `void`.
    pub fn signature(&self, namespace: &str, declaring_type: &str, name: &str) -> MethodSig {
        MethodSig {
            namespace: self.name(namespace),
            declaring_type: self.name(declaring_type),
            name: self.name(name),
            arity: 0,
            params: Vec::new(),
            return_ty: Type::Void,
            flags: MethodFlags::STATIC,
        }
    }

    /// Declare a method with the given body, or fail once the program holds
    /// `u32::MAX` methods.
    pub fn try_declare(
        &mut self,
        sig: MethodSig,
        body: StmtId,
    ) -> Result<MethodId, DeclareError> {
        let id = next_method_id(self.program.methods.len())?;
        let span = self
            .program
            .arena
            .stmt(body)
            .map_or(Span::DUMMY, |s| s.span);
        self.program.methods.push(MethodDecl {
            name: sig.name,
            arity: sig.arity,
            params: sig.params,
            return_ty: sig.return_ty,
            namespace: sig.namespace,
            declaring_type: sig.declaring_type,
            flags: sig.flags,
            body,
            span,
        });
        Ok(id)
    }

    /// Declare a method with the given body.
    ///
    /// # Panics
    /// Panics if the program exceeds `u32::MAX` methods.
    pub fn declare(&mut self, sig: MethodSig, body: StmtId) -> MethodId {
        self.try_declare(sig, body).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Static host operation signature.
    pub fn host(&self, scope: &str, name: &str, params: Vec<Type>, return_ty: Type) -> HostSignature {
        HostSignature {
            scope: self.name(scope),
            name: self.name(name),
            params,
            return_ty,
            is_static: true,
        }
    }

    /// Record a front-end diagnostic.
    pub fn diagnostic(&mut self, diagnostic: Diagnostic) {
        self.program.diagnostics.push(diagnostic);
    }

    pub fn finish(self) -> BoundProgram {
        self.program
    }
}
