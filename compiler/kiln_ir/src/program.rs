//! Bound programs and validated snapshots.
//!
//! A [`BoundProgram`] is whatever the front end produced, diagnostics
//! included. A [`Snapshot`] is a bound program that passed validation: it has
//! no error diagnostics and every node id it contains points into its arena.
//! Snapshots are immutable and shared by `Arc` between the session and any
//! frames still executing their method bodies.

use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;

use crate::{
    CallTarget, Diagnostic, ErrorCode, Expr, ExprId, ExprKind, MethodDecl, MethodId, MethodRef,
    NodeArena, SharedInterner, Stmt, StmtId, StmtKind,
};

/// Process-unique identity of a validated snapshot.
///
/// Ids increase monotonically, so a later rebuild always has a larger id.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct SnapshotId(u64);

impl SnapshotId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SnapshotId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Output of the front end for one version of the source.
#[derive(Clone, Debug)]
pub struct BoundProgram {
    pub interner: SharedInterner,
    pub methods: Vec<MethodDecl>,
    pub arena: NodeArena,
    pub diagnostics: Vec<Diagnostic>,
}

impl BoundProgram {
    /// Empty program using `interner` for every name it will contain.
    pub fn new(interner: SharedInterner) -> Self {
        BoundProgram {
            interner,
            methods: Vec::new(),
            arena: NodeArena::new(),
            diagnostics: Vec::new(),
        }
    }
}

/// An immutable, validated program.
#[derive(Debug)]
pub struct Snapshot {
    id: SnapshotId,
    interner: SharedInterner,
    methods: Vec<MethodDecl>,
    arena: NodeArena,
    warnings: Vec<Diagnostic>,
}

impl Snapshot {
    /// Validate a bound program.
    ///
    /// Returns every error diagnostic (front-end and structural) on failure;
    /// warnings do not block validation and stay available on the snapshot.
    pub fn validate(program: BoundProgram) -> Result<Snapshot, Vec<Diagnostic>> {
        let BoundProgram {
            interner,
            methods,
            arena,
            mut diagnostics,
        } = program;

        diagnostics.extend(structural_diagnostics(&interner, &methods, &arena));

        let (errors, warnings): (Vec<_>, Vec<_>) =
            diagnostics.into_iter().partition(Diagnostic::is_error);
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Snapshot {
            id: SnapshotId::fresh(),
            interner,
            methods,
            arena,
            warnings,
        })
    }

    /// Validate a bound program for execution by a session interning through
    /// `interner`.
    ///
    /// Names are plain indices into their interner, so a program built over
    /// any other interner is rejected with `E9005` on top of the checks done
    /// by [`Snapshot::validate`].
    pub fn validate_for(
        mut program: BoundProgram,
        interner: &SharedInterner,
    ) -> Result<Snapshot, Vec<Diagnostic>> {
        if !program.interner.ptr_eq(interner) {
            program.diagnostics.push(Diagnostic::error(
                ErrorCode::E9005,
                "program was bound with a different interner than the session executing it",
            ));
        }
        Self::validate(program)
    }

    #[inline]
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> Option<&MethodDecl> {
        self.methods.get(id.index())
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = (MethodId, &MethodDecl)> {
        self.methods
            .iter()
            .enumerate()
            .filter_map(|(i, m)| u32::try_from(i).ok().map(|i| (MethodId::new(i), m)))
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> Option<&Expr> {
        self.arena.expr(id)
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> Option<&Stmt> {
        self.arena.stmt(id)
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Reference to `id` carrying this snapshot as its origin.
    pub fn method_ref(&self, id: MethodId) -> Option<MethodRef> {
        self.method(id)
            .map(|decl| MethodRef::for_decl(decl).with_origin(self.id, id))
    }

    /// Methods flagged as entry points, in declaration order.
    pub fn entry_points(&self) -> Vec<MethodId> {
        self.methods()
            .filter(|(_, decl)| decl.is_entry_point())
            .map(|(id, _)| id)
            .collect()
    }
}

fn structural_diagnostics(
    interner: &SharedInterner,
    methods: &[MethodDecl],
    arena: &NodeArena,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let expr_ok = |id: ExprId| id.index() < arena.expr_count();
    let stmt_ok = |id: StmtId| id.index() < arena.stmt_count();

    let mut seen: FxHashMap<MethodRef, usize> = FxHashMap::default();
    for (index, method) in methods.iter().enumerate() {
        if !stmt_ok(method.body) {
            diagnostics.push(
                Diagnostic::error(
                    ErrorCode::E9002,
                    format!(
                        "body of `{}` is not part of the program",
                        method.display_name(interner)
                    ),
                )
                .with_span(method.span),
            );
        }
        if let Some(first) = seen.insert(MethodRef::for_decl(method), index) {
            diagnostics.push(
                Diagnostic::warning(
                    ErrorCode::E9003,
                    format!(
                        "`{}` shares its structural signature with method #{first}; calls resolve to the first declaration",
                        method.display_name(interner)
                    ),
                )
                .with_span(method.span),
            );
        }
    }

    for (id, expr) in arena.exprs() {
        let dangling = |child: ExprId| {
            Diagnostic::error(
                ErrorCode::E9001,
                format!("expression {} refers to missing expression {}", id.index(), child.index()),
            )
            .with_span(expr.span)
        };
        match &expr.kind {
            ExprKind::Binary { left, right, .. } => {
                for child in [*left, *right] {
                    if !expr_ok(child) {
                        diagnostics.push(dangling(child));
                    }
                }
            }
            ExprKind::Await(inner) => {
                if !expr_ok(*inner) {
                    diagnostics.push(dangling(*inner));
                }
            }
            ExprKind::Call { target, args } => {
                for child in args.iter().copied().filter(|c| !expr_ok(*c)) {
                    diagnostics.push(dangling(child));
                }
                let (expected, display) = match target {
                    CallTarget::Method(r) => (r.param_count, r.display_name(interner)),
                    CallTarget::Host(sig) => (sig.params.len(), sig.display_name(interner)),
                };
                if expected != args.len() {
                    diagnostics.push(
                        Diagnostic::error(
                            ErrorCode::E9004,
                            format!(
                                "call to `{display}` passes {} arguments, expected {expected}",
                                args.len()
                            ),
                        )
                        .with_span(expr.span),
                    );
                }
            }
            ExprKind::Literal(_) | ExprKind::Ident(_) | ExprKind::Unsupported { .. } => {}
        }
    }

    for (id, stmt) in arena.stmts() {
        let mut exprs: Vec<ExprId> = Vec::new();
        let mut stmts: Vec<StmtId> = Vec::new();
        match &stmt.kind {
            StmtKind::Expr(e) => exprs.push(*e),
            StmtKind::Let { init, .. } => exprs.extend(*init),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                exprs.push(*cond);
                stmts.push(*then_branch);
                stmts.extend(*else_branch);
            }
            StmtKind::While { cond, body } => {
                exprs.push(*cond);
                stmts.push(*body);
            }
            StmtKind::Block(children) => stmts.extend(children.iter().copied()),
            StmtKind::Return(value) => exprs.extend(*value),
            StmtKind::Unsupported { .. } => {}
        }
        let missing = exprs
            .into_iter()
            .filter(|e| !expr_ok(*e))
            .map(|e| format!("expression {}", e.index()))
            .chain(
                stmts
                    .into_iter()
                    .filter(|s| !stmt_ok(*s))
                    .map(|s| format!("statement {}", s.index())),
            );
        for what in missing {
            diagnostics.push(
                Diagnostic::error(
                    ErrorCode::E9001,
                    format!("statement {} refers to missing {what}", id.index()),
                )
                .with_span(stmt.span),
            );
        }
    }

    diagnostics
}
