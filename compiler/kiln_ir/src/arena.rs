//! Flat storage for the bound nodes of one snapshot.

use crate::{Expr, ExprId, Stmt, StmtId};

/// Arena owning every expression and statement of a program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression and return its id.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` expressions.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let index = u32::try_from(self.exprs.len())
            .unwrap_or_else(|_| panic!("expression arena exceeded u32::MAX nodes"));
        self.exprs.push(expr);
        ExprId::new(index)
    }

    /// Allocate a statement and return its id.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` statements.
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let index = u32::try_from(self.stmts.len())
            .unwrap_or_else(|_| panic!("statement arena exceeded u32::MAX nodes"));
        self.stmts.push(stmt);
        StmtId::new(index)
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.index())
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> Option<&Stmt> {
        self.stmts.get(id.index())
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn exprs(&self) -> impl Iterator<Item = (ExprId, &Expr)> {
        self.exprs
            .iter()
            .enumerate()
            .filter_map(|(i, e)| u32::try_from(i).ok().map(|i| (ExprId::new(i), e)))
    }

    pub fn stmts(&self) -> impl Iterator<Item = (StmtId, &Stmt)> {
        self.stmts
            .iter()
            .enumerate()
            .filter_map(|(i, s)| u32::try_from(i).ok().map(|i| (StmtId::new(i), s)))
    }
}
