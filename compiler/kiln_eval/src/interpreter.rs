//! The execution engine.
//!
//! An [`Interpreter`] walks the body of one method activation. It borrows the
//! session (operand stack, frames, host catalog, operator table) and the
//! snapshot the method was resolved in; that snapshot stays fixed for the
//! whole activation even if a newer one is installed meanwhile.
//!
//! Every expression leaves exactly one value on the operand stack, except
//! those whose static type is `void`, which leave none. Statements leave the
//! stack as they found it, except `return`, which leaves the method's result.

use kiln_ir::{
    CallTarget, ExprId, ExprKind, Literal, MethodDecl, Snapshot, StmtId, StmtKind, Type,
};

use crate::errors::{
    cancelled, host_fault, invalid_node, missing_initializer, type_mismatch, unbound_name,
    unsupported_construct, EvalResult,
};
use crate::stack::ensure_sufficient_stack;
use crate::{Session, Value};

/// How a statement completed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Continue with the next statement.
    Normal,
    /// A `return` ran; the method is done.
    Return,
}

/// Tree-walking evaluator for one method activation.
pub struct Interpreter<'s> {
    session: &'s mut Session,
    snapshot: &'s Snapshot,
}

impl<'s> Interpreter<'s> {
    pub(crate) fn new(session: &'s mut Session, snapshot: &'s Snapshot) -> Self {
        Interpreter { session, snapshot }
    }

    /// The snapshot this activation executes.
    pub fn snapshot(&self) -> &Snapshot {
        self.snapshot
    }

    /// Execute `decl`'s body and apply the async result wrapping.
    ///
    /// Parameters must already be bound in the current frame.
    pub(crate) fn run_method(&mut self, decl: &MethodDecl) -> EvalResult<()> {
        self.exec_stmt(decl.body)?;
        if decl.is_async() {
            match &decl.return_ty {
                Type::Task(_) => {
                    let result = self.session.stack.pop()?;
                    self.session.stack.push(Value::ready(result));
                }
                Type::Signal => self.session.stack.push(Value::done()),
                _ => {}
            }
        }
        Ok(())
    }

    /// Execute a statement.
    pub fn exec_stmt(&mut self, id: StmtId) -> EvalResult<Flow> {
        if self.session.cancel.is_cancelled() {
            return Err(cancelled());
        }
        let snapshot = self.snapshot;
        let stmt = snapshot
            .stmt(id)
            .ok_or_else(|| invalid_node(format!("statement {}", id.index())))?;
        tracing::trace!(stmt = id.index(), "exec");

        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval_expr(*expr)?;
                if !self.expr_type(*expr)?.is_void() {
                    self.session.stack.pop()?;
                }
                Ok(Flow::Normal)
            }
            StmtKind::Let { name, init } => {
                let Some(init) = init else {
                    return Err(missing_initializer(self.session.interner.lookup(*name)));
                };
                self.eval_expr(*init)?;
                let value = self.session.stack.pop()?;
                self.session.frames.define(*name, value);
                Ok(Flow::Normal)
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.eval_expr(*cond)?;
                if self.session.stack.pop_bool()? {
                    self.exec_stmt(*then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(*else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            StmtKind::While { cond, body } => loop {
                if self.session.cancel.is_cancelled() {
                    return Err(cancelled());
                }
                self.eval_expr(*cond)?;
                if !self.session.stack.pop_bool()? {
                    return Ok(Flow::Normal);
                }
                if self.exec_stmt(*body)? == Flow::Return {
                    return Ok(Flow::Return);
                }
            },
            StmtKind::Block(stmts) => {
                for stmt in stmts {
                    if self.exec_stmt(*stmt)? == Flow::Return {
                        return Ok(Flow::Return);
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.eval_expr(*value)?;
                }
                Ok(Flow::Return)
            }
            StmtKind::Unsupported { construct } => Err(unsupported_construct(
                self.session.interner.lookup(*construct),
            )),
        }
    }

    /// Evaluate an expression, leaving its value (if non-void) on the stack.
    pub fn eval_expr(&mut self, id: ExprId) -> EvalResult<()> {
        ensure_sufficient_stack(|| self.eval_expr_inner(id))
    }

    fn eval_expr_inner(&mut self, id: ExprId) -> EvalResult<()> {
        let snapshot = self.snapshot;
        let expr = snapshot
            .expr(id)
            .ok_or_else(|| invalid_node(format!("expression {}", id.index())))?;

        match &expr.kind {
            ExprKind::Literal(literal) => {
                let value = match literal {
                    Literal::Int(n) => Value::int(*n),
                    Literal::Bool(b) => Value::bool(*b),
                    Literal::Str(s) => Value::string(self.session.interner.lookup(*s)),
                };
                self.session.stack.push(value);
            }
            ExprKind::Ident(name) => {
                let value = self
                    .session
                    .frames
                    .lookup(*name)
                    .ok_or_else(|| unbound_name(self.session.interner.lookup(*name)))?;
                self.session.stack.push(value);
            }
            ExprKind::Binary { op, left, right } => {
                self.eval_expr(*left)?;
                self.eval_expr(*right)?;
                let right = self.session.stack.pop()?;
                let left = self.session.stack.pop()?;
                let value = self.session.operators.apply(*op, left, right)?;
                self.session.stack.push(value);
            }
            ExprKind::Call { target, args } => {
                for arg in args {
                    self.eval_expr(*arg)?;
                }
                match target {
                    CallTarget::Host(signature) => {
                        let session = &mut *self.session;
                        session.hosts.dispatch(signature, &mut session.stack)?;
                    }
                    CallTarget::Method(method) => self.session.call(method)?,
                }
            }
            ExprKind::Await(inner) => {
                self.eval_expr(*inner)?;
                match self.session.stack.pop()? {
                    Value::Future(pending) => {
                        let value = pending.wait().map_err(host_fault)?;
                        self.session.stack.push(value);
                    }
                    Value::Signal(pending) => {
                        pending.wait().map_err(host_fault)?;
                    }
                    Value::Yield => std::thread::yield_now(),
                    other => return Err(type_mismatch("awaitable", other.type_name())),
                }
            }
            ExprKind::Unsupported { construct } => {
                return Err(unsupported_construct(
                    self.session.interner.lookup(*construct),
                ));
            }
        }
        Ok(())
    }

    fn expr_type(&self, id: ExprId) -> EvalResult<&'s Type> {
        let snapshot = self.snapshot;
        snapshot
            .expr(id)
            .map(|e| &e.ty)
            .ok_or_else(|| invalid_node(format!("expression {}", id.index())))
    }
}

#[cfg(test)]
mod tests;
