//! Bound syntax nodes.
//!
//! Nodes live in a [`NodeArena`](crate::NodeArena) and refer to each other by
//! index. The node kinds are a closed sum type over the subset of the language
//! the engine executes; anything else the front end lowers becomes an
//! `Unsupported` node so the engine can fail with a precise error instead of
//! silently skipping it.

use std::fmt;

use crate::{HostSignature, MethodRef, Name, Span, Type};

/// Index of an expression in its snapshot's arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a statement in its snapshot's arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(transparent)]
pub struct StmtId(u32);

impl StmtId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        StmtId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Literal constant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    /// Interned string contents.
    Str(Name),
}

impl Literal {
    /// Static type of this literal.
    pub fn ty(&self) -> Type {
        match self {
            Literal::Int(_) => Type::Int,
            Literal::Bool(_) => Type::Bool,
            Literal::Str(_) => Type::Str,
        }
    }
}

/// Binary operators the binder can produce.
///
/// Only some of them have an implementation by default; the engine's operator
/// table decides which ones actually execute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOp {
    /// Source spelling.
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Remainder => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// What an invocation calls.
///
/// The binder decides ownership: methods declared in the interpreted program
/// are `Method`, everything supplied by the host runtime is `Host`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallTarget {
    Method(MethodRef),
    Host(HostSignature),
}

/// Expression node kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    Literal(Literal),
    /// Reference to a parameter or local of the current method.
    Ident(Name),
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Call {
        target: CallTarget,
        args: Vec<ExprId>,
    },
    Await(ExprId),
    /// Construct outside the executable subset (e.g. `"lambda"`).
    Unsupported { construct: Name },
}

/// A bound expression with its static type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
    pub span: Span,
}

/// Statement node kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StmtKind {
    /// Expression evaluated for effect.
    Expr(ExprId),
    /// Local variable declaration. Redeclaring a name overwrites it.
    Let { name: Name, init: Option<ExprId> },
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    While { cond: ExprId, body: StmtId },
    Block(Vec<StmtId>),
    Return(Option<ExprId>),
    /// Construct outside the executable subset (e.g. `"for"`).
    Unsupported { construct: Name },
}

/// A bound statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}
