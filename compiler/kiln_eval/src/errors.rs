//! Evaluation errors.
//!
//! `EvalErrorKind` carries the structured category; `EvalError` adds the
//! backtrace of interpreted methods active when the error was raised. Factory
//! functions are the public way to build errors so messages stay in one place.
//!
//! A rejected snapshot is reported as an `InstallOutcome`, never as an
//! evaluation error.

use std::fmt;

use kiln_ir::BinaryOp;

/// Result of an evaluation step.
pub type EvalResult<T = ()> = Result<T, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("operand stack underflow")]
    StackUnderflow,

    #[error("operand stack holds {actual} values after the call, expected {expected}")]
    StackImbalance { expected: usize, actual: usize },

    #[error("name `{name}` is not bound in the current frame")]
    UnboundName { name: String },

    #[error("variable `{name}` is declared without an initializer")]
    MissingInitializer { name: String },

    #[error("method `{method}` no longer exists in the current program (removed or renamed)")]
    UnresolvedMethod { method: String },

    #[error("host operation `{operation}` not found: {reason}")]
    HostOperationNotFound { operation: String, reason: String },

    #[error("host operation failed: {message}")]
    HostFault { message: String },

    #[error("unsupported operator `{op}`")]
    UnsupportedOperator { op: BinaryOp },

    #[error("unsupported construct `{construct}`")]
    UnsupportedConstruct { construct: String },

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("integer overflow in {operation}")]
    IntegerOverflow { operation: String },

    #[error("`{method}` takes {expected} arguments, got {got}")]
    ArityMismatch {
        method: String,
        expected: usize,
        got: usize,
    },

    #[error("maximum call depth of {depth} exceeded")]
    StackOverflow { depth: usize },

    #[error("expected exactly one entry point, found {found}")]
    EntryPoint { found: usize },

    #[error("no program snapshot has been installed")]
    NoSnapshot,

    #[error("node {node} is not part of the executing snapshot")]
    InvalidNode { node: String },

    #[error("evaluation cancelled")]
    Cancelled,
}

impl EvalErrorKind {
    /// True for failures that indicate an engine or front-end defect rather
    /// than a problem with the running program.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            EvalErrorKind::StackUnderflow
                | EvalErrorKind::StackImbalance { .. }
                | EvalErrorKind::UnsupportedOperator { .. }
                | EvalErrorKind::UnsupportedConstruct { .. }
                | EvalErrorKind::InvalidNode { .. }
        )
    }
}

/// Interpreted methods active when an error was raised, innermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<String>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<String>) -> Self {
        EvalBacktrace { frames }
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "interpreter backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            writeln!(f, "  {i}: {frame}")?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub trace: Option<EvalBacktrace>,
}

impl EvalError {
    /// Attach a backtrace unless one is already present.
    ///
    /// The innermost call attaches first, so the most precise trace wins as
    /// the error unwinds.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        if self.trace.is_none() && !backtrace.is_empty() {
            self.trace = Some(backtrace);
        }
        self
    }

    #[inline]
    pub fn is_defect(&self) -> bool {
        self.kind.is_defect()
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            trace: None,
        }
    }
}

// Stack errors

pub fn stack_underflow() -> EvalError {
    EvalErrorKind::StackUnderflow.into()
}

pub fn stack_imbalance(expected: usize, actual: usize) -> EvalError {
    EvalErrorKind::StackImbalance { expected, actual }.into()
}

// Name errors

pub fn unbound_name(name: &str) -> EvalError {
    EvalErrorKind::UnboundName {
        name: name.to_string(),
    }
    .into()
}

pub fn missing_initializer(name: &str) -> EvalError {
    EvalErrorKind::MissingInitializer {
        name: name.to_string(),
    }
    .into()
}

// Call errors

pub fn unresolved_method(method: String) -> EvalError {
    EvalErrorKind::UnresolvedMethod { method }.into()
}

pub fn host_operation_not_found(operation: String, reason: &str) -> EvalError {
    EvalErrorKind::HostOperationNotFound {
        operation,
        reason: reason.to_string(),
    }
    .into()
}

pub fn host_fault(message: impl Into<String>) -> EvalError {
    EvalErrorKind::HostFault {
        message: message.into(),
    }
    .into()
}

pub fn arity_mismatch(method: String, expected: usize, got: usize) -> EvalError {
    EvalErrorKind::ArityMismatch {
        method,
        expected,
        got,
    }
    .into()
}

pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalErrorKind::StackOverflow { depth }.into()
}

pub fn entry_point_count(found: usize) -> EvalError {
    EvalErrorKind::EntryPoint { found }.into()
}

pub fn no_snapshot() -> EvalError {
    EvalErrorKind::NoSnapshot.into()
}

pub fn cancelled() -> EvalError {
    EvalErrorKind::Cancelled.into()
}

// Construct errors

pub fn unsupported_operator(op: BinaryOp) -> EvalError {
    EvalErrorKind::UnsupportedOperator { op }.into()
}

pub fn unsupported_construct(construct: &str) -> EvalError {
    EvalErrorKind::UnsupportedConstruct {
        construct: construct.to_string(),
    }
    .into()
}

pub fn invalid_node(node: String) -> EvalError {
    EvalErrorKind::InvalidNode { node }.into()
}

// Type errors

pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    }
    .into()
}

pub fn integer_overflow(operation: &str) -> EvalError {
    EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    }
    .into()
}
