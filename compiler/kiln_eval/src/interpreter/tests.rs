use kiln_ir::{BinaryOp, ProgramBuilder, Type};
use pretty_assertions::assert_eq;

use crate::errors::{type_mismatch, EvalErrorKind, EvalResult};
use crate::tests::support::{main_sig, method, print_str, Harness};
use crate::{buffer_handler, OperatorTable, Session, Value};

fn less(left: Value, right: Value) -> EvalResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Value::bool(a < b)),
        (other, _) => Err(type_mismatch("int", other.type_name())),
    }
}

/// `static int Main() { return <expr>; }` with the expression built by `f`.
fn returning(h: &Harness, f: impl FnOnce(&mut ProgramBuilder) -> kiln_ir::ExprId) {
    let mut b = h.builder();
    let value = f(&mut b);
    let body = b.ret(Some(value));
    b.declare(main_sig(&b).returns(Type::Int), body);
    h.install(b.finish());
}

fn error_kind<T>(result: EvalResult<T>) -> Option<EvalErrorKind> {
    result.err().map(|e| e.kind)
}

#[test]
fn test_if_equal_prints_once() {
    let mut h = Harness::new();
    let mut b = h.builder();
    let four = b.int(4);
    let one = b.int(1);
    let three = b.int(3);
    let sum = b.binary(BinaryOp::Add, one, three, Type::Int);
    let cond = b.binary(BinaryOp::Equal, four, sum, Type::Bool);
    let then = print_str(&mut b, "equal");
    let if_ = b.if_(cond, then, None);
    let body = b.block(vec![if_]);
    b.declare(main_sig(&b), body);
    h.install(b.finish());

    assert_eq!(h.session.run(), Ok(None));
    assert_eq!(h.lines(), vec!["equal"]);
    assert!(h.session.stack().is_empty());
}

#[test]
fn test_else_branch() {
    let mut h = Harness::new();
    let mut b = h.builder();
    let one = b.int(1);
    let two = b.int(2);
    let cond = b.binary(BinaryOp::Equal, one, two, Type::Bool);
    let then = print_str(&mut b, "then");
    let otherwise = print_str(&mut b, "else");
    let if_ = b.if_(cond, then, Some(otherwise));
    b.declare(main_sig(&b), if_);
    h.install(b.finish());

    assert_eq!(h.session.run(), Ok(None));
    assert_eq!(h.lines(), vec!["else"]);
}

#[test]
fn test_let_binds_in_frame() {
    let mut h = Harness::new();
    let mut b = h.builder();
    let one = b.int(1);
    let three = b.int(3);
    let sum = b.binary(BinaryOp::Add, one, three, Type::Int);
    let decl = b.let_("x", Some(sum));
    let x = b.ident("x", Type::Int);
    let ret = b.ret(Some(x));
    let body = b.block(vec![decl, ret]);
    b.declare(main_sig(&b).returns(Type::Int), body);
    h.install(b.finish());

    assert_eq!(h.session.run(), Ok(Some(Value::int(4))));
}

#[test]
fn test_missing_initializer() {
    let mut h = Harness::new();
    let mut b = h.builder();
    let decl = b.let_("x", None);
    b.declare(main_sig(&b), decl);
    h.install(b.finish());

    assert_eq!(
        error_kind(h.session.run()),
        Some(EvalErrorKind::MissingInitializer { name: "x".into() })
    );
}

#[test]
fn test_unbound_name() {
    let mut h = Harness::new();
    returning(&h, |b| b.ident("y", Type::Int));
    assert_eq!(
        error_kind(h.session.run()),
        Some(EvalErrorKind::UnboundName { name: "y".into() })
    );
    assert!(h.session.stack().is_empty());
}

#[test]
fn test_unsupported_operator() {
    let mut h = Harness::new();
    returning(&h, |b| {
        let l = b.int(2);
        let r = b.int(3);
        b.binary(BinaryOp::Multiply, l, r, Type::Int)
    });
    let err = h.session.run().err();
    assert_eq!(
        err.as_ref().map(|e| e.kind.clone()),
        Some(EvalErrorKind::UnsupportedOperator {
            op: BinaryOp::Multiply
        })
    );
    assert!(err.is_some_and(|e| e.is_defect()));
}

#[test]
fn test_unsupported_constructs() {
    let mut h = Harness::new();
    let mut b = h.builder();
    let stmt = b.unsupported_stmt("for");
    b.declare(main_sig(&b), stmt);
    h.install(b.finish());
    let err = h.session.run().err();
    assert_eq!(
        err.as_ref().map(|e| e.kind.clone()),
        Some(EvalErrorKind::UnsupportedConstruct {
            construct: "for".into()
        })
    );
    assert!(err.is_some_and(|e| e.is_defect()));

    returning(&h, |b| b.unsupported_expr("lambda", Type::Int));
    assert_eq!(
        error_kind(h.session.run()),
        Some(EvalErrorKind::UnsupportedConstruct {
            construct: "lambda".into()
        })
    );
}

#[test]
fn test_expression_statement_discards_value() {
    let mut h = Harness::new();
    let mut b = h.builder();
    let greeting = b.str("Hello");
    let ret = b.ret(Some(greeting));
    let sig = method(&b, "Greeting").returns(Type::Str);
    let greeting_ref = sig.reference();
    b.declare(sig, ret);

    let call = b.call(greeting_ref, vec![], Type::Str);
    let stmt = b.expr_stmt(call);
    b.declare(main_sig(&b), stmt);
    h.install(b.finish());

    assert_eq!(h.session.run(), Ok(None));
    assert_eq!(h.session.stack().depth(), 0);
}

#[test]
fn test_arguments_bind_in_declaration_order() {
    let mut h = Harness::new();
    let mut b = h.builder();
    let second = method(&b, "Second")
        .param(b.name("a"), Type::Int)
        .param(b.name("b"), Type::Int)
        .returns(Type::Int);
    let second_ref = second.reference();
    let b_ident = b.ident("b", Type::Int);
    let ret = b.ret(Some(b_ident));
    b.declare(second, ret);

    let one = b.int(1);
    let two = b.int(2);
    let call = b.call(second_ref, vec![one, two], Type::Int);
    let ret = b.ret(Some(call));
    b.declare(main_sig(&b).returns(Type::Int), ret);
    h.install(b.finish());

    assert_eq!(h.session.run(), Ok(Some(Value::int(2))));
}

#[test]
fn test_while_with_registered_operator() {
    let print = buffer_handler();
    let mut operators = OperatorTable::new();
    operators.register(BinaryOp::Less, less);
    let mut session = Session::builder()
        .print_handler(print.clone())
        .operators(operators)
        .build();

    let mut b = ProgramBuilder::new(session.interner().clone());
    let zero = b.int(0);
    let init = b.let_("i", Some(zero));

    let i = b.ident("i", Type::Int);
    let three = b.int(3);
    let cond = b.binary(BinaryOp::Less, i, three, Type::Bool);
    let tick = print_str(&mut b, "tick");
    let i = b.ident("i", Type::Int);
    let one = b.int(1);
    let next = b.binary(BinaryOp::Add, i, one, Type::Int);
    let step = b.let_("i", Some(next));
    let loop_body = b.block(vec![tick, step]);
    let loop_ = b.while_(cond, loop_body);

    let i = b.ident("i", Type::Int);
    let ret = b.ret(Some(i));
    let body = b.block(vec![init, loop_, ret]);
    b.declare(main_sig(&b).returns(Type::Int), body);
    assert!(session.install_snapshot(b.finish()).is_installed());

    assert_eq!(session.run(), Ok(Some(Value::int(3))));
    assert_eq!(print.lines(), vec!["tick", "tick", "tick"]);
}

#[test]
fn test_return_leaves_loop() {
    let mut h = Harness::new();
    let mut b = h.builder();
    let cond = b.bool(true);
    let seven = b.int(7);
    let ret = b.ret(Some(seven));
    let after = print_str(&mut b, "unreachable");
    let loop_body = b.block(vec![ret, after]);
    let loop_ = b.while_(cond, loop_body);
    b.declare(main_sig(&b).returns(Type::Int), loop_);
    h.install(b.finish());

    assert_eq!(h.session.run(), Ok(Some(Value::int(7))));
    assert!(h.lines().is_empty());
}

#[test]
fn test_condition_must_be_bool() {
    let mut h = Harness::new();
    let mut b = h.builder();
    let cond = b.int(1);
    let then = print_str(&mut b, "x");
    let if_ = b.if_(cond, then, None);
    b.declare(main_sig(&b), if_);
    h.install(b.finish());

    assert_eq!(
        error_kind(h.session.run()),
        Some(EvalErrorKind::TypeMismatch {
            expected: "bool".into(),
            got: "int".into()
        })
    );
}

#[test]
fn test_error_restores_stack_and_records_backtrace() {
    let mut h = Harness::new();
    let mut b = h.builder();
    let broken = method(&b, "Broken").returns(Type::Int);
    let broken_ref = broken.reference();
    let missing = b.ident("missing", Type::Int);
    let ret = b.ret(Some(missing));
    b.declare(broken, ret);

    let one = b.int(1);
    let call = b.call(broken_ref, vec![], Type::Int);
    let sum = b.binary(BinaryOp::Add, one, call, Type::Int);
    let ret = b.ret(Some(sum));
    b.declare(main_sig(&b).returns(Type::Int), ret);
    h.install(b.finish());

    let err = h.session.run().err();
    assert_eq!(
        err.as_ref().and_then(|e| e.trace.as_ref()).map(|t| t.frames().to_vec()),
        Some(vec!["Program.Broken/0".to_string(), "Program.Main/0".to_string()])
    );
    assert_eq!(h.session.stack().depth(), 0);
    assert_eq!(h.session.call_depth(), 0);
}

#[test]
fn test_recursion_limit() {
    let interner = kiln_ir::SharedInterner::new();
    let mut session = Session::builder()
        .interner(interner.clone())
        .print_handler(buffer_handler())
        .max_call_depth(Some(16))
        .build();

    let mut b = ProgramBuilder::new(interner);
    let sig = main_sig(&b);
    let main_ref = sig.reference();
    let call = b.call(main_ref, vec![], Type::Void);
    let body = b.expr_stmt(call);
    b.declare(sig, body);
    assert!(session.install_snapshot(b.finish()).is_installed());

    let err = session.run().err();
    assert_eq!(
        err.as_ref().map(|e| e.kind.clone()),
        Some(EvalErrorKind::StackOverflow { depth: 16 })
    );
    assert_eq!(err.and_then(|e| e.trace).map(|t| t.frames().len()), Some(16));
    assert_eq!(session.call_depth(), 0);
}
