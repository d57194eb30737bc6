use super::*;
use kiln_ir::SharedInterner;

#[test]
fn test_frame_define_lookup() {
    let interner = SharedInterner::default();
    let x = interner.intern("x");

    let mut frame = Frame::new();
    frame.define(x, Value::int(42));
    assert_eq!(frame.lookup(x), Some(&Value::int(42)));
    assert_eq!(frame.len(), 1);
}

#[test]
fn test_redeclaration_overwrites() {
    let interner = SharedInterner::default();
    let x = interner.intern("x");

    let mut frames = CallFrames::new();
    frames.define(x, Value::int(1));
    frames.define(x, Value::string("two"));
    assert_eq!(frames.lookup(x), Some(Value::string("two")));
}

#[test]
fn test_callee_cannot_see_caller_locals() {
    let interner = SharedInterner::default();
    let x = interner.intern("x");

    let mut frames = CallFrames::new();
    frames.define(x, Value::int(1));

    frames.push_frame();
    assert_eq!(frames.lookup(x), None);
    frames.define(x, Value::int(2));
    assert_eq!(frames.lookup(x), Some(Value::int(2)));

    frames.pop_frame();
    assert_eq!(frames.lookup(x), Some(Value::int(1)));
}

#[test]
fn test_root_frame_survives_pop() {
    let mut frames = CallFrames::new();
    frames.pop_frame();
    frames.pop_frame();
    assert_eq!(frames.depth(), 1);
}
