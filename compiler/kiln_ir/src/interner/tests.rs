use super::*;

#[test]
fn test_intern_and_lookup() {
    let interner = StringInterner::new();

    let hello = interner.intern("hello");
    let world = interner.intern("world");
    let hello2 = interner.intern("hello");

    assert_eq!(hello, hello2);
    assert_ne!(hello, world);

    assert_eq!(interner.lookup(hello), "hello");
    assert_eq!(interner.lookup(world), "world");
}

#[test]
fn test_empty_string() {
    let interner = StringInterner::new();
    let empty = interner.intern("");
    assert_eq!(empty, Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn test_get_does_not_insert() {
    let interner = StringInterner::new();
    assert_eq!(interner.get("missing"), None);
    assert_eq!(interner.len(), 1);

    let name = interner.intern("present");
    assert_eq!(interner.get("present"), Some(name));
}

#[test]
fn test_lookup_foreign_name_is_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.lookup(Name::from_raw(999)), "");
}

#[test]
fn test_shared_interner() {
    let interner = SharedInterner::new();
    let interner2 = interner.clone();

    let name1 = interner.intern("shared");
    let name2 = interner2.intern("shared");

    assert_eq!(name1, name2);
}

#[test]
fn test_concurrent_interning_agrees() {
    let interner = SharedInterner::new();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let interner = interner.clone();
            std::thread::spawn(move || interner.intern("Program"))
        })
        .collect();

    let names: Vec<Name> = handles
        .into_iter()
        .map(|h| h.join().unwrap_or(Name::EMPTY))
        .collect();
    assert!(names.iter().all(|n| *n == names[0]));
    assert_ne!(names[0], Name::EMPTY);
}

#[test]
fn test_shared_clones_are_the_same_interner() {
    let interner = SharedInterner::new();
    let clone = interner.clone();
    assert!(interner.ptr_eq(&clone));
    assert!(!interner.ptr_eq(&SharedInterner::new()));
}
