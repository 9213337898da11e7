use super::*;

fn name(s: &str) -> Arc<str> {
    Arc::from(s)
}

#[test]
fn test_define_and_lookup() {
    let env = Env::new();
    env.define(name("x"), Value::Number(1.0), Mutability::Mutable);
    assert_eq!(env.lookup("x").and_then(|v| v.as_number()), Some(1.0));
    assert!(env.lookup("y").is_none());
}

#[test]
fn test_child_sees_parent_and_shadows() {
    let parent = Env::new();
    parent.define(name("x"), Value::Number(1.0), Mutability::Mutable);
    let child = parent.child();
    assert_eq!(child.lookup("x").and_then(|v| v.as_number()), Some(1.0));

    child.define(name("x"), Value::from("inner"), Mutability::Mutable);
    assert_eq!(child.lookup("x").as_ref().and_then(Value::as_str), Some("inner"));
    assert_eq!(parent.lookup("x").and_then(|v| v.as_number()), Some(1.0));
}

#[test]
fn test_assign_walks_to_defining_scope() {
    let parent = Env::new();
    parent.define(name("count"), Value::Number(0.0), Mutability::Mutable);
    let child = parent.child().child();
    assert_eq!(child.assign("count", Value::Number(5.0)), Ok(()));
    assert_eq!(parent.lookup("count").and_then(|v| v.as_number()), Some(5.0));
}

#[test]
fn test_assign_to_const_fails() {
    let env = Env::new();
    env.define(name("k"), Value::Number(1.0), Mutability::Immutable);
    assert_eq!(env.assign("k", Value::Number(2.0)), Err(AssignError::Immutable));
    assert_eq!(env.lookup("k").and_then(|v| v.as_number()), Some(1.0));
}

#[test]
fn test_assign_to_undeclared_fails() {
    let env = Env::new().child();
    assert_eq!(env.assign("ghost", Value::Null), Err(AssignError::Undefined));
}

#[test]
fn test_closure_capture_sees_later_writes() {
    let env = Env::new();
    env.define(name("x"), Value::Number(1.0), Mutability::Mutable);
    let captured = env.clone();
    env.assign("x", Value::Number(2.0)).ok();
    assert_eq!(captured.lookup("x").and_then(|v| v.as_number()), Some(2.0));
}

#[test]
fn test_depth() {
    let root = Env::new();
    assert_eq!(root.depth(), 1);
    assert_eq!(root.child().child().depth(), 3);
    assert!(!root.child().has_own("x"));
}
