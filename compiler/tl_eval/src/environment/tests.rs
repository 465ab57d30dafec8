use super::*;
use pretty_assertions::assert_eq;

#[test]
fn define_replaces_existing_binding() {
    let mut frame = Frame::default();
    frame.define("x", Value::int(1));
    frame.define("x", Value::int(2));
    assert_eq!(frame.get("x"), Some(&Value::int(2)));
    assert_eq!(frame.len(), 1);
}

#[test]
fn sorted_orders_by_name() {
    let mut frame = Frame::default();
    frame.define("b", Value::int(2));
    frame.define("a", Value::int(1));
    let names: Vec<&str> = frame.sorted().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn fill_from_keeps_own_bindings() {
    let mut inner = Frame::default();
    inner.define("x", Value::int(1));
    let mut outer = Frame::default();
    outer.define("x", Value::int(9));
    outer.define("y", Value::int(2));

    inner.fill_from(&outer);
    assert_eq!(inner.get("x"), Some(&Value::int(1)));
    assert_eq!(inner.get("y"), Some(&Value::int(2)));
}

#[test]
fn deep_copy_detaches_containers() {
    let mut frame = Frame::default();
    let items = Value::array(vec![Value::int(1)]);
    frame.define("a", items.clone());

    let copy = frame.deep_copy();
    if let Value::Array(shared) = &items {
        shared.write().push(Value::int(2));
    }
    assert_eq!(copy.get("a"), Some(&Value::array(vec![Value::int(1)])));
    assert_eq!(frame.get("a"), Some(&Value::array(vec![Value::int(1), Value::int(2)])));
}

#[test]
fn remove_and_contains() {
    let mut frame = Frame::new(Link::Enclosing);
    frame.define("x", Value::int(1));
    assert!(frame.contains("x"));
    assert_eq!(frame.remove("x"), Some(Value::int(1)));
    assert!(frame.is_empty());
}
