use super::*;
use pretty_assertions::assert_eq;

#[test]
fn display_of_scalars() {
    assert_eq!(Value::int(15).to_string(), "15");
    assert_eq!(Value::Float(2.0).to_string(), "2.0");
    assert_eq!(Value::text("hi").to_string(), "hi");
}

#[test]
fn containers_render_with_quoted_text() {
    let arr = Value::array(vec![Value::int(1), Value::text("a")]);
    assert_eq!(arr.to_string(), r#"[1, "a"]"#);

    let mut map = DictMap::new();
    map.insert("k".to_string(), Value::int(2));
    assert_eq!(Value::dict(map).to_string(), r#"{"k": 2}"#);
}

#[test]
fn struct_renders_fields_in_declaration_order() {
    let inst = StructInstance {
        type_name: "Point".to_string(),
        fields: vec![("y".to_string(), Value::int(2)), ("x".to_string(), Value::int(1))],
    };
    assert_eq!(Value::Struct(Shared::new(inst)).to_string(), "Point { y: 2, x: 1 }");
}

#[test]
fn cloning_shares_containers() {
    let a = Value::array(vec![]);
    let b = a.clone();
    if let Value::Array(items) = &b {
        items.write().push(Value::int(9));
    }
    assert_eq!(a.to_string(), "[9]");
}

#[test]
fn deep_copy_breaks_sharing() {
    let a = Value::array(vec![Value::int(1)]);
    let b = a.deep_copy();
    if let Value::Array(items) = &b {
        items.write().push(Value::int(2));
    }
    assert_eq!(a.to_string(), "[1]");
    assert_eq!(b.to_string(), "[1, 2]");
}

fn self_containing_array() -> Value {
    let a = Value::array(vec![Value::int(1)]);
    if let Value::Array(items) = &a {
        items.write().push(a.clone());
    }
    a
}

#[test]
fn deep_copy_keeps_cycles_inside_the_copy() {
    let a = self_containing_array();
    let b = a.deep_copy();
    let Value::Array(copy) = &b else {
        panic!("copy is not an array");
    };
    let inner = copy.read()[1].clone();
    let Value::Array(inner) = inner else {
        panic!("inner value is not an array");
    };
    assert!(inner.ptr_eq(copy));
    assert_eq!(b.to_string(), "[1, [...]]");
}

#[test]
fn cyclic_values_compare_without_looping() {
    let a = self_containing_array();
    let b = a.deep_copy();
    assert!(a == b);
    assert!(a != Value::array(vec![Value::int(1)]));
}

#[test]
fn mixed_numbers_compare_by_value() {
    assert_eq!(Value::int(2), Value::Float(2.0));
    assert_ne!(Value::int(2), Value::text("2"));
}

#[test]
fn truthiness() {
    assert!(!Value::int(0).is_truthy());
    assert!(Value::int(-1).is_truthy());
    assert!(!Value::text("").is_truthy());
    assert!(Value::array(vec![]).is_truthy());
}
