use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

#[test]
fn number_formatting() {
    assert_eq!(number_to_string(2.0), "2");
    assert_eq!(number_to_string(-0.0), "0");
    assert_eq!(number_to_string(1.5), "1.5");
    assert_eq!(number_to_string(f64::NAN), "NaN");
    assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    assert_eq!(number_to_string(1e21), "1e+21");
    assert_eq!(number_to_string(1e-7), "1e-7");
}

#[test]
fn string_to_number_conversions() {
    assert_eq!(Value::from("  42 ").to_number(), 42.0);
    assert_eq!(Value::from("").to_number(), 0.0);
    assert_eq!(Value::from("0x1F").to_number(), 31.0);
    assert_eq!(Value::from("-Infinity").to_number(), f64::NEG_INFINITY);
    assert!(Value::from("12px").to_number().is_nan());
    assert!(Value::Undefined.to_number().is_nan());
    assert_eq!(Value::Null.to_number(), 0.0);
}

#[test]
fn truthiness() {
    for falsy in [
        Value::Undefined,
        Value::Null,
        Value::Bool(false),
        Value::Number(0.0),
        Value::Number(f64::NAN),
        Value::from(""),
    ] {
        assert!(!falsy.is_truthy(), "{falsy:?} should be falsy");
    }
    for truthy in [
        Value::from("0"),
        Value::array(Vec::new()),
        Value::object(Vec::<(&str, Value)>::new()),
    ] {
        assert!(truthy.is_truthy(), "{truthy:?} should be truthy");
    }
}

#[test]
fn strict_equality_is_by_reference_for_containers() {
    let a = Value::array(vec![Value::Number(1.0)]);
    let b = Value::array(vec![Value::Number(1.0)]);
    assert!(a.strict_equals(&a.clone()));
    assert!(!a.strict_equals(&b));
    assert!(Value::from("x").strict_equals(&Value::from("x")));
    assert!(!Value::Null.strict_equals(&Value::Undefined));
}

#[test]
fn loose_equality_coerces() {
    assert!(Value::Null.loose_equals(&Value::Undefined));
    assert!(!Value::Null.loose_equals(&Value::Number(0.0)));
    assert!(Value::Number(1.0).loose_equals(&Value::from("1")));
    assert!(Value::Bool(true).loose_equals(&Value::Number(1.0)));
    assert!(Value::array(vec![Value::Number(7.0)]).loose_equals(&Value::from("7")));
}

#[test]
fn display_and_inspect_differ_for_containers() {
    let value = Value::array(vec![
        Value::from("a"),
        Value::Null,
        Value::object([("k", Value::Number(1.0))]),
    ]);
    assert_eq!(value.to_display(), "a,,[object Object]");
    assert_eq!(value.inspect(), r#"["a", null, { k: 1 }]"#);
}

#[test]
fn inspect_marks_cycles() {
    let object = Value::object([("name", Value::from("loop"))]);
    if let Value::Object(properties) = &object {
        properties.write().set(Arc::from("self"), object.clone());
    }
    assert_eq!(object.inspect(), r#"{ name: "loop", self: [Circular] }"#);
}

#[test]
fn properties_keep_insertion_order() {
    let mut properties = Properties::default();
    properties.set(Arc::from("b"), Value::Number(1.0));
    properties.set(Arc::from("a"), Value::Number(2.0));
    properties.set(Arc::from("b"), Value::Number(3.0));
    let keys: Vec<&str> = properties.keys().map(|k| &**k).collect();
    assert_eq!(keys, vec!["b", "a"]);
    assert_eq!(properties.get("b").and_then(Value::as_number), Some(3.0));
    assert_eq!(properties.remove("b").and_then(|v| v.as_number()), Some(3.0));
    assert_eq!(properties.len(), 1);
}

#[test]
fn error_values_render_name_and_message() {
    let error = ErrorValue {
        name: Arc::from("TypeError"),
        message: Arc::from("bad"),
        stack: Arc::from("TypeError: bad"),
    };
    assert_eq!(error.to_string(), "TypeError: bad");
    let bare = ErrorValue {
        message: Arc::from(""),
        ..error
    };
    assert_eq!(Value::Error(Arc::new(bare)).to_display(), "TypeError");
}

#[test]
fn type_of_every_variant() {
    assert_eq!(Value::Undefined.type_of(), "undefined");
    assert_eq!(Value::Null.type_of(), "object");
    assert_eq!(Value::Bool(true).type_of(), "boolean");
    assert_eq!(Value::Number(1.0).type_of(), "number");
    assert_eq!(Value::from("s").type_of(), "string");
    assert_eq!(
        Value::native("f", |_, _| Ok(Value::Undefined)).type_of(),
        "function"
    );
}

proptest! {
    #[test]
    fn integers_round_trip_through_strings(n in -1_000_000_000i64..1_000_000_000) {
        let text = number_to_string(n as f64);
        prop_assert_eq!(&text, &n.to_string());
        prop_assert_eq!(Value::string(text).to_number(), n as f64);
    }

    #[test]
    fn loose_equality_is_symmetric(a in -5i32..5, s in "-?[0-9]{1,2}") {
        let number = Value::Number(f64::from(a));
        let string = Value::string(s);
        prop_assert_eq!(number.loose_equals(&string), string.loose_equals(&number));
    }
}
