use chrono::DateTime;

use crate::response::Value;

#[test]
fn test_display() {
    assert_eq!(Value::Null.to_string(), "");
    assert_eq!(Value::from("x").to_string(), "x");
    assert_eq!(Value::Int(7).to_string(), "7");
    assert_eq!(Value::List(vec!["a".into(), "b".into()]).to_string(), "a,b");
    let time = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    assert_eq!(Value::Time(time).to_string(), "2023-11-14 22:13:20");
    let invalid = Value::Invalid {
        raw: "abc".into(),
        reason: "not an integer".into(),
    };
    assert_eq!(invalid.to_string(), "abc");
    assert!(invalid.is_invalid());
}

#[test]
fn test_serializes_untagged() {
    let row = vec![
        Value::Null,
        Value::from("web01"),
        Value::Int(2),
        Value::Float(0.5),
        Value::Bool(true),
        Value::List(vec!["a".into()]),
    ];
    let json = serde_json::to_string(&row).unwrap();
    assert_eq!(json, r#"[null,"web01",2,0.5,true,["a"]]"#);
}

#[test]
fn test_accessors() {
    assert_eq!(Value::Int(3).as_i64(), Some(3));
    assert_eq!(Value::Int(3).as_f64(), Some(3.0));
    assert_eq!(Value::from("s").as_str(), Some("s"));
    assert_eq!(Value::from("s").as_i64(), None);
    assert!(Value::Null.is_null());
}
