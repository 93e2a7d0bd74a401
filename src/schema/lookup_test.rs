use crate::query::encode_text;
use crate::schema::{ColumnKind, ColumnTypes, SchemaCache, schema_query};

#[test]
fn test_schema_query_for_several_columns() {
    let query = schema_query("hosts", &["name".to_string(), "state".to_string()]);
    let text = encode_text(&query).expect("schema query encodes");
    assert_eq!(
        text,
        "GET columns\n\
         Columns: name type\n\
         Filter: table = hosts\n\
         Filter: name = name\n\
         Filter: name = state\n\
         Or: 2\n\
         OutputFormat: json\n\
         ResponseHeader: fixed16\n\
         \n"
    );
    assert!(query.omit_monitor_column);
}

#[test]
fn test_schema_query_single_and_all_columns() {
    let single = encode_text(&schema_query("hosts", &["name".to_string()])).unwrap();
    assert!(!single.contains("Or:"));

    let all = encode_text(&schema_query("hosts", &[])).unwrap();
    assert!(all.contains("Filter: table = hosts\nOutputFormat"));
}

#[test]
fn test_column_types_first_row_wins() {
    let rows = vec![
        vec!["state".to_string(), "int".to_string()],
        vec!["name".to_string(), "string".to_string()],
        vec!["state".to_string(), "string".to_string()],
    ];
    let types = ColumnTypes::from_rows(&rows);
    assert_eq!(types.len(), 2);
    assert_eq!(types.get("state"), Some(&ColumnKind::Int));
    assert_eq!(types.get("name"), Some(&ColumnKind::String));
    assert_eq!(types.get("address"), None);
}

#[test]
fn test_schema_cache() {
    let mut cache = SchemaCache::default();
    assert!(!cache.contains("hosts"));
    let mut types = ColumnTypes::default();
    types.insert("state", ColumnKind::Int);
    cache.insert("hosts", types);
    assert!(cache.contains("hosts"));
    assert_eq!(
        cache.get("hosts").and_then(|t| t.get("state")),
        Some(&ColumnKind::Int)
    );
}
