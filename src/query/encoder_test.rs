use crate::query::{FilterExpr, FilterOp, Query, QueryError, encode, encode_text};

#[test]
fn test_encode_full_request() {
    let query = Query::new("services")
        .with_columns(["host_name", "description", "state"])
        .with_filter("state != 0")
        .with_filter("host_name = web01");

    let text = encode_text(&query).expect("encode");
    assert_eq!(
        text,
        "GET services\n\
         Columns: host_name description state\n\
         Filter: state != 0\n\
         Filter: host_name = web01\n\
         OutputFormat: json\n\
         ResponseHeader: fixed16\n\
         \n"
    );
}

#[test]
fn test_encode_without_columns_requests_all_columns() {
    let text = encode_text(&Query::new("hosts")).expect("encode");
    assert_eq!(
        text,
        "GET hosts\nOutputFormat: json\nResponseHeader: fixed16\n\n"
    );
    assert!(!text.contains("Columns:"));
}

#[test]
fn test_encode_passes_combinators_and_stats() {
    let query = Query::new("columns")
        .with_columns(["name", "type"])
        .with_filter("table = hosts")
        .with_filter_expr(FilterExpr::compare("name", FilterOp::Eq, "state"))
        .with_filter_expr(FilterExpr::compare("name", FilterOp::Eq, "address"))
        .with_filter("Or: 2");
    let text = encode_text(&query).expect("encode");
    assert!(text.contains("Filter: name = address\nOr: 2\n"));

    let stats = Query::new("services")
        .with_columns(["host_name"])
        .with_stats("state = 0")
        .with_stats("state = 2");
    let text = encode_text(&stats).expect("encode");
    assert!(text.contains("Columns: host_name\nStats: state = 0\nStats: state = 2\n"));
}

#[test]
fn test_encoding_is_deterministic() {
    let query = Query::new("hosts")
        .with_columns(["name", "state"])
        .with_filter("state > 0");

    let first = encode(&query).expect("first encode");
    let second = encode(&query).expect("second encode");
    assert_eq!(first, second);
    assert!(first.ends_with(b"\n\n"));
}

#[test]
fn test_malformed_filter_fails_at_encode_time() {
    let query = Query::new("hosts")
        .with_columns(["name"])
        .with_filter("state equals 0");
    let err = encode(&query).expect_err("bad filter");
    assert!(matches!(err, QueryError::MalformedFilter { .. }));
}

#[test]
fn test_empty_table_fails() {
    let err = encode(&Query::new("  ")).expect_err("empty table");
    assert_eq!(err, QueryError::EmptyTable);
}
