use crate::query::{FilterExpr, FilterOp, QueryError};

#[test]
fn test_parse_simple_comparison() {
    let expr = FilterExpr::parse("state = 0").expect("valid filter");
    assert_eq!(expr, FilterExpr::compare("state", FilterOp::Eq, "0"));
    assert_eq!(expr.wire_line(), "Filter: state = 0");
}

#[test]
fn test_parse_accepts_filter_prefix() {
    let expr = FilterExpr::parse("Filter: host_name ~~ web").expect("valid filter");
    assert_eq!(expr, FilterExpr::compare("host_name", FilterOp::IMatch, "web"));
}

#[test]
fn test_value_keeps_inner_spaces() {
    let expr = FilterExpr::parse("plugin_output ~ CRITICAL - disk full").expect("valid filter");
    assert_eq!(
        expr,
        FilterExpr::compare("plugin_output", FilterOp::Match, "CRITICAL - disk full")
    );
}

#[test]
fn test_empty_value_is_allowed() {
    let expr = FilterExpr::parse("contacts >=").expect("valid filter");
    assert_eq!(expr, FilterExpr::compare("contacts", FilterOp::Ge, ""));
    assert_eq!(expr.to_string(), "contacts >=");
}

#[test]
fn test_every_operator_round_trips_through_display() {
    for token in [
        "=", "!=", "<", "<=", ">", ">=", "~", "!~", "=~", "!=~", "~~", "!~~",
    ] {
        let text = format!("name {} x", token);
        let expr = FilterExpr::parse(&text).expect("operator should parse");
        assert_eq!(expr.to_string(), text);
    }
}

#[test]
fn test_combinators() {
    assert_eq!(FilterExpr::parse("Or: 2").unwrap(), FilterExpr::Or(2));
    assert_eq!(FilterExpr::parse("And: 3").unwrap(), FilterExpr::And(3));
    assert_eq!(FilterExpr::parse("Negate:").unwrap(), FilterExpr::Negate);
    assert_eq!(FilterExpr::Or(2).wire_line(), "Or: 2");
}

#[test]
fn test_malformed_filters_are_rejected() {
    for bad in [
        "",
        "state",
        "state == 0",
        "sta-te = 0",
        "Or: 0",
        "Or: many",
        "Negate: 1",
        "state = 0\nFilter: x = 1",
    ] {
        let err = FilterExpr::parse(bad).expect_err(bad);
        assert!(
            matches!(err, QueryError::MalformedFilter { .. }),
            "unexpected error for {:?}: {:?}",
            bad,
            err
        );
    }
}
