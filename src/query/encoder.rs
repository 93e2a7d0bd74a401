use tracing::trace;

use super::{Query, QueryError};

pub const OUTPUT_FORMAT: &str = "json";
pub const RESPONSE_HEADER: &str = "fixed16";

/// Renders the request text for `query`.
///
/// Line order is fixed: `GET`, `Columns:` (omitted for "all columns"),
/// filters in query order, `Stats:` lines, output format, response header,
/// then the blank line that ends the request.
pub fn encode_text(query: &Query) -> Result<String, QueryError> {
    query.validate()?;
    let filters = query.parsed_filters()?;

    let mut text = format!("GET {}\n", query.table.trim());
    if !query.columns.is_empty() {
        text.push_str("Columns: ");
        text.push_str(&query.columns.join(" "));
        text.push('\n');
    }
    for filter in &filters {
        text.push_str(&filter.wire_line());
        text.push('\n');
    }
    for stats in &query.stats {
        text.push_str("Stats: ");
        text.push_str(stats.trim());
        text.push('\n');
    }
    text.push_str(&format!("OutputFormat: {}\n", OUTPUT_FORMAT));
    text.push_str(&format!("ResponseHeader: {}\n", RESPONSE_HEADER));
    text.push('\n');

    trace!(target: "livestatus::encoder", table = %query.table, request = %text, "Encoded request");
    Ok(text)
}

pub fn encode(query: &Query) -> Result<Vec<u8>, QueryError> {
    encode_text(query).map(String::into_bytes)
}
