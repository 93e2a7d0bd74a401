use crate::query::{FilterExpr, FilterOp, Query};

/// Meta table listing every column of every table with its type.
pub const SCHEMA_TABLE: &str = "columns";

/// Builds the query that asks the `columns` table for the types of
/// `columns` in `table`. With no columns, every column of the table is listed.
pub fn schema_query(table: &str, columns: &[String]) -> Query {
    let mut query = Query::new(SCHEMA_TABLE)
        .with_columns(["name", "type"])
        .with_filter_expr(FilterExpr::compare("table", FilterOp::Eq, table))
        .omit_monitor_column(true);

    for column in columns {
        query = query.with_filter_expr(FilterExpr::compare("name", FilterOp::Eq, column.as_str()));
    }
    if columns.len() > 1 {
        query = query.with_filter_expr(FilterExpr::Or(columns.len()));
    }
    query
}
