use thiserror::Error;

/// Problems with the caller's query, caught before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Table name cannot be empty")]
    EmptyTable,

    #[error("Column '{0}' is requested more than once")]
    DuplicateColumn(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Malformed filter '{filter}': {reason}")]
    MalformedFilter { filter: String, reason: String },
}

impl QueryError {
    pub(crate) fn malformed(filter: &str, reason: impl Into<String>) -> Self {
        QueryError::MalformedFilter {
            filter: filter.to_string(),
            reason: reason.into(),
        }
    }
}
