use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::encoder;
use super::{FilterExpr, QueryError};
use crate::postfilter::PostFilter;

/// How `time` columns are rendered when types are auto-detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    /// A UTC date-time value.
    #[default]
    DateTime,
    /// The raw epoch seconds as a float.
    Stamp,
}

/// What to fetch from a table and how to post-process it.
///
/// Built by the caller and cloned into the result set when a run starts, so
/// the copy held by a `ResultSet` can be changed afterwards (post-filters,
/// `omit_monitor_column`) to re-derive projections without touching the
/// network.
#[derive(Clone)]
pub struct Query {
    pub table: String,
    pub columns: Vec<String>,
    /// Filter lines in `field op value` form, or `Or: N` / `And: N` / `Negate:`.
    pub filters: Vec<String>,
    pub stats: Vec<String>,
    pub omit_monitor_column: bool,
    pub auto_detect_types: bool,
    pub time_format: TimeFormat,
    pub post_filters: Vec<Arc<dyn PostFilter>>,
}

impl Query {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            stats: Vec::new(),
            omit_monitor_column: false,
            auto_detect_types: false,
            time_format: TimeFormat::default(),
            post_filters: Vec::new(),
        }
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn with_filter_expr(mut self, filter: FilterExpr) -> Self {
        self.filters.push(filter.to_string());
        self
    }

    pub fn with_stats(mut self, stats: impl Into<String>) -> Self {
        self.stats.push(stats.into());
        self
    }

    pub fn with_post_filter(mut self, filter: impl PostFilter + 'static) -> Self {
        self.post_filters.push(Arc::new(filter));
        self
    }

    pub fn omit_monitor_column(mut self, omit: bool) -> Self {
        self.omit_monitor_column = omit;
        self
    }

    pub fn auto_detect_types(mut self, enabled: bool) -> Self {
        self.auto_detect_types = enabled;
        self
    }

    pub fn with_time_format(mut self, format: TimeFormat) -> Self {
        self.time_format = format;
        self
    }

    pub fn validate(&self) -> Result<(), QueryError> {
        if self.table.trim().is_empty() {
            return Err(QueryError::EmptyTable);
        }

        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if !seen.insert(column.as_str()) {
                return Err(QueryError::DuplicateColumn(column.clone()));
            }
        }

        if !self.stats.is_empty() && self.columns.len() > 1 {
            return Err(QueryError::InvalidQuery(
                "a stats query can group by at most one column".to_string(),
            ));
        }

        Ok(())
    }

    pub fn parsed_filters(&self) -> Result<Vec<FilterExpr>, QueryError> {
        self.filters.iter().map(|f| FilterExpr::parse(f)).collect()
    }

    /// Field names of the rows the server will send back, or `None` when the
    /// server is expected to lead with a header row (no columns, no stats).
    pub fn output_columns(&self) -> Option<Vec<String>> {
        if self.columns.is_empty() && self.stats.is_empty() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .chain(self.stats.iter())
                .cloned()
                .collect(),
        )
    }

    /// The request text this query encodes to.
    pub fn query_text(&self) -> Result<String, QueryError> {
        encoder::encode_text(self)
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let post_filters: Vec<&str> = self.post_filters.iter().map(|p| p.name()).collect();
        f.debug_struct("Query")
            .field("table", &self.table)
            .field("columns", &self.columns)
            .field("filters", &self.filters)
            .field("stats", &self.stats)
            .field("omit_monitor_column", &self.omit_monitor_column)
            .field("auto_detect_types", &self.auto_detect_types)
            .field("time_format", &self.time_format)
            .field("post_filters", &post_filters)
            .finish()
    }
}
