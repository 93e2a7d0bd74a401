use indexmap::IndexMap;
use tracing::debug;

use crate::client::ClientError;
use crate::endpoint::EndpointFailure;
use crate::postfilter::{PostFilterError, apply_row};
use crate::query::Query;
use crate::response::Value;
use crate::schema::TypeConversionError;

/// Name of the injected identity column.
pub const MONITOR_COLUMN: &str = "monitor";

/// Converted rows from one endpoint, before post-filters.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRows {
    pub endpoint: String,
    pub rows: Vec<Vec<Value>>,
}

/// Merged result of one run.
///
/// Stores converted rows per endpoint. Post-filters and the identity column
/// are applied when a projection is requested, using the query as it is at
/// that moment, so changing `query_mut()` re-shapes the output without
/// another round-trip.
#[derive(Debug)]
pub struct ResultSet {
    query: Query,
    columns: Vec<String>,
    batches: Vec<EndpointRows>,
    failures: Vec<EndpointFailure>,
    conversion_errors: Vec<TypeConversionError>,
}

impl ResultSet {
    pub fn new(
        query: Query,
        columns: Vec<String>,
        batches: Vec<EndpointRows>,
        failures: Vec<EndpointFailure>,
        conversion_errors: Vec<TypeConversionError>,
    ) -> Self {
        Self {
            query,
            columns,
            batches,
            failures,
            conversion_errors,
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut Query {
        &mut self.query
    }

    /// Data columns, without the identity column.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Names matching each projected row, identity column first unless omitted.
    pub fn field_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.columns.len() + 1);
        if !self.query.omit_monitor_column {
            names.push(MONITOR_COLUMN.to_string());
        }
        names.extend(self.columns.iter().cloned());
        names
    }

    /// Rows as ordered values.
    pub fn rows(&self) -> Result<Vec<Vec<Value>>, PostFilterError> {
        let mut out = Vec::with_capacity(self.len());
        for batch in &self.batches {
            for row in &batch.rows {
                let filtered = apply_row(&self.query.post_filters, row)?;
                if self.query.omit_monitor_column {
                    out.push(filtered);
                } else {
                    let mut tagged = Vec::with_capacity(filtered.len() + 1);
                    tagged.push(Value::Str(batch.endpoint.clone()));
                    tagged.extend(filtered);
                    out.push(tagged);
                }
            }
        }
        Ok(out)
    }

    /// Rows as field name to value maps, in column order.
    pub fn records(&self) -> Result<Vec<IndexMap<String, Value>>, PostFilterError> {
        let names = self.field_names();
        Ok(self
            .rows()?
            .into_iter()
            .map(|row| names.iter().cloned().zip(row).collect())
            .collect())
    }

    pub fn to_json(&self) -> Result<String, ClientError> {
        Ok(serde_json::to_string(&self.records()?)?)
    }

    pub fn len(&self) -> usize {
        self.batches.iter().map(|b| b.rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Endpoints that contributed rows, in merge order.
    pub fn endpoints(&self) -> impl Iterator<Item = &str> {
        self.batches.iter().map(|b| b.endpoint.as_str())
    }

    pub fn batches(&self) -> &[EndpointRows] {
        &self.batches
    }

    pub fn failures(&self) -> &[EndpointFailure] {
        &self.failures
    }

    pub fn conversion_errors(&self) -> &[TypeConversionError] {
        &self.conversion_errors
    }

    /// Takes in another run of the same query.
    ///
    /// Endpoints present in both keep `other`'s rows or failure.
    pub fn merge(mut self, other: ResultSet) -> Result<ResultSet, ClientError> {
        if self.query.query_text()? != other.query.query_text()? || self.columns != other.columns {
            return Err(ClientError::QueryMismatch);
        }

        for batch in other.batches {
            self.drop_endpoint(&batch.endpoint);
            self.batches.push(batch);
        }
        for failure in other.failures {
            self.drop_endpoint(failure.endpoint.name());
            self.failures.push(failure);
        }
        self.conversion_errors.extend(other.conversion_errors);

        debug!(
            target: "livestatus::result",
            endpoints = self.batches.len(),
            failures = self.failures.len(),
            "Merged result sets"
        );
        Ok(self)
    }

    fn drop_endpoint(&mut self, name: &str) {
        self.batches.retain(|b| b.endpoint != name);
        self.failures.retain(|f| f.endpoint.name() != name);
        self.conversion_errors.retain(|e| e.endpoint != name);
    }
}
