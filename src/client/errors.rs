use std::io;
use thiserror::Error;
use tracing::{debug, error};

use crate::endpoint::EndpointFailure;
use crate::postfilter::PostFilterError;
use crate::query::QueryError;

/// Errors that end a run without a result set.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("No monitors registered")]
    NoEndpoints,

    #[error("All {} monitors failed: {}", .0.len(), summarize(.0))]
    AllEndpointsFailed(Vec<EndpointFailure>),

    #[error("Column '{column}' is not listed in the schema of table '{table}'")]
    SchemaMismatch { table: String, column: String },

    #[error(transparent)]
    PostFilter(#[from] PostFilterError),

    #[error("Result sets were produced by different queries")]
    QueryMismatch,

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to start runtime: {0}")]
    Runtime(#[source] io::Error),
}

fn summarize(failures: &[EndpointFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ClientError {
    pub fn log_error(&self) {
        match self {
            ClientError::AllEndpointsFailed(failures) => {
                error!(target: "livestatus::client", count = failures.len(), "All monitors failed");
                for failure in failures {
                    debug!(target: "livestatus::client", "Monitor failure: {}", failure);
                }
            }
            ClientError::PostFilter(e) => {
                error!(target: "livestatus::client", "Post-filter failed: {}", e);
                debug!(target: "livestatus::client", "Post-filter error details: {:?}", e);
            }
            other => {
                error!(target: "livestatus::client", "Query run failed: {}", other);
                debug!(target: "livestatus::client", "Run error details: {:?}", other);
            }
        }
    }
}
