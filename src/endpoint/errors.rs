use std::io;
use thiserror::Error;
use tracing::{debug, warn};

use super::Endpoint;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Duplicate monitor: {0}")]
    DuplicateEndpoint(String),
}

/// Failure of a single endpoint during a run.
///
/// These never escape the fan-out on their own; they are attached to the
/// endpoint's outcome and surfaced through the result set or, when nothing
/// succeeded, through `ClientError::AllEndpointsFailed`.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("Could not connect to {address}: connection refused")]
    ConnectionRefused { address: String },

    #[error("Timed out after {timeout_ms}ms talking to {address}")]
    ConnectionTimeout { address: String, timeout_ms: u64 },

    #[error("Lost connection with {address} while receiving data")]
    ConnectionReset { address: String },

    #[error("Response ended early: expected {expected} bytes, received {received}")]
    ShortRead { expected: usize, received: usize },

    #[error("Did not return a proper response header: {0:?}")]
    InvalidHeader(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Error {status} from {endpoint}: \"{message}\"")]
    RemoteQuery {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("{0} did not return any data")]
    EmptyResponse(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Record {record} has {found} fields, expected {expected}")]
    FieldCountMismatch {
        record: usize,
        expected: usize,
        found: usize,
    },

    #[error("Header row {found:?} does not match columns {expected:?}")]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Endpoint task failed: {0}")]
    TaskFailed(String),
}

/// An endpoint paired with the reason it produced no rows.
#[derive(Debug, Error)]
#[error("{}: {error}", .endpoint.name())]
pub struct EndpointFailure {
    pub endpoint: Endpoint,
    #[source]
    pub error: EndpointError,
}

impl EndpointFailure {
    pub fn new(endpoint: Endpoint, error: EndpointError) -> Self {
        Self { endpoint, error }
    }

    pub fn log(&self) {
        warn!(
            target: "livestatus::fanout",
            endpoint = self.endpoint.name(),
            error = %self.error,
            "Endpoint failed"
        );
        debug!(target: "livestatus::fanout", "Endpoint failure details: {:?}", self.error);
    }
}
