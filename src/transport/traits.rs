use async_trait::async_trait;

use crate::endpoint::{Endpoint, EndpointError};

/// Status and body of one response, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// One request/response exchange with one endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, endpoint: &Endpoint, request: &[u8])
    -> Result<RawResponse, EndpointError>;
}
