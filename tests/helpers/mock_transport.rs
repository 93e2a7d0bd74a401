use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::endpoint::{Endpoint, EndpointError};
use crate::transport::{RawResponse, Transport};

/// In-memory transport keyed by endpoint name.
///
/// Unscripted endpoints answer with `ConnectionRefused`. A delay per endpoint
/// lets tests control completion order in parallel mode.
#[derive(Default)]
pub struct MockTransport {
    replies: HashMap<String, Vec<u8>>,
    schema_replies: HashMap<String, Vec<u8>>,
    status: HashMap<String, u16>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, endpoint: &str, body: &str) -> Self {
        self.replies
            .insert(endpoint.to_string(), body.as_bytes().to_vec());
        self
    }

    pub fn reply_status(mut self, endpoint: &str, status: u16, body: &str) -> Self {
        self.status.insert(endpoint.to_string(), status);
        self.reply(endpoint, body)
    }

    /// Body returned for schema lookups (`GET columns`) to `endpoint`.
    pub fn schema(mut self, endpoint: &str, body: &str) -> Self {
        self.schema_replies
            .insert(endpoint.to_string(), body.as_bytes().to_vec());
        self
    }

    pub fn delay(mut self, endpoint: &str, delay: Duration) -> Self {
        self.delays.insert(endpoint.to_string(), delay);
        self
    }

    /// Endpoint names in the order `execute` was entered.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(
        &self,
        endpoint: &Endpoint,
        request: &[u8],
    ) -> Result<RawResponse, EndpointError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(endpoint.name().to_string());

        if let Some(delay) = self.delays.get(endpoint.name()) {
            tokio::time::sleep(*delay).await;
        }

        if request.starts_with(b"GET columns\n") {
            if let Some(body) = self.schema_replies.get(endpoint.name()) {
                return Ok(RawResponse {
                    status: 200,
                    body: body.clone(),
                });
            }
        }

        match self.replies.get(endpoint.name()) {
            Some(body) => Ok(RawResponse {
                status: self.status.get(endpoint.name()).copied().unwrap_or(200),
                body: body.clone(),
            }),
            None => Err(EndpointError::ConnectionRefused {
                address: endpoint.address(),
            }),
        }
    }
}
