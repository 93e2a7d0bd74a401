use futures::StreamExt;
use futures::stream::FuturesUnordered;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::endpoint::{Endpoint, EndpointError};
use crate::transport::{RawResponse, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One endpoint at a time, in registration order.
    #[default]
    Sequential,
    /// One task per endpoint; outcomes arrive in completion order.
    Parallel,
}

/// What one endpoint returned for one request.
#[derive(Debug)]
pub struct EndpointOutcome {
    /// Position of the endpoint in the registry.
    pub index: usize,
    pub endpoint: Endpoint,
    pub result: Result<RawResponse, EndpointError>,
}

/// Sends one request to every endpoint and collects each outcome separately.
///
/// A failing endpoint never stops the others.
#[derive(Clone)]
pub struct FanOutCoordinator {
    transport: Arc<dyn Transport>,
    mode: ExecutionMode,
}

impl FanOutCoordinator {
    pub fn new(transport: Arc<dyn Transport>, mode: ExecutionMode) -> Self {
        Self { transport, mode }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Outcomes in invocation order (sequential) or completion order (parallel).
    pub async fn dispatch(&self, endpoints: &[Endpoint], request: Arc<[u8]>) -> Vec<EndpointOutcome> {
        info!(
            target: "livestatus::fanout",
            endpoints = endpoints.len(),
            mode = ?self.mode,
            "Dispatching request"
        );
        match self.mode {
            ExecutionMode::Sequential => self.dispatch_sequential(endpoints, &request).await,
            ExecutionMode::Parallel => self.dispatch_parallel(endpoints, request).await,
        }
    }

    async fn dispatch_sequential(&self, endpoints: &[Endpoint], request: &[u8]) -> Vec<EndpointOutcome> {
        let mut outcomes = Vec::with_capacity(endpoints.len());
        for (index, endpoint) in endpoints.iter().enumerate() {
            let result = self.transport.execute(endpoint, request).await;
            log_outcome(endpoint, &result);
            outcomes.push(EndpointOutcome {
                index,
                endpoint: endpoint.clone(),
                result,
            });
        }
        outcomes
    }

    async fn dispatch_parallel(&self, endpoints: &[Endpoint], request: Arc<[u8]>) -> Vec<EndpointOutcome> {
        // One slot per endpoint, each written once by the collecting loop.
        let mut slots: Vec<Option<Result<RawResponse, EndpointError>>> =
            endpoints.iter().map(|_| None).collect();
        let mut completion_order = Vec::with_capacity(endpoints.len());

        let mut pending = FuturesUnordered::new();
        for (index, endpoint) in endpoints.iter().enumerate() {
            let transport = Arc::clone(&self.transport);
            let request = Arc::clone(&request);
            let endpoint = endpoint.clone();
            let task = tokio::spawn(async move { transport.execute(&endpoint, &request).await });
            pending.push(async move { (index, task.await) });
        }

        while let Some((index, joined)) = pending.next().await {
            let result = joined.unwrap_or_else(|e| Err(EndpointError::TaskFailed(e.to_string())));
            log_outcome(&endpoints[index], &result);
            debug_assert!(slots[index].is_none(), "outcome slot written twice");
            slots[index] = Some(result);
            completion_order.push(index);
        }

        completion_order
            .into_iter()
            .filter_map(|index| {
                slots[index].take().map(|result| EndpointOutcome {
                    index,
                    endpoint: endpoints[index].clone(),
                    result,
                })
            })
            .collect()
    }
}

fn log_outcome(endpoint: &Endpoint, result: &Result<RawResponse, EndpointError>) {
    match result {
        Ok(response) => debug!(
            target: "livestatus::fanout",
            endpoint = endpoint.name(),
            status = response.status,
            bytes = response.body.len(),
            "Endpoint answered"
        ),
        Err(error) => debug!(
            target: "livestatus::fanout",
            endpoint = endpoint.name(),
            %error,
            "Endpoint did not answer"
        ),
    }
}
