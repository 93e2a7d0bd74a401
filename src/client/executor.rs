use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::ClientError;
use crate::endpoint::{Endpoint, EndpointError, EndpointFailure, EndpointRegistry, RegistryError};
use crate::fanout::{ExecutionMode, FanOutCoordinator};
use crate::postfilter::apply_rows;
use crate::query::{Query, encode};
use crate::response::{DecodedResponse, RawRow, decode};
use crate::result::{EndpointRows, ResultSet};
use crate::schema::{
    ColumnKind, ColumnTypes, SchemaCache, TypeConversionError, convert_rows, raw_values,
    schema_query,
};
use crate::shared::config::Settings;
use crate::transport::{DEFAULT_TIMEOUT, TcpTransport, Transport};

/// Rows gathered from every endpoint for one request.
struct Collected {
    columns: Vec<String>,
    batches: Vec<(Endpoint, Vec<RawRow>)>,
    failures: Vec<EndpointFailure>,
}

/// Runs queries against every registered monitor and merges the answers.
#[derive(Clone)]
pub struct LivestatusClient {
    registry: EndpointRegistry,
    /// Caller-supplied transport; `None` means TCP with `timeout`.
    transport: Option<Arc<dyn Transport>>,
    timeout: Duration,
    mode: ExecutionMode,
}

impl LivestatusClient {
    /// Sequential client over TCP with the default timeout.
    pub fn new(registry: EndpointRegistry) -> Self {
        Self {
            registry,
            transport: None,
            timeout: DEFAULT_TIMEOUT,
            mode: ExecutionMode::Sequential,
        }
    }

    /// Client for the endpoints, mode and timeout of a settings file.
    pub fn from_settings(settings: &Settings) -> Result<Self, RegistryError> {
        Ok(Self::new(settings.registry()?)
            .with_mode(settings.client.mode)
            .with_timeout(settings.timeout()))
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Timeout for the built-in TCP transport. Ignored once a custom
    /// transport is set with [`with_transport`](Self::with_transport).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn transport(&self) -> Arc<dyn Transport> {
        match &self.transport {
            Some(transport) => Arc::clone(transport),
            None => Arc::new(TcpTransport::new(self.timeout)),
        }
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EndpointRegistry {
        &mut self.registry
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Runs `query` against every registered monitor.
    ///
    /// Succeeds when at least one monitor produced rows; the others are
    /// listed in `ResultSet::failures`.
    pub async fn run(&self, query: &Query) -> Result<ResultSet, ClientError> {
        let request = encode(query)?;
        if self.registry.is_empty() {
            return Err(ClientError::NoEndpoints);
        }

        let snapshot = query.clone();
        info!(
            target: "livestatus::client",
            table = %snapshot.table,
            columns = snapshot.columns.len(),
            monitors = self.registry.len(),
            mode = ?self.mode,
            "Running query"
        );

        let mut schema = SchemaCache::default();
        if snapshot.auto_detect_types {
            self.load_column_types(&snapshot, &mut schema).await?;
        }

        let collected = self.collect(&snapshot, request).await?;

        let kinds = match schema.get(&snapshot.table) {
            Some(types) if snapshot.auto_detect_types => Some(resolve_kinds(
                &snapshot,
                types,
                &collected.columns,
            )?),
            _ => None,
        };

        let mut conversion_errors: Vec<TypeConversionError> = Vec::new();
        let batches: Vec<EndpointRows> = collected
            .batches
            .into_iter()
            .map(|(endpoint, rows)| {
                let rows = match &kinds {
                    Some(kinds) => convert_rows(
                        endpoint.name(),
                        &collected.columns,
                        kinds,
                        rows,
                        snapshot.time_format,
                        &mut conversion_errors,
                    ),
                    None => raw_values(rows),
                };
                EndpointRows {
                    endpoint: endpoint.name().to_string(),
                    rows,
                }
            })
            .collect();

        // Post-filters are caller code: a failure fails the run.
        for batch in &batches {
            apply_rows(&snapshot.post_filters, &batch.rows)?;
        }

        for failure in &collected.failures {
            failure.log();
        }
        for conversion in &conversion_errors {
            warn!(target: "livestatus::types", "{}", conversion);
        }

        let result = ResultSet::new(
            snapshot,
            collected.columns,
            batches,
            collected.failures,
            conversion_errors,
        );
        info!(
            target: "livestatus::client",
            rows = result.len(),
            failed_monitors = result.failures().len(),
            "Query finished"
        );
        Ok(result)
    }

    /// Blocking wrapper around [`run`](Self::run) on a private current-thread
    /// runtime. Must not be called from inside a tokio runtime.
    pub fn run_blocking(&self, query: &Query) -> Result<ResultSet, ClientError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientError::Runtime)?;
        runtime.block_on(self.run(query))
    }

    async fn load_column_types(
        &self,
        query: &Query,
        cache: &mut SchemaCache,
    ) -> Result<(), ClientError> {
        if cache.contains(&query.table) {
            return Ok(());
        }

        let lookup = schema_query(&query.table, &query.columns);
        debug!(target: "livestatus::types", table = %query.table, "Looking up column types");
        let collected = self.collect(&lookup, encode(&lookup)?).await?;
        for failure in &collected.failures {
            failure.log();
        }

        let types = ColumnTypes::from_rows(collected.batches.iter().flat_map(|(_, rows)| rows));
        debug!(
            target: "livestatus::types",
            table = %query.table,
            known = types.len(),
            "Column types loaded"
        );
        cache.insert(query.table.clone(), types);
        Ok(())
    }

    /// Fans `request` out and decodes every answer.
    ///
    /// A response that fails to decode counts as that endpoint's failure.
    async fn collect(&self, query: &Query, request: Vec<u8>) -> Result<Collected, ClientError> {
        let expected = query.output_columns();
        let expected_count = expected.as_ref().map(Vec::len);

        let coordinator = FanOutCoordinator::new(self.transport(), self.mode);
        let outcomes = coordinator
            .dispatch(self.registry.endpoints(), Arc::from(request))
            .await;

        let mut columns = expected;
        let mut batches = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();

        for outcome in outcomes {
            let decoded = outcome
                .result
                .and_then(|response| decode(outcome.endpoint.name(), &response, expected_count))
                .and_then(|decoded| adopt_header(&mut columns, decoded));

            match decoded {
                Ok(rows) => batches.push((outcome.endpoint, rows)),
                Err(error) => failures.push(EndpointFailure::new(outcome.endpoint, error)),
            }
        }

        if batches.is_empty() {
            return Err(ClientError::AllEndpointsFailed(failures));
        }

        Ok(Collected {
            columns: columns.unwrap_or_default(),
            batches,
            failures,
        })
    }
}

/// Takes the first header row as the column list; later headers must match it.
fn adopt_header(
    columns: &mut Option<Vec<String>>,
    decoded: DecodedResponse,
) -> Result<Vec<RawRow>, EndpointError> {
    if let Some(header) = decoded.header {
        if let Some(known) = columns.as_ref() {
            if *known != header {
                return Err(EndpointError::HeaderMismatch {
                    expected: known.clone(),
                    found: header,
                });
            }
        } else {
            *columns = Some(header);
        }
    }
    Ok(decoded.rows)
}

/// Declared kind of every output column. Stats results are numeric.
fn resolve_kinds(
    query: &Query,
    types: &ColumnTypes,
    columns: &[String],
) -> Result<Vec<ColumnKind>, ClientError> {
    columns
        .iter()
        .map(|column| {
            if query.stats.contains(column) {
                return Ok(ColumnKind::Number);
            }
            types
                .get(column)
                .cloned()
                .ok_or_else(|| ClientError::SchemaMismatch {
                    table: query.table.clone(),
                    column: column.clone(),
                })
        })
        .collect()
}
