use tracing::debug;

use super::{Endpoint, RegistryError};

/// Ordered set of monitors a client fans out to.
///
/// Registration order is the invocation order of sequential runs. A monitor
/// is rejected when its display name or its `host:port` pair is already known.
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    endpoints: Vec<Endpoint>,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, endpoint: Endpoint) -> Result<(), RegistryError> {
        let duplicate = self.endpoints.iter().any(|known| {
            known.name() == endpoint.name()
                || (known.host() == endpoint.host() && known.port() == endpoint.port())
        });
        if duplicate {
            return Err(RegistryError::DuplicateEndpoint(endpoint.to_string()));
        }

        debug!(target: "livestatus::registry", endpoint = %endpoint, "Registered monitor");
        self.endpoints.push(endpoint);
        Ok(())
    }

    /// Registers every endpoint, stopping at the first duplicate.
    pub fn register_all(
        &mut self,
        endpoints: impl IntoIterator<Item = Endpoint>,
    ) -> Result<(), RegistryError> {
        for endpoint in endpoints {
            self.register(endpoint)?;
        }
        Ok(())
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn get(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.name() == name)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl TryFrom<Vec<Endpoint>> for EndpointRegistry {
    type Error = RegistryError;

    fn try_from(endpoints: Vec<Endpoint>) -> Result<Self, Self::Error> {
        let mut registry = Self::new();
        registry.register_all(endpoints)?;
        Ok(registry)
    }
}
