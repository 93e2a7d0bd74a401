pub mod errors;
pub mod registry;
pub mod types;

pub use errors::{EndpointError, EndpointFailure, RegistryError};
pub use registry::EndpointRegistry;
pub use types::Endpoint;
