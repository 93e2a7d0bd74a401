pub mod errors;
pub mod executor;

pub use errors::ClientError;
pub use executor::LivestatusClient;
