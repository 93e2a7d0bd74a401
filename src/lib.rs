pub mod client;
pub mod endpoint;
pub mod fanout;
pub mod logging;
pub mod postfilter;
pub mod query;
pub mod response;
pub mod result;
pub mod schema;
pub mod shared;
pub mod transport;

pub use client::{ClientError, LivestatusClient};
pub use endpoint::{Endpoint, EndpointError, EndpointFailure, EndpointRegistry};
pub use fanout::ExecutionMode;
pub use postfilter::{PostFilter, named};
pub use query::{FilterExpr, FilterOp, Query, QueryError, TimeFormat};
pub use response::Value;
pub use result::ResultSet;

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
pub mod test_helpers;
