pub mod result_set;

pub use result_set::{EndpointRows, MONITOR_COLUMN, ResultSet};
