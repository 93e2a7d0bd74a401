pub mod coordinator;

pub use coordinator::{EndpointOutcome, ExecutionMode, FanOutCoordinator};
