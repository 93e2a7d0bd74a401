pub mod mock_server;
pub mod mock_transport;

pub use mock_server::{MockLivestatusServer, MockReply, make_header, rows_body, unused_port};
pub use mock_transport::MockTransport;
