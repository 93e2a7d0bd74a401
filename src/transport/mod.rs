pub mod header;
pub mod tcp;
pub mod traits;

pub use header::{HEADER_LEN, ResponseHeader, STATUS_OK};
pub use tcp::{DEFAULT_TIMEOUT, MAX_BODY_LEN, TcpTransport};
pub use traits::{RawResponse, Transport};
