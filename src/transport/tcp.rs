use async_trait::async_trait;
use std::future::Future;
use std::io::{self, ErrorKind};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, trace};

use super::header::{HEADER_LEN, ResponseHeader};
use super::{RawResponse, Transport};
use crate::endpoint::{Endpoint, EndpointError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

const READ_BUFFER: usize = 4096;

/// Largest body a monitor may announce. Bigger headers are rejected before
/// anything is read.
pub const MAX_BODY_LEN: usize = 256 * 1024 * 1024;

/// Upfront allocation for a body; the buffer grows as bytes actually arrive.
const INITIAL_BODY_CAPACITY: usize = 64 * 1024;

/// Opens a fresh TCP connection per request.
///
/// The timeout applies separately to connecting, writing the request and
/// reading the response. The stream is owned by `execute` and dropped on
/// every return path.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    timeout: Duration,
}

impl TcpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T, F>(&self, address: &str, phase: F) -> Result<T, EndpointError>
    where
        F: Future<Output = io::Result<T>>,
    {
        match tokio::time::timeout(self.timeout, phase).await {
            Ok(result) => result.map_err(|e| classify(address, self.timeout, e)),
            Err(_) => Err(EndpointError::ConnectionTimeout {
                address: address.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn execute(
        &self,
        endpoint: &Endpoint,
        request: &[u8],
    ) -> Result<RawResponse, EndpointError> {
        let address = endpoint.address();
        debug!(target: "livestatus::transport", endpoint = endpoint.name(), %address, "Connecting");

        let mut stream = self.bounded(&address, TcpStream::connect(&address)).await?;

        self.bounded(&address, async {
            stream.write_all(request).await?;
            // Half-close so the monitor sees the end of the request.
            stream.shutdown().await
        })
        .await?;

        let mut header = [0u8; HEADER_LEN];
        let received = self
            .bounded(&address, read_full(&mut stream, &mut header))
            .await?;
        if received < HEADER_LEN {
            return Err(EndpointError::ShortRead {
                expected: HEADER_LEN,
                received,
            });
        }
        let header = ResponseHeader::parse(&header)?;
        trace!(
            target: "livestatus::transport",
            endpoint = endpoint.name(),
            status = header.status,
            length = header.length,
            "Received response header"
        );

        if header.length > MAX_BODY_LEN {
            return Err(EndpointError::InvalidHeader(format!(
                "announced body of {} bytes exceeds the {} byte limit",
                header.length, MAX_BODY_LEN
            )));
        }

        let mut body = Vec::with_capacity(header.length.min(INITIAL_BODY_CAPACITY));
        let mut limited = (&mut stream).take(header.length as u64);
        let received = self
            .bounded(&address, limited.read_to_end(&mut body))
            .await?;
        if received < header.length {
            return Err(EndpointError::ShortRead {
                expected: header.length,
                received,
            });
        }

        debug!(
            target: "livestatus::transport",
            endpoint = endpoint.name(),
            bytes = received,
            "Response received"
        );
        Ok(RawResponse {
            status: header.status,
            body,
        })
    }
}

/// Reads until `buf` is full or the peer closes; returns the bytes read.
async fn read_full<R>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        let end = (filled + READ_BUFFER).min(buf.len());
        let n = reader.read(&mut buf[filled..end]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

pub(crate) fn classify(address: &str, timeout: Duration, err: io::Error) -> EndpointError {
    let address = address.to_string();
    match err.kind() {
        ErrorKind::ConnectionRefused => EndpointError::ConnectionRefused { address },
        ErrorKind::TimedOut => EndpointError::ConnectionTimeout {
            address,
            timeout_ms: timeout.as_millis() as u64,
        },
        ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::BrokenPipe
        | ErrorKind::NotConnected => {
            EndpointError::ConnectionReset { address }
        }
        _ => EndpointError::Io(err),
    }
}
