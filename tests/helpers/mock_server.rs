//! A scripted Livestatus endpoint bound to an ephemeral localhost port.
//!
//! Only depends on tokio so integration tests can include it by path.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// What the server sends back for one request.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// fixed16 header with status 200 followed by `body`.
    Body(String),
    /// fixed16 header with the given status followed by `message`.
    Status(u16, String),
    /// Header announcing `length` bytes but only `body` is written.
    Truncated { body: String, length: usize },
    /// Bytes written verbatim, no header added.
    Raw(Vec<u8>),
    /// Close the connection without answering.
    Close,
    /// Wait for the client to finish sending, then abort the connection with
    /// an RST instead of a FIN.
    Reset,
}

pub fn make_header(status: u16, length: usize) -> String {
    format!("{:03} {:<11}\n", status, length)
}

/// JSON body for rows of string fields.
pub fn rows_body(rows: &[&[&str]]) -> String {
    let rows: Vec<String> = rows
        .iter()
        .map(|row| {
            let fields: Vec<String> = row.iter().map(|f| format!("{:?}", f)).collect();
            format!("[{}]", fields.join(","))
        })
        .collect();
    format!("[{}]\n", rows.join(",\n"))
}

pub struct MockLivestatusServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl MockLivestatusServer {
    /// Starts a server answering each request with `respond(request_text)`.
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&str) -> MockReply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let respond = Arc::new(respond);

        let seen = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let respond = Arc::clone(&respond);
                let seen = Arc::clone(&seen);
                tokio::spawn(async move {
                    serve(stream, respond.as_ref(), &seen).await;
                });
            }
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    /// Answers every request with the same successful body.
    pub async fn with_body(body: impl Into<String>) -> Self {
        let body = body.into();
        Self::start(move |_| MockReply::Body(body.clone())).await
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Request texts received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Drop for MockLivestatusServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve<F>(mut stream: TcpStream, respond: &F, seen: &Mutex<Vec<String>>)
where
    F: Fn(&str) -> MockReply,
{
    let mut request = Vec::new();
    let mut buf = [0u8; 2048];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                request.extend_from_slice(&buf[..n]);
                if request.ends_with(b"\n\n") {
                    break;
                }
            }
        }
    }

    let text = String::from_utf8_lossy(&request).into_owned();
    seen.lock().expect("requests lock").push(text.clone());

    let reply = match respond(&text) {
        MockReply::Body(body) => format!("{}{}", make_header(200, body.len()), body).into_bytes(),
        MockReply::Status(status, message) => {
            format!("{}{}", make_header(status, message.len()), message).into_bytes()
        }
        MockReply::Truncated { body, length } => {
            format!("{}{}", make_header(200, length), body).into_bytes()
        }
        MockReply::Raw(bytes) => bytes,
        MockReply::Close => return,
        MockReply::Reset => {
            // Drain up to the client's half-close so the RST lands on its read.
            while let Ok(n) = stream.read(&mut buf).await {
                if n == 0 {
                    break;
                }
            }
            let _ = stream.set_linger(Some(Duration::ZERO));
            return;
        }
    };
    let _ = stream.write_all(&reply).await;
    let _ = stream.shutdown().await;
}

/// A localhost port with nothing listening on it.
pub fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("ephemeral port address").port()
}
