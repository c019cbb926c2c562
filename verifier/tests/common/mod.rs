//! In-process stand-in for the `siteverify` endpoint.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Form, Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::task::JoinHandle;

/// A request as seen by the stub.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub content_type: Option<String>,
    pub params: HashMap<String, String>,
}

struct StubState {
    status: StatusCode,
    body: String,
    delay: Duration,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct StubEndpoint {
    pub url: String,
    state: Arc<StubState>,
    handle: JoinHandle<()>,
}

impl StubEndpoint {
    /// Serve `body` with `status` for every POST to `/siteverify`.
    pub async fn start(status: StatusCode, body: &str) -> Self {
        Self::start_with_delay(status, body, Duration::ZERO).await
    }

    /// Like [`start`](Self::start), but wait `delay` before answering.
    pub async fn start_with_delay(status: StatusCode, body: &str, delay: Duration) -> Self {
        let state = Arc::new(StubState {
            status,
            body: body.to_string(),
            delay,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route("/siteverify", post(siteverify))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/siteverify"),
            state,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for StubEndpoint {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn siteverify(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Form(params): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    state.requests.lock().unwrap().push(RecordedRequest {
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        params,
    });
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

/// An address nothing is listening on.
pub fn refused_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/siteverify")
}

/// What a [`TruncatedBodyEndpoint`] does after sending part of the body.
#[derive(Clone, Copy, Debug)]
pub enum AfterPartialBody {
    /// Keep the connection open and send nothing more for this long.
    Stall(Duration),
    /// Close the connection.
    HangUp,
}

/// Endpoint that answers with complete headers but an incomplete body.
///
/// Written against a bare socket so the response can be cut off mid-body,
/// which a regular handler cannot do.
pub struct TruncatedBodyEndpoint {
    pub url: String,
    handle: JoinHandle<()>,
}

impl TruncatedBodyEndpoint {
    pub async fn start(partial_body: &'static str, then: AfterPartialBody) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                tokio::spawn(async move {
                    read_request(&mut socket).await;
                    let head = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n",
                        partial_body.len() + 64
                    );
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(partial_body.as_bytes()).await;
                    let _ = socket.flush().await;
                    match then {
                        AfterPartialBody::Stall(delay) => tokio::time::sleep(delay).await,
                        AfterPartialBody::HangUp => {
                            let _ = socket.shutdown().await;
                        }
                    }
                });
            }
        });

        Self {
            url: format!("http://{addr}/siteverify"),
            handle,
        }
    }
}

impl Drop for TruncatedBodyEndpoint {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Consume one request: headers, then `content-length` bytes of body.
async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        if let Some(end) = find_header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                return;
            }
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
