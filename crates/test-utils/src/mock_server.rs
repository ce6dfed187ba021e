//! A recording stand-in for the AirHub HTTP API.
//!
//! Routes are matched on exact method and path. Every request that reaches
//! the server is recorded, matched or not, so tests can assert on headers,
//! query strings and bodies after the fact.
//!
//! ```ignore
//! let server = MockServer::start(vec![
//!     MockRoute::new("POST", "/v1/oauth/token", MockResponse::json(200, token_body)),
//! ])
//! .await;
//! let client = AirHubClient::new(config_for(&server.base_url()))?;
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Router};
use serde_json::Value;
use tokio::task::JoinHandle;

/// A canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl MockResponse {
    /// A JSON response.
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    /// A JSON response from raw text, for bodies `serde_json::Value` cannot express.
    pub fn raw_json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.into(),
        }
    }

    /// A plain-text response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.into(),
        }
    }

    /// An empty response with the given status.
    pub fn empty(status: u16) -> Self {
        Self::text(status, "")
    }
}

/// One route: every request for `method path` gets `response`.
#[derive(Debug, Clone)]
pub struct MockRoute {
    pub method: String,
    pub path: String,
    pub response: MockResponse,
}

impl MockRoute {
    pub fn new(method: &str, path: &str, response: MockResponse) -> Self {
        Self {
            method: method.to_uppercase(),
            path: path.to_string(),
            response,
        }
    }
}

/// A request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Header names are lowercase.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Look up a header by lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Body parsed as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Request body is not JSON")
    }

    /// Decoded `application/x-www-form-urlencoded` body.
    pub fn form(&self) -> HashMap<String, String> {
        serde_urlencoded::from_bytes(&self.body).expect("Request body is not a form")
    }
}

struct ServerState {
    routes: Vec<MockRoute>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A running mock server bound to an ephemeral localhost port.
///
/// The server task is aborted when the value is dropped.
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Bind and start serving `routes`. Unmatched requests get a 404
    /// with an API-style error body.
    pub async fn start(routes: Vec<MockRoute>) -> Self {
        let state = Arc::new(ServerState {
            routes,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(handle_request)
            .layer(Extension(state.clone()));

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("Mock server has no address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock server failed");
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// `http://127.0.0.1:{port}`, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("Request log poisoned")
            .clone()
    }

    /// Requests received for one method and path.
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method.eq_ignore_ascii_case(method) && r.path == path)
            .collect()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_request(
    Extension(state): Extension<Arc<ServerState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect(),
        body: body.to_vec(),
    };

    let matched = state
        .routes
        .iter()
        .find(|route| route.method == recorded.method && route.path == recorded.path)
        .map(|route| route.response.clone());

    if let Ok(mut log) = state.requests.lock() {
        log.push(recorded);
    }

    let response = matched.unwrap_or_else(|| {
        MockResponse::json(404, serde_json::json!({"statusCode": 404, "message": "Not Found"}))
    });

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, response.content_type)], response.body).into_response()
}
