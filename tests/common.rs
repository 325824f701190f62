//! Common test utilities
//!
//! A scripted [`Transport`] and fixtures shared by the integration tests.

use async_trait::async_trait;
use atlas::net::{ApiRequest, RawResponse, Transport};
use atlas::storage::{MemoryStorage, Storage};
use atlas::{ApiClient, Atlas};
use parking_lot::Mutex;
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, oneshot};
use tracing_subscriber::EnvFilter;

#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

#[allow(dead_code)]
struct Scripted {
    response: RawResponse,
    gate: Option<oneshot::Receiver<()>>,
}

/// Transport that answers from per-route queues and records every request.
///
/// Unscripted requests get a 404 with a backend-style error body.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
    arrived: Notify,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a JSON response for `method path`.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        self.push(method, path, raw(status, &body), None);
    }

    /// Queues a response with an empty body, e.g. `204 No Content`.
    pub fn respond_empty(&self, method: Method, path: &str, status: u16) {
        self.push(method, path, RawResponse::new(status_code(status), ""), None);
    }

    /// Queues a response that is held back until the returned sender fires.
    pub fn respond_gated(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: Value,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, raw(status, &body), Some(rx));
        tx
    }

    /// Queues a backend error in the wrapped `{"error": {...}}` shape.
    pub fn fail(&self, method: Method, path: &str, status: u16, code: &str, message: &str) {
        let body = json!({ "error": { "code": code, "message": message } });
        self.respond(method, path, status, body);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self, method: &Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == *method && r.path == path)
            .count()
    }

    /// Waits until a request for `method path` has reached the transport.
    pub async fn wait_for_request(&self, method: &Method, path: &str) {
        while self.request_count(method, path) == 0 {
            self.arrived.notified().await;
        }
    }

    fn push(&self, method: Method, path: &str, response: RawResponse, gate: Option<oneshot::Receiver<()>>) {
        self.scripts
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Scripted { response, gate });
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> atlas::Result<RawResponse> {
        let key = (request.method.clone(), request.path.clone());
        self.requests.lock().push(request);
        let scripted = self
            .scripts
            .lock()
            .get_mut(&key)
            .and_then(|queue| queue.pop_front());
        self.arrived.notify_one();

        match scripted {
            Some(Scripted { response, gate }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                Ok(response)
            }
            None => {
                let body = json!({
                    "error": {
                        "code": "NOT_FOUND",
                        "message": format!("no scripted response for {} {}", key.0, key.1)
                    }
                });
                Ok(raw(404, &body))
            }
        }
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap()
}

fn raw(status: u16, body: &Value) -> RawResponse {
    RawResponse::new(status_code(status), serde_json::to_vec(body).unwrap())
}

/// Routes the crate's log output through the test harness.
///
/// `RUST_LOG` overrides the default `atlas=debug`. Safe to call from every
/// test; only the first call installs the subscriber.
#[allow(dead_code)]
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("atlas=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// An [`Atlas`] over `mock` and in-memory storage.
#[allow(dead_code)]
pub fn atlas(mock: &Arc<MockTransport>) -> Atlas {
    atlas_with_storage(mock, Arc::new(MemoryStorage::new()))
}

#[allow(dead_code)]
pub fn atlas_with_storage(mock: &Arc<MockTransport>, storage: Arc<dyn Storage>) -> Atlas {
    init_tracing();
    Atlas::with_parts(ApiClient::new(mock.clone()), storage)
}

#[allow(dead_code)]
pub fn tool_json(id: u64) -> Value {
    json!({
        "id": id,
        "slug": format!("tool-{}", id),
        "name": format!("Tool {}", id),
        "has_free_tier": id % 2 == 0,
        "primary_category_id": 1,
        "avg_rating_overall": 4.2,
        "review_count": 12,
        "bookmark_count": 3
    })
}

#[allow(dead_code)]
pub fn tool(id: u64) -> atlas::Tool {
    serde_json::from_value(tool_json(id)).unwrap()
}

#[allow(dead_code)]
pub fn user_json(id: u64, role: &str) -> Value {
    json!({
        "id": id,
        "email": format!("user{}@example.com", id),
        "display_name": format!("User {}", id),
        "role": role,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

/// Success envelope around `data`.
#[allow(dead_code)]
pub fn data(value: Value) -> Value {
    json!({ "data": value })
}
