//! Integration test support for Vendor Desk.
//!
//! [`FakeBackend`] is an in-process vendor REST API on `127.0.0.1:0`. It
//! keeps every collection in memory, speaks the same envelopes as the real
//! backend, and can be told to fail or stall specific requests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vendor-desk-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `gateway` - envelope normalization, errors and timeouts
//! - `orders` - list filtering, selection and bulk document requests
//! - `editor` - optimistic create/update/delete against the backend
//! - `profile` - profile sync and the local mirror

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use vendor_desk_admin::ConsoleConfig;
use vendor_desk_admin::gateway::VendorApiClient;

/// Token the fake backend accepts.
pub const TEST_TOKEN: &str = "vd_integration_token";

/// How list responses are wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListEnvelope {
    /// `{"success": true, "data": {"data": [...], "meta": {...}}}`
    #[default]
    Nested,
    /// `{"data": [...], "meta": {...}}`
    Flat,
    /// `[...]`, every item, no paging.
    Bare,
}

/// A request the backend received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Value,
}

#[derive(Debug, Clone)]
struct Failure {
    method: Method,
    path: String,
    status: StatusCode,
    body: Value,
}

#[derive(Debug, Default)]
struct FakeState {
    collections: HashMap<String, Vec<Value>>,
    profile: Value,
    envelope: ListEnvelope,
    ignore_page: bool,
    failures: Vec<Failure>,
    delays: HashMap<String, Duration>,
    requests: Vec<RecordedRequest>,
    next_id: u64,
}

type Shared = Arc<Mutex<FakeState>>;

fn lock(state: &Mutex<FakeState>) -> MutexGuard<'_, FakeState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory vendor REST API.
pub struct FakeBackend {
    addr: SocketAddr,
    state: Shared,
    task: JoinHandle<()>,
}

impl FakeBackend {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::expect_used)]
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState {
            next_id: 1000,
            ..FakeState::default()
        }));
        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Fake backend has no address");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state, task }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Console configuration pointing at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the base URL is rejected, which cannot happen for a bound
    /// socket address.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn config(&self) -> ConsoleConfig {
        ConsoleConfig::for_base_url(&self.base_url(), SecretString::from(TEST_TOKEN))
            .expect("Fake backend URL is valid")
    }

    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn client(&self) -> VendorApiClient {
        VendorApiClient::new(&self.config()).expect("Failed to build client")
    }

    /// Replace a collection, e.g. `/orders` or `/shipping-zones/1/methods`.
    pub fn seed(&self, path: &str, items: Vec<Value>) {
        lock(&self.state)
            .collections
            .insert(path.to_string(), items);
    }

    #[must_use]
    pub fn items(&self, path: &str) -> Vec<Value> {
        lock(&self.state)
            .collections
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_profile(&self, profile: Value) {
        lock(&self.state).profile = profile;
    }

    #[must_use]
    pub fn profile(&self) -> Value {
        lock(&self.state).profile.clone()
    }

    pub fn set_envelope(&self, envelope: ListEnvelope) {
        lock(&self.state).envelope = envelope;
    }

    /// Always serve the first page, whatever `page` the client asks for.
    pub fn ignore_page_param(&self) {
        lock(&self.state).ignore_page = true;
    }

    /// Answer the next `method path` request with `status` and `body`.
    pub fn fail_next(&self, method: Method, path: &str, status: u16, body: Value) {
        lock(&self.state).failures.push(Failure {
            method,
            path: path.to_string(),
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        });
    }

    /// Stall every request to `path` for `delay` before answering.
    pub fn delay(&self, path: &str, delay: Duration) {
        lock(&self.state).delays.insert(path.to_string(), delay);
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Requests that were not plain reads.
    #[must_use]
    pub fn writes(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != Method::GET)
            .collect()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// =============================================================================
// Request handling
// =============================================================================

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().trim_end_matches('/').to_string();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_TOKEN}"));
    if !authorized {
        let message = json!({"message": "Unauthenticated."});
        return (StatusCode::UNAUTHORIZED, axum::Json(message)).into_response();
    }

    let delay = {
        let mut state = lock(&state);
        state.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            body: body.clone(),
        });
        state.delays.get(&path).copied()
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut state = lock(&state);
    if let Some(pos) = state
        .failures
        .iter()
        .position(|f| f.method == method && f.path == path)
    {
        let failure = state.failures.remove(pos);
        return (failure.status, axum::Json(failure.body)).into_response();
    }

    let query = parse_query(uri.query().unwrap_or_default());
    route(&mut state, &method, &path, &query, body)
}

fn route(
    state: &mut FakeState,
    method: &Method,
    path: &str,
    query: &HashMap<String, String>,
    body: Value,
) -> Response {
    if path == "/profile" {
        if *method == Method::PUT {
            state.profile = body;
        }
        return entity(state.profile.clone());
    }
    if path == "/orders/documents" && *method == Method::POST {
        return acknowledged();
    }

    if state.collections.contains_key(path) {
        return if *method == Method::GET {
            list(state, path, query)
        } else if *method == Method::POST {
            create(state, path, body)
        } else {
            StatusCode::METHOD_NOT_ALLOWED.into_response()
        };
    }

    let Some((head, last)) = path.rsplit_once('/') else {
        return not_found();
    };
    if state.collections.contains_key(head) {
        return item(state, method, head, last, body);
    }
    match head.rsplit_once('/') {
        Some((collection, id)) if state.collections.contains_key(collection) => {
            sub_resource(state, collection, id, last, body)
        }
        _ => not_found(),
    }
}

fn list(state: &FakeState, path: &str, query: &HashMap<String, String>) -> Response {
    let items = state.collections.get(path).cloned().unwrap_or_default();
    if state.envelope == ListEnvelope::Bare {
        return axum::Json(Value::Array(items)).into_response();
    }

    let page: usize = if state.ignore_page {
        1
    } else {
        query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1).max(1)
    };
    let limit: usize = query.get("limit").and_then(|l| l.parse().ok()).unwrap_or(20).max(1);
    let total = items.len();
    let data: Vec<Value> = items
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();
    let meta = json!({
        "page": page,
        "limit": limit,
        "totalPages": total.div_ceil(limit),
        "totalItems": total,
    });

    let body = match state.envelope {
        ListEnvelope::Flat => json!({"data": data, "meta": meta}),
        _ => json!({"success": true, "data": {"data": data, "meta": meta}}),
    };
    axum::Json(body).into_response()
}

fn create(state: &mut FakeState, path: &str, mut body: Value) -> Response {
    let Some(fields) = body.as_object_mut() else {
        let message = json!({"message": "Expected an object"});
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(message)).into_response();
    };
    if fields.get("id").is_none_or(Value::is_null) {
        state.next_id += 1;
        fields.insert("id".to_string(), json!(state.next_id));
    }
    if let Some(items) = state.collections.get_mut(path) {
        items.push(body.clone());
    }
    (StatusCode::CREATED, entity_body(body)).into_response()
}

fn item(
    state: &mut FakeState,
    method: &Method,
    collection: &str,
    id: &str,
    body: Value,
) -> Response {
    let Some(items) = state.collections.get_mut(collection) else {
        return not_found();
    };
    let Some(pos) = items.iter().position(|item| id_matches(item, id)) else {
        return not_found();
    };

    if *method == Method::GET {
        return items.get(pos).cloned().map_or_else(not_found, entity);
    }
    if *method == Method::DELETE {
        items.remove(pos);
        return acknowledged();
    }
    if *method != Method::PUT {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let id_value = items
        .get(pos)
        .and_then(|existing| existing.get("id"))
        .cloned()
        .unwrap_or(Value::Null);
    let mut updated = body;
    if let Some(fields) = updated.as_object_mut() {
        fields.insert("id".to_string(), id_value);
    }
    if let Some(slot) = items.get_mut(pos) {
        slot.clone_from(&updated);
    }
    entity(updated)
}

/// `POST|PATCH|PUT {collection}/{id}/{relation}`.
///
/// A body with `ids` is a link and only acknowledged. `default` moves the
/// default flag. Any other object body is merged into the item.
fn sub_resource(
    state: &mut FakeState,
    collection: &str,
    id: &str,
    relation: &str,
    body: Value,
) -> Response {
    let Some(items) = state.collections.get_mut(collection) else {
        return not_found();
    };
    if !items.iter().any(|item| id_matches(item, id)) {
        return not_found();
    }

    if relation == "default" {
        for item in items.iter_mut() {
            let is_target = id_matches(item, id);
            if let Some(fields) = item.as_object_mut() {
                fields.insert("isDefault".to_string(), json!(is_target));
            }
        }
        return acknowledged();
    }
    if body.get("ids").is_some() {
        return acknowledged();
    }

    let Some(item) = items.iter_mut().find(|item| id_matches(item, id)) else {
        return not_found();
    };
    if let (Some(fields), Some(changes)) = (item.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            fields.insert(key.clone(), value.clone());
        }
    }
    entity(item.clone())
}

fn id_matches(item: &Value, id: &str) -> bool {
    match item.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn entity_body(data: Value) -> axum::Json<Value> {
    axum::Json(json!({"success": true, "data": data}))
}

fn entity(data: Value) -> Response {
    entity_body(data).into_response()
}

fn acknowledged() -> Response {
    axum::Json(json!({"success": true})).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, axum::Json(json!({"message": "Record not found."}))).into_response()
}
