//! Fake RESTful JSON service for integration tests
//!
//! Serves `/users` the way the adapter expects a resource to behave, plus a
//! `/slow` resource whose queries never answer in time. Runs on its own
//! tokio runtime in a background thread so tests drive the blocking adapter
//! from the test thread.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Map, Value};

use logical_record::adapter::RestfulJsonAdapter;
use logical_record::config::AdapterConfig;
use logical_record::observability::Logger;
use logical_record::transport::HttpTransport;

type Params = Query<Vec<(String, String)>>;
type Reply = (StatusCode, String);

// =============================================================================
// Shared State
// =============================================================================

/// Records and request bookkeeping of the fake service
#[derive(Default)]
pub struct FakeState {
    api_key: Option<String>,
    next_id: Mutex<i64>,
    records: Mutex<BTreeMap<i64, Map<String, Value>>>,
    request_ids: Mutex<Vec<String>>,
}

impl FakeState {
    /// Request ids seen so far, in arrival order
    pub fn request_ids(&self) -> Vec<String> {
        self.request_ids.lock().unwrap().clone()
    }

    pub fn record(&self, id: i64) -> Option<Map<String, Value>> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    fn authorize(&self, headers: &HeaderMap, params: &[(String, String)]) -> Result<(), Reply> {
        if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
            self.request_ids.lock().unwrap().push(id.to_string());
        }
        match &self.api_key {
            Some(key) if param(params, "api_key") != Some(key.as_str()) => Err((
                StatusCode::UNAUTHORIZED,
                json!({"message": "invalid api key"}).to_string(),
            )),
            _ => Ok(()),
        }
    }
}

pub struct FakeService {
    pub addr: SocketAddr,
    pub state: Arc<FakeState>,
}

impl FakeService {
    /// Adapter for `table` on this service
    pub fn adapter(&self, table: &str) -> RestfulJsonAdapter {
        self.adapter_with(AdapterConfig::new(self.addr.to_string(), table))
    }

    pub fn adapter_with(&self, config: AdapterConfig) -> RestfulJsonAdapter {
        let transport = HttpTransport::new(config.descriptor().timeout).unwrap();
        RestfulJsonAdapter::with_transport(&config, Arc::new(transport), Logger::null()).unwrap()
    }

    pub fn config(&self, table: &str) -> AdapterConfig {
        AdapterConfig::new(self.addr.to_string(), table)
    }
}

/// Start the fake service on an ephemeral port
pub fn spawn_service(api_key: Option<&str>) -> FakeService {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    let state = Arc::new(FakeState {
        api_key: api_key.map(str::to_string),
        next_id: Mutex::new(1),
        ..Default::default()
    });
    let app = router(Arc::clone(&state));

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    FakeService { addr, state }
}

// =============================================================================
// Routes
// =============================================================================

fn router(state: Arc<FakeState>) -> Router {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/select", get(select_users))
        .route("/users/schema_fields", get(user_schema))
        .route("/users/valid", post(validate_user))
        .route(
            "/users/:id",
            put(update_user).delete(delete_user).post(user_action),
        )
        .route("/slow/select", get(slow_select))
        .with_state(state)
}

async fn create_user(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(params): Params,
) -> Reply {
    if let Err(reply) = state.authorize(&headers, &params) {
        return reply;
    }
    let attributes = attributes(&params);
    if let Some(errors) = check_user(&attributes) {
        return (StatusCode::BAD_REQUEST, errors.to_string());
    }

    let mut records = state.records.lock().unwrap();
    let email = attributes.get("email").cloned();
    if email.is_some() && records.values().any(|r| r.get("email") == email.as_ref()) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"message": "column email is not unique"}).to_string(),
        );
    }

    let mut next_id = state.next_id.lock().unwrap();
    let id = *next_id;
    *next_id += 1;

    let mut record = Map::new();
    record.insert("id".to_string(), json!(id));
    record.extend(attributes);
    records.insert(id, record.clone());

    (StatusCode::OK, Value::Object(record).to_string())
}

async fn select_users(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(params): Params,
) -> Reply {
    if let Err(reply) = state.authorize(&headers, &params) {
        return reply;
    }
    if param(&params, "sql").is_none() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"message": "sql is required"}).to_string(),
        );
    }

    let records = state.records.lock().unwrap();
    if records.is_empty() {
        return (StatusCode::OK, String::new());
    }
    let rows: Vec<Value> = records.values().cloned().map(Value::Object).collect();
    (StatusCode::OK, Value::Array(rows).to_string())
}

/// Entries are double-encoded, as real services of this kind emit them
async fn user_schema(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(params): Params,
) -> Reply {
    if let Err(reply) = state.authorize(&headers, &params) {
        return reply;
    }
    let fields = [
        json!({"name": "id", "default": null, "type": "integer", "null": false, "primary": true}),
        json!({"name": "name", "default": null, "type": "string", "null": false, "primary": false}),
        json!({"name": "email", "default": null, "type": "string", "null": true, "primary": false}),
    ];
    let encoded: Vec<String> = fields.iter().map(Value::to_string).collect();
    (StatusCode::OK, json!(encoded).to_string())
}

async fn validate_user(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(params): Params,
) -> Reply {
    if let Err(reply) = state.authorize(&headers, &params) {
        return reply;
    }
    match check_user(&attributes(&params)) {
        Some(errors) => (StatusCode::BAD_REQUEST, errors.to_string()),
        None => (StatusCode::OK, String::new()),
    }
}

async fn update_user(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Query(params): Params,
) -> Reply {
    if let Err(reply) = state.authorize(&headers, &params) {
        return reply;
    }
    let attributes = attributes(&params);
    if let Some(errors) = check_user(&attributes) {
        return (StatusCode::BAD_REQUEST, errors.to_string());
    }

    let mut records = state.records.lock().unwrap();
    match id.parse::<i64>().ok().and_then(|id| records.get_mut(&id)) {
        Some(record) => {
            record.extend(attributes);
            (StatusCode::OK, String::new())
        }
        None => not_found(&id),
    }
}

async fn delete_user(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Query(params): Params,
) -> Reply {
    if let Err(reply) = state.authorize(&headers, &params) {
        return reply;
    }
    let mut records = state.records.lock().unwrap();
    match id.parse::<i64>().ok().and_then(|id| records.remove(&id)) {
        Some(_) => (StatusCode::OK, String::new()),
        None => not_found(&id),
    }
}

/// Custom actions; only `count` is known
async fn user_action(
    State(state): State<Arc<FakeState>>,
    Path(action): Path<String>,
    headers: HeaderMap,
    Query(params): Params,
) -> Reply {
    if let Err(reply) = state.authorize(&headers, &params) {
        return reply;
    }
    match action.as_str() {
        "count" => {
            let count = state.records.lock().unwrap().len();
            (StatusCode::OK, json!({"count": count}).to_string())
        }
        _ => (
            StatusCode::NOT_FOUND,
            json!({"message": format!("unknown action {}", action)}).to_string(),
        ),
    }
}

async fn slow_select() -> Reply {
    tokio::time::sleep(Duration::from_secs(3)).await;
    (StatusCode::OK, "[]".to_string())
}

// =============================================================================
// Helpers
// =============================================================================

fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// `attributes[name]=Ann` → `{"name": "Ann"}`
fn attributes(params: &[(String, String)]) -> Map<String, Value> {
    params
        .iter()
        .filter_map(|(key, value)| {
            let name = key.strip_prefix("attributes[")?.strip_suffix(']')?;
            Some((name.to_string(), Value::String(value.clone())))
        })
        .collect()
}

fn check_user(attributes: &Map<String, Value>) -> Option<Value> {
    match attributes.get("name").and_then(Value::as_str) {
        Some(name) if name.trim().is_empty() => Some(json!({"name": ["can't be blank"]})),
        Some(name) if name.len() < 2 => Some(json!({"name": "is too short"})),
        _ => None,
    }
}

fn not_found(id: &str) -> Reply {
    (
        StatusCode::NOT_FOUND,
        json!({"code": "record_not_found", "message": format!("no user {}", id)}).to_string(),
    )
}
