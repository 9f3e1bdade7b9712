//! Placeholder API server: liveness plus not-yet-implemented endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

/// Uptime is measured from [`StubState::new`], which runs when the router is
/// built just before the listener starts serving, not from process start.
#[derive(Clone)]
pub struct StubState {
    started: Instant,
    environment: Arc<str>,
}

impl StubState {
    pub fn new(environment: &str) -> Self {
        Self {
            started: Instant::now(),
            environment: Arc::from(environment),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Seconds since the router was built.
    pub uptime: f64,
    pub environment: String,
    #[serde(serialize_with = "serialize_iso")]
    pub timestamp: DateTime<Utc>,
}

/// Serialize as ISO 8601 with millisecond precision, matching JS `Date.toISOString()`.
fn serialize_iso<S: serde::Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}

pub fn routes(state: StubState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/projects", get(list_projects).post(create_project))
        .route("/api/files", get(list_files))
        .route("/api/execution", post(execute))
        .with_state(state)
}

async fn health(State(state): State<StubState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        uptime: state.started.elapsed().as_secs_f64(),
        environment: state.environment.to_string(),
        timestamp: Utc::now(),
    })
}

async fn list_projects() -> Json<Value> {
    Json(json!({ "projects": [] }))
}

async fn create_project() -> Json<Value> {
    Json(json!({ "message": "Project creation not implemented yet" }))
}

async fn list_files() -> Json<Value> {
    Json(json!({ "files": [] }))
}

async fn execute() -> Json<Value> {
    Json(json!({ "message": "Code execution not implemented yet" }))
}
