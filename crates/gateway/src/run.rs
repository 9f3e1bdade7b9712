//! Execution gateway: `POST /run` and `GET /status/{vm_id}`.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use exec_backend::ExecutionBackend;
use serde_json::{Value, json};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::RunError;
use crate::request::ExecutionRequest;
use crate::response::ExecutionResponse;

/// Shared by every handler. The backend is built once at startup.
#[derive(Clone)]
pub struct GatewayState {
    pub backend: Arc<dyn ExecutionBackend>,
    /// Added to the request timeout to get the gateway's own deadline.
    pub grace: Duration,
}

impl GatewayState {
    pub fn new(backend: Arc<dyn ExecutionBackend>, grace: Duration) -> Self {
        Self { backend, grace }
    }
}

/// Routes relative to the mount prefix.
pub fn routes(state: GatewayState) -> Router {
    Router::new()
        .route("/run", post(run))
        .route("/status/{vm_id}", get(status))
        .with_state(state)
}

async fn run(
    State(state): State<GatewayState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ExecutionResponse>, RunError> {
    let request_id = Uuid::new_v4();

    let Json(body) = body.inspect_err(|e| {
        warn!(request_id = %request_id, error = %e, "unreadable execution request");
    })?;

    let req = ExecutionRequest::from_json(&body).map_err(|errors| {
        warn!(request_id = %request_id, errors = errors.len(), "execution request rejected");
        RunError::Invalid(errors)
    })?;

    let files = req.file_map();
    info!(
        request_id = %request_id,
        backend = state.backend.name(),
        files = req.files.len(),
        distinct_files = files.len(),
        bytes = files.content_bytes(),
        language = %req.language,
        timeout_ms = req.timeout.as_millis(),
        "execution requested"
    );

    let deadline = req.timeout.saturating_add(state.grace);
    let outcome = tokio::time::timeout(
        deadline,
        state.backend.execute_code(&files, &req.language, req.timeout),
    )
    .await;

    match outcome {
        Ok(Ok(result)) => {
            info!(
                request_id = %request_id,
                success = result.success,
                execution_time_ms = %result.execution_time,
                "execution finished"
            );
            Ok(Json(ExecutionResponse::from(result)))
        }
        Ok(Err(e)) => {
            error!(request_id = %request_id, error = %e, "execution backend failed");
            Err(RunError::Backend(e))
        }
        Err(_) => {
            error!(
                request_id = %request_id,
                deadline_ms = deadline.as_millis(),
                "execution backend did not answer in time"
            );
            Err(RunError::TimedOut(deadline))
        }
    }
}

async fn status(
    State(state): State<GatewayState>,
    Path(vm_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.backend.vm_status(&vm_id).await {
        Ok(status) => Ok(Json(json!({ "status": status }))),
        Err(e) => {
            error!(vm_id = %vm_id, error = %e, "status lookup failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to get execution status" })),
            ))
        }
    }
}
