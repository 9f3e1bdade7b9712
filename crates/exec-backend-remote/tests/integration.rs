#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]

use std::time::Duration;

use exec_backend::{BackendError, ExecutionBackend, FileMap, SourceFile};
use exec_backend_remote::{RemoteBackend, RemoteConfig};
use httpmock::prelude::*;
use serde_json::json;

fn files(entries: &[(&str, &str)]) -> FileMap {
    FileMap::from_files(entries.iter().map(|(name, content)| SourceFile {
        name: (*name).to_string(),
        content: (*content).to_string(),
    }))
}

fn backend(server: &MockServer, token: Option<&str>) -> RemoteBackend {
    let config = RemoteConfig::new(server.base_url()).with_token(token.map(String::from));
    RemoteBackend::new(config).unwrap()
}

// =========================================================================
// execute_code
// =========================================================================

#[tokio::test]
async fn execute_posts_file_map_and_decodes_result() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/execute").json_body(json!({
                "files": {"main.py": "print('hi')", "util.py": ""},
                "language": "python",
                "timeoutMs": 30000
            }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "success": true,
                    "output": "hi\n",
                    "error": null,
                    "executionTime": 41,
                    "logs": ["vm started"]
                }));
        })
        .await;

    let result = backend(&server, None)
        .execute_code(
            &files(&[("main.py", "print('hi')"), ("util.py", "")]),
            "python",
            Duration::from_millis(30_000),
        )
        .await
        .unwrap();

    mock.assert_calls_async(1).await;
    assert!(result.success);
    assert_eq!(result.output.as_deref(), Some("hi\n"));
    assert_eq!(result.execution_time, serde_json::Number::from(41u64));
    assert_eq!(result.logs, Some(vec!["vm started".to_string()]));
}

#[tokio::test]
async fn execute_passes_backend_reported_failure_through() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/execute");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"success": false, "error": "compile error"}));
        })
        .await;

    let result = backend(&server, None)
        .execute_code(&files(&[("main.c", "int main(")]), "c", Duration::from_secs(1))
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("compile error"));
}

#[tokio::test]
async fn execute_accepts_fractional_execution_time() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/execute");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"success": true, "output": "hi", "executionTime": 12.5}));
        })
        .await;

    let result = backend(&server, None)
        .execute_code(&files(&[("main.py", "print('hi')")]), "python", Duration::from_secs(1))
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.execution_time.as_f64(), Some(12.5));
}

#[tokio::test]
async fn execute_sends_bearer_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/execute")
                .header("Authorization", "Bearer fc-secret");
            then.status(200).json_body(json!({"success": true}));
        })
        .await;

    let result = backend(&server, Some("fc-secret"))
        .execute_code(&files(&[("a.js", "1")]), "javascript", Duration::from_secs(1))
        .await;

    mock.assert_calls_async(1).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn execute_maps_non_2xx_to_status_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/execute");
            then.status(503).body("no capacity");
        })
        .await;

    let err = backend(&server, None)
        .execute_code(&files(&[("a.js", "1")]), "javascript", Duration::from_secs(1))
        .await
        .unwrap_err();

    match err {
        BackendError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "no capacity");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn execute_maps_bad_body_to_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/execute");
            then.status(200).body("<html>oops</html>");
        })
        .await;

    let err = backend(&server, None)
        .execute_code(&files(&[("a.js", "1")]), "javascript", Duration::from_secs(1))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Decode(_)), "got: {err:?}");
}

#[tokio::test]
async fn execute_gives_up_after_timeout_plus_grace() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/execute");
            then.status(200)
                .delay(Duration::from_millis(800))
                .json_body(json!({"success": true}));
        })
        .await;

    let config = RemoteConfig::new(server.base_url()).with_grace(Duration::from_millis(50));
    let err = RemoteBackend::new(config)
        .unwrap()
        .execute_code(&files(&[("a.js", "1")]), "javascript", Duration::from_millis(50))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Transport(_)), "got: {err:?}");
}

#[tokio::test]
async fn execute_reports_unreachable_service() {
    // Port 1 is reserved (tcpmux) and never listened on in test environments.
    let backend = RemoteBackend::new(RemoteConfig::new("http://127.0.0.1:1")).unwrap();

    let err = backend
        .execute_code(&files(&[("a.js", "1")]), "javascript", Duration::from_secs(1))
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("backend request failed: execute"), "got: {err}");
}

// =========================================================================
// vm_status
// =========================================================================

#[tokio::test]
async fn vm_status_returns_body_unchanged() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/vms/abc123/status");
            then.status(200)
                .json_body(json!({"state": "running", "vcpus": 2}));
        })
        .await;

    let status = backend(&server, None).vm_status("abc123").await.unwrap();

    mock.assert_calls_async(1).await;
    assert_eq!(status.0, json!({"state": "running", "vcpus": 2}));
}

#[tokio::test]
async fn vm_status_404_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/vms/missing/status");
            then.status(404).body("unknown vm");
        })
        .await;

    let err = backend(&server, None).vm_status("missing").await.unwrap_err();

    assert_eq!(err.to_string(), "backend returned 404: unknown vm");
}
