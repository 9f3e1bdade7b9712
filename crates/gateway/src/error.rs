use std::time::Duration;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use exec_backend::BackendError;

use crate::request::FieldError;
use crate::response::ErrorEnvelope;

/// Startup and serving failures of the `fc-gateway` binary.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("config error: {0}")]
    Config(String),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Why a `POST /run` could not produce an execution envelope.
///
/// A backend that *ran* the code and reported failure is not a `RunError`;
/// that case is a 200 with `success: false`.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("{0}")]
    Body(#[from] JsonRejection),

    #[error("Validation failed")]
    Invalid(Vec<FieldError>),

    #[error("{0}")]
    Backend(#[from] BackendError),

    #[error("execution timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),
}

impl RunError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Body(rejection) => rejection.status(),
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Backend(_) | Self::TimedOut(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RunError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Body(rejection) => rejection.body_text(),
            other => other.to_string(),
        };
        let mut envelope = ErrorEnvelope::new(message);
        if let Self::Invalid(errors) = self {
            envelope = envelope.with_errors(errors);
        }
        (status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_message_is_its_display() {
        let err = RunError::from(BackendError::Transport("execute: connection refused".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "backend request failed: execute: connection refused"
        );
    }

    #[test]
    fn timeout_message_uses_millis() {
        let err = RunError::TimedOut(Duration::from_millis(35_000));
        assert_eq!(err.to_string(), "execution timed out after 35000ms");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_is_a_client_error() {
        let err = RunError::Invalid(vec![]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Validation failed");
    }
}
