use exec_backend::ExecutionResult;
use serde::Serialize;
use serde_json::Number;

use crate::request::FieldError;

/// The 200 body of `POST /run`.
///
/// `stdout` mirrors `output`, and `stderr` mirrors `error`, for clients that
/// expect process-style field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResponse {
    pub success: bool,
    pub output: Option<String>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub error: Option<String>,
    pub execution_time: Number,
    pub logs: Vec<String>,
}

impl From<ExecutionResult> for ExecutionResponse {
    fn from(result: ExecutionResult) -> Self {
        // A successful run never reports an error, whatever the backend sent.
        let error = if result.success { None } else { result.error };
        Self {
            success: result.success,
            stdout: result.output.clone(),
            output: result.output,
            stderr: error.clone(),
            error,
            execution_time: result.execution_time,
            logs: result.logs.unwrap_or_default(),
        }
    }
}

/// Body of every non-200 `POST /run` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    pub output: Option<String>,
    pub stderr: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        let error = message.into();
        Self {
            success: false,
            stderr: error.clone(),
            error,
            output: None,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }
}
