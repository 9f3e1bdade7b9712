use std::time::Duration;

use exec_backend::{FileMap, SourceFile};
use serde::Serialize;
use serde_json::{Map, Value};

/// Used when a request carries no `timeout`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// One rejected field of an execution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A validated `POST /run` body.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRequest {
    pub files: Vec<SourceFile>,
    pub language: String,
    pub timeout: Duration,
}

impl ExecutionRequest {
    /// Validate a raw JSON body, collecting every problem rather than
    /// stopping at the first.
    pub fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let Some(obj) = body.as_object() else {
            return Err(vec![FieldError::new(
                "body",
                "request body must be a JSON object",
            )]);
        };

        let mut errors = Vec::new();
        let files = parse_files(obj, &mut errors);
        let language = match obj.get("language") {
            Some(Value::String(s)) => Some(s.clone()),
            _ => {
                errors.push(FieldError::new("language", "language must be a string"));
                None
            }
        };
        let timeout = parse_timeout(obj, &mut errors);

        match (files, language, timeout) {
            (Some(files), Some(language), Some(timeout)) => Ok(Self {
                files,
                language,
                timeout,
            }),
            _ => Err(errors),
        }
    }

    /// Collapse the submitted files into the map handed to the backend.
    pub fn file_map(&self) -> FileMap {
        FileMap::from_files(self.files.iter().cloned())
    }
}

fn parse_files(obj: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<Vec<SourceFile>> {
    let Some(Value::Array(items)) = obj.get("files") else {
        errors.push(FieldError::new("files", "files must be an array"));
        return None;
    };

    let before = errors.len();
    let mut files = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let Some(entry) = item.as_object() else {
            errors.push(FieldError::new(
                format!("files[{i}]"),
                "file must be an object",
            ));
            continue;
        };
        let name = entry.get("name").and_then(Value::as_str);
        let content = entry.get("content").and_then(Value::as_str);
        if name.is_none() {
            errors.push(FieldError::new(
                format!("files[{i}].name"),
                "name must be a string",
            ));
        }
        if content.is_none() {
            errors.push(FieldError::new(
                format!("files[{i}].content"),
                "content must be a string",
            ));
        }
        if let (Some(name), Some(content)) = (name, content) {
            files.push(SourceFile {
                name: name.to_string(),
                content: content.to_string(),
            });
        }
    }

    (errors.len() == before).then_some(files)
}

/// `timeout` may be absent, null, a number, or a numeric string. Fractional
/// milliseconds round up so a positive timeout never becomes zero.
fn parse_timeout(obj: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<Duration> {
    let millis = match obj.get("timeout") {
        None | Some(Value::Null) => return Some(DEFAULT_TIMEOUT),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if is_decimal(s) => s.parse::<f64>().ok(),
        Some(_) => None,
    };

    let Some(millis) = millis.filter(|ms| ms.is_finite()) else {
        errors.push(FieldError::new("timeout", "timeout must be numeric"));
        return None;
    };
    if millis < 0.0 {
        errors.push(FieldError::new("timeout", "timeout must not be negative"));
        return None;
    }
    let millis = millis.ceil();
    if millis > u64::MAX as f64 {
        errors.push(FieldError::new("timeout", "timeout is out of range"));
        return None;
    }
    Some(Duration::from_millis(millis as u64))
}

/// Plain decimal notation: optional sign, digits, optional fraction.
/// No exponent and no surrounding whitespace.
fn is_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (int, frac) = unsigned.split_once('.').unwrap_or(("", unsigned));
    !frac.is_empty()
        && frac.bytes().all(|b| b.is_ascii_digit())
        && int.bytes().all(|b| b.is_ascii_digit())
}
