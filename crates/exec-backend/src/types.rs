use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// One source file as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

/// File name to file content, as handed to a backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMap(BTreeMap<String, String>);

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from submitted files. A later file with the same name
    /// replaces the earlier one.
    pub fn from_files<I>(files: I) -> Self
    where
        I: IntoIterator<Item = SourceFile>,
    {
        let mut map = Self::new();
        for file in files {
            map.insert(file.name, file.content);
        }
        map
    }

    /// Returns the previous content if `name` was already present.
    pub fn insert(&mut self, name: String, content: String) -> Option<String> {
        self.0.insert(name, content)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total size of all file contents in bytes.
    pub fn content_bytes(&self) -> usize {
        self.0.values().map(String::len).sum()
    }
}

/// Outcome of a single execution as reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Wall-clock time in milliseconds, kept exactly as the backend sent it.
    #[serde(default = "zero")]
    pub execution_time: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<String>>,
}

impl Default for ExecutionResult {
    fn default() -> Self {
        Self {
            success: false,
            output: None,
            error: None,
            execution_time: zero(),
            logs: None,
        }
    }
}

fn zero() -> Number {
    Number::from(0u64)
}

/// Backend-defined VM status, never interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VmStatus(pub serde_json::Value);
