mod backend;
mod error;
mod types;

pub use backend::ExecutionBackend;
pub use error::{BackendError, Result};
pub use types::{ExecutionResult, FileMap, SourceFile, VmStatus};
