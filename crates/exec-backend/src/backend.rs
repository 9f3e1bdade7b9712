use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ExecutionResult, FileMap, VmStatus};

/// Something that can run a set of source files and report on the VMs it
/// runs them in.
///
/// Execution failures inside the guest (compile errors, non-zero exits) are
/// reported through [`ExecutionResult::success`], not as `Err`. An `Err`
/// means the backend itself could not be reached or answered nonsense.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Human-readable name for this backend (e.g. "remote").
    fn name(&self) -> &str;

    /// Run `files` as a `language` program. `timeout` is the budget the
    /// caller grants the guest; enforcing it is up to the backend.
    async fn execute_code(
        &self,
        files: &FileMap,
        language: &str,
        timeout: Duration,
    ) -> Result<ExecutionResult>;

    /// Look up the backend's view of a VM. The value is passed through as-is.
    async fn vm_status(&self, vm_id: &str) -> Result<VmStatus>;
}
