//! HTTP front door for code execution.
//!
//! Two independent apps live here. [`server::gateway_app`] validates
//! execution requests and forwards them to an [`exec_backend::ExecutionBackend`];
//! [`server::stub_app`] is a placeholder API with a health check.

pub mod error;
pub mod request;
pub mod response;
pub mod run;
pub mod server;
pub mod stub;

pub use error::{GatewayError, GatewayResult, RunError};
pub use request::{DEFAULT_TIMEOUT, ExecutionRequest, FieldError};
pub use response::{ErrorEnvelope, ExecutionResponse};
pub use server::{GatewayConfig, gateway_app, serve, stub_app};
