mod serve;
mod stub;

pub use serve::{ServeArgs, run_serve};
pub use stub::{StubArgs, run_stub};
