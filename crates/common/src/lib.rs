//! Common types for the roost workspace

mod clock;
mod env;
mod error;
pub mod telemetry;

pub use clock::now_ms;
pub use env::{LOG_LEVEL_ENV, PROXY_ENV, ProcessEnv};
pub use error::{Error, Result};
