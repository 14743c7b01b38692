//! Logging and tracing setup shared by the growline binaries.
//!
//! - **Logging**: human-readable or JSON output via `tracing-subscriber`,
//!   filtered by `RUST_LOG` with a caller-supplied fallback level
//! - **Tracing**: trace/span ID generation and per-operation spans so every
//!   line a command logs can be correlated

pub mod logging;
pub mod tracing_setup;
