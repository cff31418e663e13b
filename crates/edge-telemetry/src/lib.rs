//! # Edge Telemetry
//!
//! Structured logging for the edge helper tools.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use edge_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `EDGE_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `EDGE_JSON_LOGS` | `false` | JSON output (defaults to true in containers) |
//! | `NO_COLOR` | unset | Disable ANSI colours |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Span wrapping one helper operation.
///
/// # Example
///
/// ```rust,ignore
/// use edge_telemetry::operation_span;
///
/// let _span = operation_span!("generate_genesis", node_list = %path.display()).entered();
/// ```
#[macro_export]
macro_rules! operation_span {
    ($name:expr) => {
        tracing::info_span!("operation", op = $name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!("operation", op = $name, $($field)*)
    };
}
