//! Output of metric values.
//!
//! Metrics leave the process through the Prometheus text exposition,
//! served over HTTP.

pub mod exposition;

// Re-export main functions
pub use exposition::{render_text, MetricsServer, ServerHandle};
