//! Metric catalog, normalization and sinks.
//!
//! This module transforms decoded records into:
//! - One value per catalog entry (normalizer)
//! - Gauge updates in a sink (Prometheus or in-memory)

pub mod catalog;
pub mod normalizer;
pub mod path;
pub mod sink;

// Re-export main types and functions
pub use catalog::{EngineField, MetricCatalog, MetricSource, MetricSpec};
pub use normalizer::{engine_value, normalize, resolve};
pub use path::{coerce_f64, lookup, lookup_f64, Lookup};
pub use sink::{MemorySink, MetricSink, PrometheusSink};
