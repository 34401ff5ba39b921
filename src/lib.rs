//! Intel GPU Exporter
//!
//! Exposes the statistics printed by `intel_gpu_top -J` as Prometheus
//! gauges.
//!
//! The core is a pipeline of three stages:
//! - [`stream::StreamFramer`] cuts complete JSON objects out of the raw output
//! - [`stream::decode`] turns each object into a record
//! - [`metrics::normalize`] maps a record onto the [`metrics::MetricCatalog`],
//!   absorbing field renames between kernel and driver generations
//!
//! [`pipeline::Pipeline`] drives the stages and publishes to a
//! [`metrics::MetricSink`].

pub mod commands;
pub mod gpu_top;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod stream;
pub mod utils;
