//! Destinations for normalized metric values.
//!
//! The pipeline only ever calls [`MetricSink::set`]. Reads happen elsewhere,
//! concurrently: the HTTP endpoint gathers the Prometheus registry, and the
//! replay command prints a [`MemorySink`] snapshot.

use super::catalog::MetricCatalog;
use crate::utils::error::SinkError;
use log::debug;
use prometheus::{Gauge, Opts, Registry};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// Last-write-wins store of current metric values
pub trait MetricSink {
    /// Set `name` to `value`; unknown names are ignored
    fn set(&self, name: &str, value: f64);
}

/// Sink backed by Prometheus gauges
///
/// **Public** - the production sink; its registry is served over HTTP
pub struct PrometheusSink {
    registry: Registry,
    gauges: HashMap<String, Gauge>,
}

impl PrometheusSink {
    /// Create a sink with an empty registry
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            gauges: HashMap::new(),
        }
    }

    /// Create a sink with one gauge per catalog entry
    ///
    /// # Errors
    /// * `SinkError::RegistrationFailed` - duplicate name or invalid name/help
    pub fn for_catalog(catalog: &MetricCatalog) -> Result<Self, SinkError> {
        let mut sink = Self::new();
        for spec in catalog.entries() {
            sink.register_gauge(&spec.name, &spec.help)?;
        }
        Ok(sink)
    }

    /// Register an additional gauge, e.g. one set once at startup
    pub fn register_gauge(&mut self, name: &str, help: &str) -> Result<(), SinkError> {
        let gauge = Gauge::with_opts(Opts::new(name, help))?;
        self.registry.register(Box::new(gauge.clone()))?;
        self.gauges.insert(name.to_string(), gauge);
        Ok(())
    }

    /// Registry to gather for exposition
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Current value of a gauge
    pub fn value(&self, name: &str) -> Option<f64> {
        self.gauges.get(name).map(Gauge::get)
    }
}

impl Default for PrometheusSink {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PrometheusSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.gauges.keys().collect();
        names.sort();
        f.debug_struct("PrometheusSink").field("gauges", &names).finish()
    }
}

impl MetricSink for PrometheusSink {
    fn set(&self, name: &str, value: f64) {
        match self.gauges.get(name) {
            Some(gauge) => gauge.set(value),
            None => debug!("Ignoring value for unregistered metric {}", name),
        }
    }
}

/// Sink that keeps values in memory
///
/// Unlike [`PrometheusSink`] it accepts any name.
#[derive(Debug, Default)]
pub struct MemorySink {
    values: RwLock<BTreeMap<String, f64>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
    }

    /// Copy of all current values, sorted by name
    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MetricSink for MemorySink {
    fn set(&self, name: &str, value: f64) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prometheus_sink_sets_registered_gauges() {
        let catalog = MetricCatalog::intel_gpu_top();
        let sink = PrometheusSink::for_catalog(&catalog).unwrap();

        sink.set("igpu_rc6", 88.5);
        sink.set("igpu_rc6", 90.0);
        sink.set("igpu_not_registered", 1.0);

        assert_eq!(sink.value("igpu_rc6"), Some(90.0));
        assert_eq!(sink.value("igpu_not_registered"), None);
        assert_eq!(sink.registry().gather().len(), catalog.len());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut sink = PrometheusSink::new();
        sink.register_gauge("igpu_device_id", "Intel GPU device id").unwrap();

        assert!(matches!(
            sink.register_gauge("igpu_device_id", "Intel GPU device id"),
            Err(SinkError::RegistrationFailed(_))
        ));
    }

    #[test]
    fn test_memory_sink_last_write_wins() {
        let sink = MemorySink::new();
        sink.set("a", 1.0);
        sink.set("a", 2.0);
        sink.set("b", 3.0);

        assert_eq!(sink.get("a"), Some(2.0));
        assert_eq!(sink.snapshot().len(), 2);
    }
}
