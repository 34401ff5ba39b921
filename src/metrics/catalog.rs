//! The metric catalog: every gauge the exporter publishes per sample,
//! and where in a record its value comes from.
//!
//! The catalog is plain data built once at startup and passed to both the
//! normalizer and the sink. Nothing in the normalizer knows about specific
//! `intel_gpu_top` field names.

use crate::utils::config::{
    EngineAliases, DEFAULT_METRIC_VALUE, DIRECT_FIELDS, ENGINE_ALIASES,
};
use serde::Serialize;
use std::fmt;

/// Per-engine utilisation fields reported by `intel_gpu_top`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineField {
    Busy,
    Sema,
    Wait,
}

impl EngineField {
    pub const ALL: [EngineField; 3] = [EngineField::Busy, EngineField::Sema, EngineField::Wait];

    /// Key of this field inside an engine object
    pub fn as_str(self) -> &'static str {
        match self {
            EngineField::Busy => "busy",
            EngineField::Sema => "sema",
            EngineField::Wait => "wait",
        }
    }
}

impl fmt::Display for EngineField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a catalog entry reads its value from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricSource {
    /// `engines.<key>.<field>` for the first key in `keys` that yields a number
    Engine {
        engine: String,
        keys: Vec<String>,
        field: EngineField,
    },

    /// A fixed nested path, e.g. `["power", "GPU"]`
    Path { path: Vec<String> },
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSpec {
    /// Canonical metric name
    pub name: String,

    /// Help text for the exposition
    pub help: String,

    /// Source of the value in a record
    pub source: MetricSource,

    /// Value used when the source is absent or not numeric
    pub default: f64,
}

/// Ordered set of metrics produced for every record
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricCatalog {
    entries: Vec<MetricSpec>,
}

impl MetricCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog for `intel_gpu_top -J` output
    ///
    /// **Public** - used by the run and replay commands
    pub fn intel_gpu_top() -> Self {
        let catalog = ENGINE_ALIASES
            .iter()
            .fold(Self::new(), |catalog, aliases| catalog.with_engine(aliases));

        DIRECT_FIELDS
            .iter()
            .fold(catalog, |catalog, (name, help, path)| {
                catalog.with_path(name, help, path)
            })
    }

    /// Add busy/sema/wait entries for one engine
    ///
    /// Metric names are `igpu_engines_<engine>_<field>`.
    pub fn with_engine(mut self, aliases: &EngineAliases) -> Self {
        let keys: Vec<String> = aliases.keys.iter().map(|k| k.to_string()).collect();

        for field in EngineField::ALL {
            self.entries.push(MetricSpec {
                name: format!("igpu_engines_{}_{}", aliases.engine, field),
                help: format!("{} {} utilisation %", aliases.label, field),
                source: MetricSource::Engine {
                    engine: aliases.engine.to_string(),
                    keys: keys.clone(),
                    field,
                },
                default: DEFAULT_METRIC_VALUE,
            });
        }

        self
    }

    /// Add an entry read from a nested path
    pub fn with_path(mut self, name: &str, help: &str, path: &[&str]) -> Self {
        self.entries.push(MetricSpec {
            name: name.to_string(),
            help: help.to_string(),
            source: MetricSource::Path {
                path: path.iter().map(|p| p.to_string()).collect(),
            },
            default: DEFAULT_METRIC_VALUE,
        });
        self
    }

    /// All entries, in catalog order
    pub fn entries(&self) -> &[MetricSpec] {
        &self.entries
    }

    /// Look up an entry by canonical name
    pub fn get(&self, name: &str) -> Option<&MetricSpec> {
        self.entries.iter().find(|spec| spec.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
