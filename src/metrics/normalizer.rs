//! Normalization of a decoded record onto the metric catalog.
//!
//! Every catalog entry gets exactly one value per record. A field that is
//! missing, or present but not numeric, takes the entry's default, so a
//! sample always overwrites the whole previous snapshot.

use super::catalog::{EngineField, MetricCatalog, MetricSource, MetricSpec};
use super::path::{lookup_f64, Lookup};
use crate::stream::Record;
use crate::utils::config::ENGINES_KEY;
use log::debug;

/// Map a record onto the catalog
///
/// **Public** - main entry point for normalization
///
/// # Arguments
/// * `record` - Decoded sample (any JSON value; non-objects yield all defaults)
/// * `catalog` - Metrics to produce
///
/// # Returns
/// One `(name, value)` pair per catalog entry, in catalog order
pub fn normalize<'c>(record: &Record, catalog: &'c MetricCatalog) -> Vec<(&'c str, f64)> {
    catalog
        .entries()
        .iter()
        .map(|spec| (spec.name.as_str(), resolve(record, spec)))
        .collect()
}

/// Value of a single catalog entry for `record`
pub fn resolve(record: &Record, spec: &MetricSpec) -> f64 {
    let value = match &spec.source {
        MetricSource::Engine { keys, field, .. } => engine_value(record, keys.as_slice(), *field),
        MetricSource::Path { path } => {
            let lookup = lookup_f64(record, path);
            if lookup == Lookup::NotNumeric {
                debug!("{}: {} is not numeric, using default", spec.name, path.join("."));
            }
            lookup.value()
        }
    };

    value.unwrap_or(spec.default)
}

/// First alias under `engines` whose `field` coerces to a number
///
/// **Public** - used directly in tests of alias priority
///
/// Aliases are tried in order; a key that is missing or not numeric falls
/// through to the next one.
pub fn engine_value<S: AsRef<str>>(record: &Record, keys: &[S], field: EngineField) -> Option<f64> {
    keys.iter().find_map(|key| {
        let key = key.as_ref();
        let lookup = lookup_f64(record, [ENGINES_KEY, key, field.as_str()]);
        if lookup == Lookup::NotNumeric {
            debug!("engines.{}.{} is not numeric, trying next alias", key, field);
        }
        lookup.value()
    })
}
