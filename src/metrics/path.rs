//! Safe nested lookups into a decoded record.

use serde_json::Value;

/// Outcome of reading a numeric field out of a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup {
    /// Some level of the path is missing or is not an object
    Absent,

    /// The leaf exists but cannot be read as a number
    NotNumeric,

    /// The leaf, coerced to `f64`
    Value(f64),
}

impl Lookup {
    /// The numeric value, if any
    pub fn value(self) -> Option<f64> {
        match self {
            Lookup::Value(v) => Some(v),
            Lookup::Absent | Lookup::NotNumeric => None,
        }
    }
}

/// Walk `path` through nested objects
///
/// **Public** - returns `None` as soon as a level is missing or not an object
pub fn lookup<'a, I, S>(record: &'a Value, path: I) -> Option<&'a Value>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    path.into_iter()
        .try_fold(record, |node, key| node.as_object()?.get(key.as_ref()))
}

/// Walk `path` and coerce the leaf to a number
pub fn lookup_f64<I, S>(record: &Value, path: I) -> Lookup
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match lookup(record, path) {
        None => Lookup::Absent,
        Some(leaf) => coerce_f64(leaf).map_or(Lookup::NotNumeric, Lookup::Value),
    }
}

/// Coerce a JSON scalar to `f64`
///
/// Numbers pass through, numeric strings are parsed, booleans map to 1/0.
/// Null, arrays, objects and other strings are not numeric.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
