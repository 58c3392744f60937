//! Extraction of the reserved marker field from a raw definition node.
//!
//! Extraction is permissive: a marker that is neither an object nor an array
//! yields nothing, and array entries that do not look like `{"name", "value"}`
//! pairs are skipped. A bad custom field must never fail the host's load.

use crate::capture::identity::ModScope;
use crate::capture::pending::CapturedBatch;
use crate::config::CaptureOptions;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Copy the marker's children into a field map.
///
/// Returns `None` when the node has no marker. A marker of an unsupported
/// shape produces an empty map so the caller still treats it as a capture.
pub fn marker_fields(node: &Value, marker_field: &str) -> Option<BTreeMap<String, Value>> {
    let marker = node.get(marker_field)?;
    let fields = match marker {
        Value::Object(entries) => entries
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        Value::Array(entries) => entries.iter().filter_map(named_entry).collect(),
        other => {
            debug!(
                marker = marker_field,
                kind = json_kind(other),
                "Ignoring marker field that is not an object or array"
            );
            BTreeMap::new()
        }
    };
    Some(fields)
}

/// Explicit capture step: extract the marker from `node` into a batch owned
/// by `scope`.
///
/// The returned batch is a token the host later hands to
/// [`FieldStore::bind`](crate::store::FieldStore::bind) once it knows the
/// entity name.
pub fn capture_marker(
    node: &Value,
    scope: ModScope,
    options: &CaptureOptions,
) -> Option<CapturedBatch> {
    let fields = marker_fields(node, &options.marker_field)?;
    Some(CapturedBatch { scope, fields })
}

fn named_entry(entry: &Value) -> Option<(String, Value)> {
    let Some(object) = entry.as_object() else {
        debug!(kind = json_kind(entry), "Skipping marker entry that is not an object");
        return None;
    };
    if object.contains_key("name") {
        let pair = name_value_pair(object);
        if pair.is_none() {
            debug!("Skipping marker entry without a string name and a value");
        }
        return pair;
    }
    // `[{"tier": 3}]` is accepted as a single-field entry.
    if object.len() == 1 {
        return object
            .iter()
            .next()
            .map(|(name, value)| (name.clone(), value.clone()));
    }
    debug!("Skipping marker entry without a name/value pair");
    None
}

fn name_value_pair(object: &Map<String, Value>) -> Option<(String, Value)> {
    let name = object.get("name")?.as_str()?;
    let value = object.get("value")?;
    Some((name.to_string(), value.clone()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
