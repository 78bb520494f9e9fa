//! Conversion between nested JSON message trees and flat dotted-key maps.
//!
//! Every leaf becomes a string and arrays are addressed by index
//! (`items.0.title`), so `unflatten(flatten(x))` rebuilds `x` with arrays
//! turned into index-keyed objects. Literal dots inside a key are escaped
//! with [`KEY_DOT_ESCAPE`] so that splitting on `.` stays unambiguous.

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Sentinel that stands in for a literal `.` inside a key segment.
pub const KEY_DOT_ESCAPE: &str = "~|~";

/// Insertion-ordered map from dotted key path to string value.
pub type FlatMap = IndexMap<String, String>;

pub fn escape_key(key: &str) -> String {
    key.replace('.', KEY_DOT_ESCAPE)
}

pub fn unescape_key(segment: &str) -> String {
    segment.replace(KEY_DOT_ESCAPE, ".")
}

/// Flatten a JSON tree into dotted keys.
///
/// `null` leaves, empty objects and empty arrays produce no entries.
/// Numbers and booleans keep their JSON text.
pub fn flatten(value: &Value) -> FlatMap {
    let mut result = FlatMap::new();
    flatten_into(value, String::new(), &mut result);
    result
}

fn flatten_into(value: &Value, prefix: String, result: &mut FlatMap) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten_into(val, join_path(&prefix, &escape_key(key)), result);
            }
        }
        Value::Array(arr) => {
            for (index, val) in arr.iter().enumerate() {
                flatten_into(val, join_path(&prefix, &index.to_string()), result);
            }
        }
        Value::Null => {}
        Value::String(s) => {
            result.insert(prefix, s.clone());
        }
        other => {
            result.insert(prefix, other.to_string());
        }
    }
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

/// Rebuild a nested JSON object from a flat map.
///
/// Nesting order follows the iteration order of `flat`. When a key needs an
/// object where a string leaf already sits, the leaf is replaced.
pub fn unflatten(flat: &FlatMap) -> Value {
    let mut root = Map::new();
    for (key, value) in flat {
        insert_path(&mut root, key, value);
    }
    Value::Object(root)
}

fn insert_path(root: &mut Map<String, Value>, key: &str, value: &str) {
    let segments: Vec<String> = key.split('.').map(unescape_key).collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        let entry = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(next) => next,
            _ => return,
        };
    }
    current.insert(last.clone(), Value::String(value.to_string()));
}

/// Parse JSON text into a flat map. Blank content counts as an empty object.
pub fn parse_flat(content: &str) -> Result<FlatMap> {
    if content.trim().is_empty() {
        return Ok(FlatMap::new());
    }
    let value: Value = serde_json::from_str(content)?;
    Ok(flatten(&value))
}

/// Read and flatten a resource file.
///
/// A missing file is an empty map unless `required` is set, which is the
/// case for the main locale's own files.
pub fn read_flat_file(path: &Path, required: bool) -> Result<FlatMap> {
    if !path.exists() {
        if required {
            bail!("Main locale file '{}' does not exist.", path.display());
        }
        return Ok(FlatMap::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {}", path.display()))?;
    parse_flat(&content).with_context(|| format!("Failed to parse JSON file: {}", path.display()))
}
