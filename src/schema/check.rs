use serde_json::{Map, Value};

use super::{info_key_for, is_info_key};
use crate::error::{Error, Result, join_path, row_path};
use crate::kind::{element_mix, shape_of};

/// Validate a schema on its own: every data key has an `__key` twin, every
/// table declares at most one prototype row and never mixes rows with values.
/// Prototype rows are checked like any other schema object.
pub fn check_schema(schema: &Value) -> Result<()> {
    match schema {
        Value::Object(map) => check_object(map, ""),
        other => Err(Error::InvalidDocument { path: String::new(), found: shape_of(other) }),
    }
}

fn check_object(map: &Map<String, Value>, path: &str) -> Result<()> {
    for (key, value) in map {
        if is_info_key(key) { continue; }
        let here = join_path(path, key);
        if !map.contains_key(&info_key_for(key)) {
            return Err(Error::MissingInfoKey { path: here, key: key.clone() });
        }
        match value {
            Value::Object(inner) => check_object(inner, &here)?,
            Value::Array(xs) => check_table(xs, &here)?,
            _ => {}
        }
    }
    Ok(())
}

fn check_table(xs: &[Value], path: &str) -> Result<()> {
    let (has_objects, has_values) = element_mix(xs);
    if has_objects && has_values {
        return Err(Error::MixedArray { path: path.to_string() });
    }
    let rows: Vec<&Map<String, Value>> = xs.iter().filter_map(Value::as_object).collect();
    if rows.len() > 1 {
        return Err(Error::MultiRowTable { path: path.to_string(), rows: rows.len() });
    }
    match rows.first() {
        Some(prototype) => check_object(prototype, &row_path(path, 0)),
        None => Ok(()),
    }
}
