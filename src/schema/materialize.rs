use serde_json::{Map, Value};

use super::is_info_key;

/// Add a default for every schema data key missing from `content`, then
/// descend into objects and table rows to do the same. Info keys are never
/// copied. With `add_rows`, an empty table gains one blank prototype row.
pub(crate) fn add_new_fields(schema: &Map<String, Value>, content: &mut Map<String, Value>, add_rows: bool) {
    for (key, declared) in schema {
        if is_info_key(key) { continue; }
        match declared {
            Value::Object(inner) => {
                let slot = content.entry(key.clone()).or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(fields) = slot {
                    add_new_fields(inner, fields, add_rows);
                }
            }
            Value::Array(xs) => {
                let slot = content.entry(key.clone()).or_insert_with(|| Value::Array(Vec::new()));
                let (Some(prototype), Value::Array(rows)) = (xs.iter().find_map(Value::as_object), slot) else {
                    continue;
                };
                for row in rows.iter_mut() {
                    if let Value::Object(fields) = row {
                        add_new_fields(prototype, fields, add_rows);
                    }
                }
                if add_rows && rows.is_empty() {
                    tracing::debug!(table = %key, "synthesizing blank prototype row");
                    rows.push(blank_row(prototype, add_rows));
                }
            }
            Value::Null => {
                content.entry(key.clone()).or_insert(Value::Null);
            }
            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                content.entry(key.clone()).or_insert_with(|| Value::String(String::new()));
            }
        }
    }
}

pub(crate) fn blank_row(prototype: &Map<String, Value>, add_rows: bool) -> Value {
    let mut fields = Map::new();
    add_new_fields(prototype, &mut fields, add_rows);
    Value::Object(fields)
}
