//! Schema enforcement for content documents.
//!
//! A schema is itself a JSON document: every data key `k` carries a sibling
//! info-key `__k` describing it, and an array holding one object declares a
//! table whose rows take that object's shape. Enforcement runs three passes:
//!
//! 1. [`check_schema`] validates the schema on its own (skippable).
//! 2. the reject-pass fails on undeclared keys and shape mismatches.
//! 3. the materialize-pass adds a default for every declared key the
//!    content lacks, recursing through objects and table rows.
//!
//! The caller's content is never mutated; a completed copy is returned.
pub mod check;
mod materialize;
mod reject;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::kind::shape_of;

pub use check::check_schema;

/// Marker prefix of an info-key.
pub const INFO_PREFIX: &str = "__";

pub fn is_info_key(key: &str) -> bool { key.starts_with(INFO_PREFIX) }

pub fn info_key_for(key: &str) -> String { format!("{INFO_PREFIX}{key}") }

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnforceOptions {
    /// Give every table left empty after enforcement one blank prototype row.
    pub add_empty_table_rows: bool,
    /// Trust the schema and skip [`check_schema`].
    pub skip_schema_check: bool,
}

/// Check `schema`, reject non-conforming `content`, and return a completed copy.
///
/// A blank string `""` is accepted for any scalar field, whatever the schema's
/// primitive type, since it is the default this function writes.
pub fn enforce_schema(schema: &Value, content: &Value) -> Result<Value> {
    enforce_schema_with(schema, content, EnforceOptions::default())
}

pub fn enforce_schema_with_tables(schema: &Value, content: &Value) -> Result<Value> {
    enforce_schema_with(schema, content, EnforceOptions { add_empty_table_rows: true, ..Default::default() })
}

pub fn enforce_schema_no_check(schema: &Value, content: &Value) -> Result<Value> {
    enforce_schema_with(schema, content, EnforceOptions { skip_schema_check: true, ..Default::default() })
}

pub fn enforce_schema_with(schema: &Value, content: &Value, options: EnforceOptions) -> Result<Value> {
    if !options.skip_schema_check {
        check_schema(schema)?;
    }
    let Value::Object(schema_map) = schema else {
        return Err(Error::InvalidDocument { path: String::new(), found: shape_of(schema) });
    };

    let mut updated = content.clone();
    let Value::Object(fields) = &mut updated else {
        return Err(Error::InvalidDocument { path: String::new(), found: shape_of(content) });
    };

    reject::reject_incorrect_fields(schema_map, fields, "")?;
    materialize::add_new_fields(schema_map, fields, options.add_empty_table_rows);

    tracing::debug!(keys = fields.len(), ?options, "schema enforced");
    Ok(updated)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::kind::{Shape, is_array};
    use serde_json::json;

    fn kind_of(r: Result<Value>) -> ErrorKind { r.unwrap_err().kind() }

    fn rows_schema() -> Value {
        json!({
            "a": "Topic", "__a": "Param a info",
            "b": "Date", "__b": "Param b info",
            "c": [{
                "a": "Event", "__a": "Param a info",
                "b": "Detail", "__b": "Param b info",
                "c": ["neato", "burrito"], "__c": "Param c info",
                "d": "Can't touch this.", "__d": "Param d info",
                "__e": "Param e info",
                "e": {
                    "a": "look", "__a": "Param a info",
                    "b": "a sub-object", "__b": "Param b info",
                    "c": "how cool", "__c": "Param c info",
                },
            }],
            "__c": "Param c info",
            "d": [{"a": "Field content", "__a": "Field a info"}],
            "__d": "Table d info",
        })
    }

    // ---- check_schema ---- //

    #[test]
    fn check_detects_missing_info_keys() {
        let schema = json!({"a": "Example.", "__a": "Thing info", "b": "Example."});
        let err = check_schema(&schema).unwrap_err();
        assert_eq!(err, Error::MissingInfoKey { path: "b".into(), key: "b".into() });
    }

    #[test]
    fn check_detects_deep_missing_info_keys() {
        let schema = json!({
            "a": {"b": {"c": {"d": "No info on this one."}, "__c": "c info"}, "__b": "B info"},
            "__a": "a info",
        });
        let err = check_schema(&schema).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingInfoKey);
        assert_eq!(err.path(), "a.b.c.d");
    }

    #[test]
    fn check_detects_multi_row_tables() {
        let schema = json!({
            "a": [
                {"b": "This is a field", "__b": "Field info"},
                {"c": "This is a field", "__c": "Field info"},
            ],
            "__a": "A table",
        });
        assert_eq!(check_schema(&schema).unwrap_err(), Error::MultiRowTable { path: "a".into(), rows: 2 });
    }

    #[test]
    fn check_detects_mixed_arrays() {
        let schema = json!({"b": ["Value", {"c": "x", "__c": "i"}], "__b": "info"});
        assert_eq!(check_schema(&schema).unwrap_err().kind(), ErrorKind::MixedArray);
    }

    #[test]
    fn check_recurses_into_prototype_rows() {
        let schema = json!({"t": [{"x": "no info"}], "__t": "table"});
        assert_eq!(check_schema(&schema).unwrap_err().path(), "t[0].x");
    }

    #[test]
    fn check_accepts_well_formed_schema() {
        check_schema(&rows_schema()).unwrap();
        check_schema(&json!({})).unwrap();
        check_schema(&json!({"tags": [], "__tags": "free-form list"})).unwrap();
    }

    #[test]
    fn check_rejects_non_object_root() {
        assert_eq!(check_schema(&json!(["a"])).unwrap_err().kind(), ErrorKind::InvalidDocument);
    }

    // ---- reject-pass ---- //

    #[test]
    fn enforce_detects_unknown_keys() {
        let schema = json!({"a": "desc", "__a": "Thing info", "b": "desc", "__b": "B thing info"});
        let content = json!({"a": "I'm a monster, not a hero", "n": "But I'll make it on my own"});
        assert_eq!(enforce_schema(&schema, &content).unwrap_err(), Error::UnknownField { path: "n".into() });
    }

    #[test]
    fn enforce_detects_mistyped_values() {
        let schema = json!({"a": "Example.", "b": "Example."});
        let content = json!({"a": "x", "b": ["But I'll make it on my own"]});
        let err = enforce_schema_no_check(&schema, &content).unwrap_err();
        assert_eq!(err, Error::TypeMismatch { path: "b".into(), expected: Shape::String, found: Shape::Array });
    }

    #[test]
    fn enforce_detects_primitive_mismatch() {
        let schema = json!({"n": 3, "s": "text"});
        assert_eq!(kind_of(enforce_schema_no_check(&schema, &json!({"n": "three"}))), ErrorKind::TypeMismatch);
        assert_eq!(kind_of(enforce_schema_no_check(&schema, &json!({"s": true}))), ErrorKind::TypeMismatch);
        assert_eq!(kind_of(enforce_schema_no_check(&schema, &json!({"s": null}))), ErrorKind::TypeMismatch);
        enforce_schema_no_check(&schema, &json!({"n": 4, "s": "other"})).unwrap();
    }

    #[test]
    fn enforce_detects_embedded_unknown_keys() {
        let schema = json!({"a": "x", "b": {"c": "x", "d": "x"}});
        let content = json!({"a": "They think they know it all", "b": {"c": "nightmare", "wrong": "disaster"}});
        assert_eq!(enforce_schema_no_check(&schema, &content).unwrap_err().path(), "b.wrong");
    }

    #[test]
    fn enforce_detects_unknown_keys_in_table_rows() {
        let schema = json!({"a": "x", "b": [{"c": "x", "d": "x"}]});
        let content = json!({
            "a": "They think they know it all",
            "b": [{"c": "nightmare", "d": "disaster"}, {"c": "that's what they", "wrong": "always said"}],
        });
        assert_eq!(enforce_schema_no_check(&schema, &content).unwrap_err(), Error::UnknownField { path: "b[1].wrong".into() });
    }

    #[test]
    fn enforce_rejects_mixed_arrays_on_either_side() {
        let schema = json!({"b": ["Value", {"c": "x", "d": "x"}]});
        let content = json!({"b": ["Test", "Things"]});
        assert_eq!(kind_of(enforce_schema_no_check(&schema, &content)), ErrorKind::MixedArray);

        let schema = json!({"b": ["Value"]});
        let content = json!({"b": ["Test", {"c": "x"}]});
        assert_eq!(kind_of(enforce_schema_no_check(&schema, &content)), ErrorKind::MixedArray);
    }

    #[test]
    fn enforce_rejects_content_info_keys() {
        let schema = json!({"a": "x", "__a": "info"});
        assert_eq!(kind_of(enforce_schema(&schema, &json!({"__a": "sneaky"}))), ErrorKind::UnknownField);
    }

    #[test]
    fn rows_against_tables_without_prototype() {
        let empty = json!({"t": []});
        assert_eq!(
            enforce_schema_no_check(&empty, &json!({"t": [{"x": "1"}]})).unwrap_err(),
            Error::UnknownField { path: "t[0]".into() },
        );

        let scalars = json!({"t": ["a"]});
        assert_eq!(kind_of(enforce_schema_no_check(&scalars, &json!({"t": [{"x": "1"}]}))), ErrorKind::TypeMismatch);

        let table = json!({"t": [{"x": "1"}]});
        assert_eq!(kind_of(enforce_schema_no_check(&table, &json!({"t": ["loose"]}))), ErrorKind::TypeMismatch);
    }

    #[test]
    fn enforce_rejects_non_object_content() {
        assert_eq!(kind_of(enforce_schema_no_check(&json!({"a": "x"}), &json!(["a"]))), ErrorKind::InvalidDocument);
    }

    #[test]
    fn enforce_propagates_schema_check_failures() {
        let schema = json!({"a": "no info"});
        assert_eq!(kind_of(enforce_schema(&schema, &json!({}))), ErrorKind::MissingInfoKey);
        enforce_schema_no_check(&schema, &json!({})).unwrap();
    }

    // ---- materialize-pass ---- //

    #[test]
    fn enforce_adds_missing_values() {
        let schema = json!({"a": "x", "b": "x", "c": "x"});
        let content = json!({"a": "I'm a monster, not a hero"});
        let updated = enforce_schema_no_check(&schema, &content).unwrap();
        assert_eq!(updated, json!({"a": "I'm a monster, not a hero", "b": "", "c": ""}));
        // caller's copy is untouched
        assert_eq!(content, json!({"a": "I'm a monster, not a hero"}));
    }

    #[test]
    fn enforce_adds_keys_within_objects() {
        let schema = json!({"c": "Test", "a": {"b": "Neato", "d": {"e": {"f": "Burrito"}}}});
        let updated = enforce_schema_no_check(&schema, &json!({"c": "Thrice"})).unwrap();
        assert_eq!(updated["a"]["b"], json!(""));
        assert_eq!(updated["a"]["d"]["e"]["f"], json!(""));
    }

    #[test]
    fn enforce_adds_keys_to_each_table_row() {
        let content = json!({
            "a": "Topic", "b": "Date",
            "c": [
                {"a": "Event", "b": "Detail", "c": ["neato", "burrito"]},
                {"a": "Event", "b": "Detail", "c": ["neato", "burrito"]},
                {"a": "Event", "b": "Detail"},
            ],
        });
        let updated = enforce_schema(&rows_schema(), &content).unwrap();
        for x in 0..3usize {
            assert_eq!(updated["c"][x]["d"], json!(""));
            assert_eq!(updated["c"][x]["e"]["a"], json!(""));
        }
        assert_eq!(updated["c"][2]["c"], json!([]));
        assert_eq!(updated["c"][0]["c"], json!(["neato", "burrito"]));
        assert_eq!(updated["d"], json!([]));
    }

    #[test]
    fn enforce_never_adds_info_keys() {
        let content = json!({"a": "Topic", "c": [{"a": "Event"}]});
        let updated = enforce_schema_with_tables(&rows_schema(), &content).unwrap();
        let text = updated.to_string();
        assert!(!text.contains("\"__"), "info key leaked into {text}");
        assert!(updated.get("__a").is_none());
        assert!(updated["c"][0].get("__a").is_none());
        assert!(updated["c"][0]["e"].get("__a").is_none());
    }

    #[test]
    fn enforce_with_tables_populates_empty_tables() {
        let content = json!({"a": "Topic", "b": "Date", "c": []});
        let updated = enforce_schema_with_tables(&rows_schema(), &content).unwrap();
        assert_eq!(updated["c"].as_array().map(Vec::len), Some(1));
        assert_eq!(updated["c"][0]["a"], json!(""));
        assert_eq!(updated["c"][0]["e"]["a"], json!(""));
        assert_eq!(updated["d"], json!([{"a": ""}]));
        assert!(is_array(&updated["c"][0]["c"]));
    }

    #[test]
    fn enforce_with_tables_synthesizes_one_default_row() {
        let schema = json!({"t": [{"x": "ex", "__x": "i", "y": "ex", "__y": "i"}], "__t": "table"});
        let updated = enforce_schema_with_tables(&schema, &json!({})).unwrap();
        assert_eq!(updated, json!({"t": [{"x": "", "y": ""}]}));

        let kept = enforce_schema_with_tables(&schema, &json!({"t": [{"x": "1"}, {"y": "2"}]})).unwrap();
        assert_eq!(kept, json!({"t": [{"x": "1", "y": ""}, {"x": "", "y": "2"}]}));
    }

    #[test]
    fn enforce_is_idempotent() {
        let schema = json!({"n": 3, "flag": true, "obj": {"s": "x"}, "t": [{"k": 1}], "tags": ["a"]});
        let content = json!({"n": 7, "t": [{}]});
        let once = enforce_schema_no_check(&schema, &content).unwrap();
        let twice = enforce_schema_no_check(&schema, &once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once, json!({"n": 7, "t": [{"k": ""}], "flag": "", "obj": {"s": ""}, "tags": []}));
    }

    #[test]
    fn blank_string_stands_in_for_any_scalar() {
        let schema = json!({"n": 3, "flag": true});
        let updated = enforce_schema_no_check(&schema, &json!({"n": "", "flag": ""})).unwrap();
        assert_eq!(updated, json!({"n": "", "flag": ""}));
        assert_eq!(kind_of(enforce_schema_no_check(&schema, &json!({"n": " "}))), ErrorKind::TypeMismatch);
    }

    #[test]
    fn null_prototype_fields_stay_null() {
        let updated = enforce_schema_no_check(&json!({"z": null}), &json!({})).unwrap();
        assert_eq!(updated, json!({"z": null}));
    }

    #[test]
    fn info_key_helpers() {
        assert!(is_info_key("__a"));
        assert!(!is_info_key("_a"));
        assert_eq!(info_key_for("rule"), "__rule");
    }
}
