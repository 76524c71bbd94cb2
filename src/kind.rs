//! Structural classification of JSON nodes.
//!
//! Everything downstream switches on [`Kind`] instead of probing `Value`
//! variants ad hoc. [`Shape`] refines `Kind::Value` by primitive type and is
//! what the reject-pass compares.
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind { Object, Array, Value, Empty }

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shape { Null, Bool, Number, String, Array, Object }

pub fn classify(v: &Value) -> Kind {
    match v {
        Value::Null => Kind::Empty,
        Value::Array(_) => Kind::Array,
        Value::Object(_) => Kind::Object,
        Value::Bool(_) | Value::Number(_) | Value::String(_) => Kind::Value,
    }
}

pub fn shape_of(v: &Value) -> Shape {
    match v {
        Value::Null      => Shape::Null,
        Value::Bool(_)   => Shape::Bool,
        Value::Number(_) => Shape::Number,
        Value::String(_) => Shape::String,
        Value::Array(_)  => Shape::Array,
        Value::Object(_) => Shape::Object,
    }
}

pub fn is_object(v: &Value) -> bool { classify(v) == Kind::Object }
pub fn is_array(v: &Value) -> bool { classify(v) == Kind::Array }
pub fn is_value(v: &Value) -> bool { classify(v) == Kind::Value }

/// An array of objects whose fields are all scalars. Never fails; any
/// violation just yields `false`.
pub fn is_table(v: &Value) -> bool {
    let Value::Array(rows) = v else { return false };
    rows.iter().all(|row| match row {
        Value::Object(fields) => fields.values().all(is_value),
        _ => false,
    })
}

/// `(has_objects, has_values)` over the elements of an array.
pub(crate) fn element_mix(xs: &[Value]) -> (bool, bool) {
    let has_objects = xs.iter().any(is_object);
    let has_values = xs.iter().any(is_value);
    (has_objects, has_values)
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::Value => "value",
            Kind::Empty => "empty",
        })
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Shape::Null => "null",
            Shape::Bool => "boolean",
            Shape::Number => "number",
            Shape::String => "string",
            Shape::Array => "array",
            Shape::Object => "object",
        })
    }
}

// ------------------------------- Tests ------------------------------------ //
