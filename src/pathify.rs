//! Flatten a nested document into dotted-path projections.
//!
//! Scalars (and arrays of scalars) land in `values`; arrays of objects land in
//! `tables`, one flattened row per object. A row is pathified like a whole
//! document but must not yield tables of its own.
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::diagnostics::{Anomaly, AnomalyKind, DiagnosticSink, TracingSink};
use crate::error::{Error, Result, join_path, row_path};
use crate::kind::{Kind, classify, shape_of};
use crate::scalar::{PathValue, normalize_value};

pub type Row = IndexMap<String, PathValue>;

/// `{ values, tables }`, both keyed by dot-joined path in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Blob {
    pub values: IndexMap<String, PathValue>,
    pub tables: IndexMap<String, Vec<Row>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode { Document, Row }

/// Pathify a document, sending anomalies to `tracing`.
pub fn pathify(document: &Value) -> Result<Blob> {
    pathify_with_sink(document, &mut TracingSink)
}

pub fn pathify_with_sink<S: DiagnosticSink + ?Sized>(document: &Value, sink: &mut S) -> Result<Blob> {
    pathify_base(document, Mode::Document, "", sink)
}

/// `origin` is where `document` sits in the outermost document; it only
/// prefixes reported paths.
fn pathify_base<S: DiagnosticSink + ?Sized>(
    document: &Value,
    mode: Mode,
    origin: &str,
    sink: &mut S,
) -> Result<Blob> {
    match classify(document) {
        Kind::Object | Kind::Array => {}
        Kind::Value | Kind::Empty => {
            return Err(Error::InvalidDocument { path: origin.to_string(), found: shape_of(document) });
        }
    }

    let mut blob = Blob::default();
    let mut path: Vec<&str> = Vec::new();
    recurse_and_add(&mut path, document, &mut blob, origin, sink)?;

    if mode == Mode::Row && !blob.tables.is_empty() {
        return Err(Error::RowContainsTable { path: origin.to_string() });
    }
    Ok(blob)
}

fn pathify_row<S: DiagnosticSink + ?Sized>(row: &Value, origin: &str, sink: &mut S) -> Result<Row> {
    Ok(pathify_base(row, Mode::Row, origin, sink)?.values)
}

fn recurse_and_add<'a, S: DiagnosticSink + ?Sized>(
    path: &mut Vec<&'a str>,
    value: &'a Value,
    blob: &mut Blob,
    origin: &str,
    sink: &mut S,
) -> Result<()> {
    let value_path = path.join(".");
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                path.push(k.as_str());
                let out = recurse_and_add(path, v, blob, origin, sink);
                path.pop();
                out?;
            }
        }
        Value::Array(xs) => {
            let mut rows: Vec<Row> = Vec::new();
            let mut scalars = Vec::new();
            for (i, el) in xs.iter().enumerate() {
                let el_path = row_path(&join_path(origin, &value_path), i);
                match classify(el) {
                    Kind::Object => rows.push(pathify_row(el, &el_path, sink)?),
                    Kind::Value => scalars.extend(normalize_value(el)),
                    Kind::Array => sink.report(Anomaly { path: el_path, kind: AnomalyKind::NestedArray, node: el.clone() }),
                    Kind::Empty => sink.report(Anomaly { path: el_path, kind: AnomalyKind::EmptyElement, node: el.clone() }),
                }
            }
            if !rows.is_empty() { blob.tables.insert(value_path.clone(), rows); }
            if !scalars.is_empty() { blob.values.insert(value_path, PathValue::List(scalars)); }
        }
        Value::Null => {
            sink.report(Anomaly {
                path: join_path(origin, &value_path),
                kind: AnomalyKind::EmptyValue,
                node: Value::Null,
            });
        }
        Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            if let Some(s) = normalize_value(value) {
                blob.values.insert(value_path, PathValue::Scalar(s));
            }
        }
    }
    Ok(())
}

// ------------------------------- Tests ------------------------------------ //
