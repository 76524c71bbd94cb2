//! Schema enforcement and path flattening for rule documents.
//!
//! - [`kind`] classifies JSON nodes as object / array / value / empty.
//! - [`pathify`] flattens a document into dotted-path `values` and `tables`.
//! - [`schema`] validates schemas, rejects non-conforming content and fills
//!   in defaults for declared fields.
//! - [`rule`] builds and grows rule documents on top of [`schema`].
//!
//! Every entry point is a pure function over its inputs; nothing here does
//! I/O. Recursion depth follows document nesting depth.
pub mod diagnostics;
pub mod error;
pub mod kind;
pub mod pathify;
pub mod rule;
pub mod scalar;
pub mod schema;

pub use diagnostics::{Anomaly, AnomalyKind, DiagnosticSink, TracingSink};
pub use error::{Error, ErrorKind, Result};
pub use kind::{Kind, Shape, classify, is_array, is_object, is_table, is_value};
pub use pathify::{Blob, Row, pathify, pathify_with_sink};
pub use rule::{
    RULE_SCHEMA, add_new_case, add_new_input_condition, add_new_output_assertion,
    generate_case_value, generate_new_rule,
};
pub use scalar::{PathValue, Scalar, normalize_value};
pub use schema::{
    EnforceOptions, check_schema, enforce_schema, enforce_schema_no_check, enforce_schema_with,
    enforce_schema_with_tables,
};
