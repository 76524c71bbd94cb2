//! Failure kinds raised by the schema passes, the pathifier and the rule helpers.
//!
//! Every failure aborts the operation that raised it. Paths are dot-joined from
//! the document root; table rows render as `key[i]`.

use thiserror::Error;

use crate::kind::Shape;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("The content includes a key that is not part of the schema (at `{path}`)")]
    UnknownField { path: String },

    #[error("Detected a content key with a value type that does not match the schema (at `{path}`: expected {expected}, found {found})")]
    TypeMismatch { path: String, expected: Shape, found: Shape },

    #[error("Arrays may contain objects or values, but not both (at `{path}`)")]
    MixedArray { path: String },

    #[error("Schema key does not have a corresponding infoKey, add __{key} for {key} (at `{path}`)")]
    MissingInfoKey { path: String, key: String },

    #[error("Schema tables must have only one schema object in them (at `{path}`, found {rows})")]
    MultiRowTable { path: String, rows: usize },

    #[error("Document is not valid (at `{path}`): expected an object or array, found {found}")]
    InvalidDocument { path: String, found: Shape },

    #[error("Table rows include tables (at `{path}`)")]
    RowContainsTable { path: String },

    #[error("A condition in `{list}` has an incorrect number of cases (at `{path}`: expected {expected}, found {found})")]
    ConditionCaseCountMismatch { list: String, path: String, expected: usize, found: usize },
}

/// Fieldless projection of [`Error`], for callers that branch on the kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownField,
    TypeMismatch,
    MixedArray,
    MissingInfoKey,
    MultiRowTable,
    InvalidDocument,
    RowContainsTable,
    ConditionCaseCountMismatch,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownField { .. } => ErrorKind::UnknownField,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::MixedArray { .. } => ErrorKind::MixedArray,
            Error::MissingInfoKey { .. } => ErrorKind::MissingInfoKey,
            Error::MultiRowTable { .. } => ErrorKind::MultiRowTable,
            Error::InvalidDocument { .. } => ErrorKind::InvalidDocument,
            Error::RowContainsTable { .. } => ErrorKind::RowContainsTable,
            Error::ConditionCaseCountMismatch { .. } => ErrorKind::ConditionCaseCountMismatch,
        }
    }

    /// Dotted path of the node that triggered the failure.
    pub fn path(&self) -> &str {
        match self {
            Error::UnknownField { path }
            | Error::TypeMismatch { path, .. }
            | Error::MixedArray { path }
            | Error::MissingInfoKey { path, .. }
            | Error::MultiRowTable { path, .. }
            | Error::InvalidDocument { path, .. }
            | Error::RowContainsTable { path }
            | Error::ConditionCaseCountMismatch { path, .. } => path,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::UnknownField => "UnknownField",
            ErrorKind::TypeMismatch => "TypeMismatch",
            ErrorKind::MixedArray => "MixedArray",
            ErrorKind::MissingInfoKey => "MissingInfoKey",
            ErrorKind::MultiRowTable => "MultiRowTable",
            ErrorKind::InvalidDocument => "InvalidDocument",
            ErrorKind::RowContainsTable => "RowContainsTable",
            ErrorKind::ConditionCaseCountMismatch => "ConditionCaseCountMismatch",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "UnknownField" => ErrorKind::UnknownField,
            "TypeMismatch" => ErrorKind::TypeMismatch,
            "MixedArray" => ErrorKind::MixedArray,
            "MissingInfoKey" => ErrorKind::MissingInfoKey,
            "MultiRowTable" => ErrorKind::MultiRowTable,
            "InvalidDocument" => ErrorKind::InvalidDocument,
            "RowContainsTable" => ErrorKind::RowContainsTable,
            "ConditionCaseCountMismatch" => ErrorKind::ConditionCaseCountMismatch,
            other => return Err(format!("unknown error kind: {other}")),
        })
    }
}

/// Join a parent path and a key the way error paths are rendered.
pub(crate) fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() { key.to_string() } else { format!("{parent}.{key}") }
}

pub(crate) fn row_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}
