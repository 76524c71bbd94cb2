//! Non-fatal anomalies found while pathifying.
//!
//! Pathify is a best-effort projection: odd subtrees are reported here and
//! skipped instead of aborting the traversal. Callers choose where reports go.
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnomalyKind {
    /// An array element that is itself an array.
    NestedArray,
    /// A null element inside an array.
    EmptyElement,
    /// A null leaf.
    EmptyValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Anomaly {
    pub path: String,
    pub kind: AnomalyKind,
    pub node: Value,
}

pub trait DiagnosticSink {
    fn report(&mut self, anomaly: Anomaly);
}

/// Collects anomalies, for callers that want them alongside the blob.
impl DiagnosticSink for Vec<Anomaly> {
    fn report(&mut self, anomaly: Anomaly) { self.push(anomaly); }
}

/// Forwards anomalies to `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, anomaly: Anomaly) {
        tracing::warn!(path = %anomaly.path, kind = ?anomaly.kind, "{anomaly}");
    }
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AnomalyKind::NestedArray => "nested array inside an array",
            AnomalyKind::EmptyElement => "null element inside an array",
            AnomalyKind::EmptyValue => "null value",
        })
    }
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = serde_json::to_string_pretty(&self.node).unwrap_or_else(|_| self.node.to_string());
        write!(f, "unexpected node configuration at `{}` ({}), skipped:\n{node}", self.path, self.kind)
    }
}
