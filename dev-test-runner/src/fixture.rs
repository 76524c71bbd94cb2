//! One scenario per fixture file: an operation, its inputs, and either the
//! expected output document or the expected failure kind.
use anyhow::{Result, bail, ensure};
use rule_schema::{Error, ErrorKind};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    Pathify,
    CheckSchema,
    EnforceSchema,
    EnforceSchemaWithTables,
    EnforceSchemaNoCheck,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    pub name: String,
    pub op: Op,
    #[serde(default)]
    pub schema: Option<Value>,
    #[serde(default)]
    pub document: Option<Value>,
    #[serde(default)]
    pub expect: Option<Value>,
    #[serde(default)]
    pub expect_error: Option<String>,
}

impl Fixture {
    pub fn run(&self) -> Result<()> {
        let expected_kind = self.expect_error.as_deref()
            .map(str::parse::<ErrorKind>)
            .transpose()
            .map_err(anyhow::Error::msg)?;

        match (self.execute(), expected_kind) {
            (Ok(out), None) => match &self.expect {
                Some(expect) => {
                    ensure!(
                        &out == expect,
                        "output differs\nexpected: {}\n   found: {}",
                        serde_json::to_string_pretty(expect)?,
                        serde_json::to_string_pretty(&out)?,
                    );
                    Ok(())
                }
                None => Ok(()),
            },
            (Ok(out), Some(kind)) => bail!("expected {kind}, got success: {out}"),
            (Err(err), Some(kind)) if err.kind() == kind => Ok(()),
            (Err(err), _) => bail!("unexpected failure: {err}"),
        }
    }

    fn execute(&self) -> Result<Value, Error> {
        let empty = Value::Object(Default::default());
        let schema = self.schema.as_ref().unwrap_or(&empty);
        let document = self.document.as_ref().unwrap_or(&empty);
        match self.op {
            Op::Pathify => {
                let mut anomalies: Vec<rule_schema::Anomaly> = Vec::new();
                let blob = rule_schema::pathify_with_sink(document, &mut anomalies)?;
                for anomaly in &anomalies {
                    tracing::info!(fixture = %self.name, "{anomaly}");
                }
                Ok(serde_json::to_value(&blob).unwrap_or(Value::Null))
            }
            Op::CheckSchema => rule_schema::check_schema(schema).map(|()| Value::Null),
            Op::EnforceSchema => rule_schema::enforce_schema(schema, document),
            Op::EnforceSchemaWithTables => rule_schema::enforce_schema_with_tables(schema, document),
            Op::EnforceSchemaNoCheck => rule_schema::enforce_schema_no_check(schema, document),
        }
    }
}
