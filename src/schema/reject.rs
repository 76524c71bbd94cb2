use serde_json::{Map, Value};

use super::is_info_key;
use crate::error::{Error, Result, join_path, row_path};
use crate::kind::{Shape, element_mix, is_value, shape_of};

/// Fail on the first content key the schema does not declare, or whose value
/// has a different shape than the schema's. Never mutates.
pub(crate) fn reject_incorrect_fields(
    schema: &Map<String, Value>,
    content: &Map<String, Value>,
    path: &str,
) -> Result<()> {
    for (key, value) in content {
        let here = join_path(path, key);
        let declared = if is_info_key(key) { None } else { schema.get(key) };
        let Some(declared) = declared else {
            return Err(Error::UnknownField { path: here });
        };

        let expected = shape_of(declared);
        let found = shape_of(value);
        if expected != found && !is_blank_placeholder(declared, value) {
            return Err(Error::TypeMismatch { path: here, expected, found });
        }

        match (declared, value) {
            (Value::Object(s), Value::Object(c)) => reject_incorrect_fields(s, c, &here)?,
            (Value::Array(s), Value::Array(c)) => reject_array(s, c, &here)?,
            _ => {}
        }
    }
    Ok(())
}

/// `""` is what materialization writes for any scalar field, so it stands in
/// for every primitive type.
fn is_blank_placeholder(declared: &Value, value: &Value) -> bool {
    is_value(declared) && value.as_str() == Some("")
}

fn reject_array(schema_xs: &[Value], content_xs: &[Value], path: &str) -> Result<()> {
    for xs in [schema_xs, content_xs] {
        if let (true, true) = element_mix(xs) {
            return Err(Error::MixedArray { path: path.to_string() });
        }
    }

    let prototype = schema_xs.iter().find_map(Value::as_object);
    let schema_scalar = schema_xs.iter().find(|x| is_value(x)).map(shape_of);

    for (i, el) in content_xs.iter().enumerate() {
        let here = row_path(path, i);
        match (el, prototype) {
            (Value::Object(row), Some(proto)) => reject_incorrect_fields(proto, row, &here)?,
            (Value::Object(_), None) => match schema_scalar {
                Some(expected) => {
                    return Err(Error::TypeMismatch { path: here, expected, found: Shape::Object });
                }
                None => return Err(Error::UnknownField { path: here }),
            },
            (other, Some(_)) if is_value(other) => {
                return Err(Error::TypeMismatch { path: here, expected: Shape::Object, found: shape_of(other) });
            }
            _ => {}
        }
    }
    Ok(())
}
