//! Deserializers for numeric fields the upstream API sends as either numbers
//! or numeric strings.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept `12`, `"12"`, `""` and `null`. Anything unparsable becomes `None`.
pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_i64))
}

pub(crate) fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
