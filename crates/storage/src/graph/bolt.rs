//! JSON property values to Bolt parameters

use super::Properties;
use neo4rs::{BoltNull, BoltType};
use serde_json::Value;
use std::collections::HashMap;

pub(crate) fn to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => (*b).into(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.into(),
            // u64 beyond i64::MAX and floats
            None => n.as_f64().unwrap_or(f64::NAN).into(),
        },
        Value::String(s) => s.as_str().into(),
        Value::Array(items) => items.iter().map(to_bolt).collect::<Vec<BoltType>>().into(),
        Value::Object(map) => properties_to_bolt(map),
    }
}

pub(crate) fn properties_to_bolt(props: &Properties) -> BoltType {
    props
        .iter()
        .map(|(key, value)| (key.clone(), to_bolt(value)))
        .collect::<HashMap<String, BoltType>>()
        .into()
}
