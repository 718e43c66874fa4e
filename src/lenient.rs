//! Field deserializers for response records
//!
//! A field that is null, missing or of the wrong shape takes its default instead of
//! failing the whole record, so one odd element never sinks a collection.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn decode<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            log::debug!("ignoring malformed field: {}", e);
            None
        }
    }
}

/// `None` unless the value decodes as `T`
pub(crate) fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(decode(Value::deserialize(deserializer)?))
}

/// `T::default()` unless the value decodes as `T`
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(decode(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// A list keeping only the entries that decode; non-arrays are empty
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.into_iter().filter_map(decode).collect()),
        _ => Ok(Vec::new()),
    }
}

/// A finite number, also accepted as a numeric string; zero otherwise
pub(crate) fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(amount.filter(|a| a.is_finite()).unwrap_or(0.0))
}
