//! Field-level deserializers for stored documents.
//!
//! A single bad value is replaced or dropped with a warning so the rest of
//! the document still loads.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// The field as `T`, or `T::default()` when the stored value does not fit.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "unreadable field replaced with its default");
        T::default()
    }))
}

/// A positive whole number of days. Anything else loads as `None`.
pub(crate) fn interval<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(None);
    }
    let days = match &raw {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
    .and_then(|n| u32::try_from(n).ok())
    .filter(|n| *n > 0);

    if days.is_none() {
        tracing::warn!(value = %raw, "invalid watering interval dropped");
    }
    Ok(days)
}

/// Event log entries; entries that do not parse are dropped.
pub(crate) fn events<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            tracing::warn!(value = %other, "event log is not a list, ignored");
            return Ok(Vec::new());
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(event) => Some(event),
            Err(err) => {
                tracing::warn!(error = %err, "unreadable event dropped");
                None
            }
        })
        .collect())
}

/// Keyed records; a record that does not parse is dropped.
pub(crate) fn entries<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let map = match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        Value::Null => return Ok(BTreeMap::new()),
        other => {
            tracing::warn!(value = %other, "record map is not an object, ignored");
            return Ok(BTreeMap::new());
        }
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(record) => Some((key, record)),
            Err(err) => {
                tracing::warn!(record = %key, error = %err, "unreadable record dropped");
                None
            }
        })
        .collect())
}
