//! Forgiving field decoders for store documents.
//!
//! A document written by an older client may hold a number where a string
//! is expected, a formatted price, or a timestamp in any supported shape.
//! These `deserialize_with` helpers never fail on field content: a value
//! that cannot be interpreted becomes the field's empty value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

use crate::money::cents_from_value;
use crate::time::date_from_value;

pub fn timestamp<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(date_from_value(&value))
}

pub fn cents<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(cents_from_value(&value))
}

/// Integer counts such as point balances. Fractions are truncated toward zero.
pub fn integer<'de, D>(de: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(integer_from_value(&value).unwrap_or(0))
}

pub fn string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(string_from_value(&value).unwrap_or_default())
}

pub fn opt_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(string_from_value(&value).filter(|s| !s.is_empty()))
}

pub fn flag<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    })
}

pub fn string_list<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(string_from_value).collect(),
        _ => Vec::new(),
    })
}

/// Write side of [`timestamp`]: epoch milliseconds, or null.
pub fn millis<S>(value: &Option<DateTime<Utc>>, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(dt) => ser.serialize_i64(dt.timestamp_millis()),
        None => ser.serialize_none(),
    }
}

pub fn integer_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

fn string_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "timestamp")]
        at: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "cents")]
        price: Option<i64>,
        #[serde(default, deserialize_with = "integer")]
        points: i64,
        #[serde(default, deserialize_with = "string")]
        name: String,
        #[serde(default, deserialize_with = "flag")]
        done: bool,
        #[serde(default, deserialize_with = "string_list")]
        tags: Vec<String>,
    }

    #[test]
    fn wrong_types_become_empty() {
        let p: Probe = serde_json::from_value(json!({
            "at": [1, 2],
            "price": {"x": 1},
            "points": "lots",
            "name": false,
            "done": "nope",
            "tags": "a,b",
        }))
        .unwrap();
        assert_eq!(p.at, None);
        assert_eq!(p.price, None);
        assert_eq!(p.points, 0);
        assert_eq!(p.name, "");
        assert!(!p.done);
        assert!(p.tags.is_empty());
    }

    #[test]
    fn coercions() {
        let p: Probe = serde_json::from_value(json!({
            "at": "2026-01-01",
            "price": "99.5",
            "points": "1500",
            "name": 42,
            "done": 1,
            "tags": ["a", 7, null],
        }))
        .unwrap();
        assert!(p.at.is_some());
        assert_eq!(p.price, Some(9_950));
        assert_eq!(p.points, 1_500);
        assert_eq!(p.name, "42");
        assert!(p.done);
        assert_eq!(p.tags, vec!["a", "7"]);
    }

    #[test]
    fn missing_fields_default() {
        let p: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.at, None);
        assert_eq!(p.points, 0);
    }
}
