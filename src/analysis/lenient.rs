// src/analysis/lenient.rs
//! Tolerant decoders for generated report payloads.
//!
//! The generator is asked to fill every field but regularly omits some or
//! returns the wrong JSON type. These helpers are used through
//! `#[serde(default, deserialize_with = "...")]` so a bad field degrades to
//! its default instead of failing the whole report.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn list_from_value<T: DeserializeOwned>(value: Value) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::debug!(error = %e, "dropping malformed list element");
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            tracing::debug!(found = kind(&other), "expected a list, using empty list");
            Vec::new()
        }
    }
}

pub fn number_from_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().replace(',', ".").parse().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if parsed.is_finite() { parsed } else { 0.0 }
}

pub fn text_from_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(list_from_value(Value::deserialize(deserializer)?))
}

pub fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        tracing::debug!(found = kind(&value), "expected an object, using defaults");
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "malformed object, using defaults");
        T::default()
    }))
}

pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(number_from_value(&Value::deserialize(deserializer)?))
}

pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(text_from_value(Value::deserialize(deserializer)?))
}

pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(text_from_value(other)).filter(|s| !s.is_empty()),
    })
}

pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "sim" | "yes"),
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "list")]
        items: Vec<String>,
        #[serde(deserialize_with = "number")]
        score: f64,
        #[serde(deserialize_with = "text")]
        label: String,
        #[serde(deserialize_with = "flag")]
        done: bool,
    }

    #[test]
    fn wrong_types_fall_back_to_defaults() {
        let sample: Sample = serde_json::from_value(json!({
            "items": "not a list",
            "score": {"nested": true},
            "label": null,
            "done": "sim"
        }))
        .unwrap();
        assert!(sample.items.is_empty());
        assert_eq!(sample.score, 0.0);
        assert_eq!(sample.label, "");
        assert!(sample.done);
    }

    #[test]
    fn malformed_elements_are_dropped() {
        let sample: Sample = serde_json::from_value(json!({
            "items": ["a", 3, "b", null],
            "score": "7,5",
            "label": 42
        }))
        .unwrap();
        assert_eq!(sample.items, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(sample.score, 7.5);
        assert_eq!(sample.label, "42");
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Contact {
        #[serde(deserialize_with = "optional_text")]
        phone: Option<String>,
    }

    #[test]
    fn optional_text_accepts_numbers_and_blanks() {
        let numeric: Contact = serde_json::from_value(json!({"phone": 11999})).unwrap();
        assert_eq!(numeric.phone.as_deref(), Some("11999"));
        let blank: Contact = serde_json::from_value(json!({"phone": ""})).unwrap();
        assert!(blank.phone.is_none());
        let missing: Contact = serde_json::from_value(json!({})).unwrap();
        assert!(missing.phone.is_none());
    }
}
