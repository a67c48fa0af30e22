//! Lenient decoders for ProVision payloads
//!
//! ProVision is inconsistent about scalar encodings: the same attribute can come back
//! as a JSON number, a numeric string, or an empty string depending on the endpoint
//! and on whether the value was ever set. These helpers normalize all of them.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// `Option<i64>` from a number, a numeric string, `""` or `null`.
pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("integer out of range: {n}"))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid integer {s:?}: {e}"))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected integer, got {other}"
        ))),
    }
}

/// `Option<bool>` from a bool, `0`/`1`, `"0"`/`"1"`, `"true"`/`"false"`, `""` or `null`.
pub fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::Number(n)) => Ok(Some(n.as_i64().unwrap_or(0) != 0)),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "1" | "true" | "yes" => Ok(Some(true)),
            "0" | "false" | "no" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!("invalid boolean {other:?}"))),
        },
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected boolean, got {other}"
        ))),
    }
}

/// `Option<String>` that also accepts bare numbers.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(if b { "1" } else { "0" }.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string, got {other}"
        ))),
    }
}

/// `String` that also accepts bare numbers; `null` becomes an empty string.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    opt_string(deserializer).map(Option::unwrap_or_default)
}

/// String list from an array, a comma separated string, or `null`.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(serde::de::Error::custom(format!(
                    "expected string list element, got {other}"
                ))),
            })
            .collect(),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string list, got {other}"
        ))),
    }
}

/// Attribute map from an object, or `None` for `null`.
///
/// ProVision serializes an empty attribute set as `[]`, which decodes to an empty map.
pub fn opt_string_map<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) if items.is_empty() => Ok(Some(BTreeMap::new())),
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => Ok((key, s)),
                Value::Null => Ok((key, String::new())),
                Value::Number(n) => Ok((key, n.to_string())),
                Value::Bool(b) => Ok((key, if b { "1" } else { "0" }.to_string())),
                other => Ok((key, other.to_string())),
            })
            .collect::<Result<BTreeMap<_, _>, D::Error>>()
            .map(Some),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected attribute map, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "opt_i64")]
        ttl: Option<i64>,
        #[serde(default, deserialize_with = "opt_bool")]
        assigned: Option<bool>,
        #[serde(default, deserialize_with = "string_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "opt_string_map")]
        attrs: Option<BTreeMap<String, String>>,
    }

    #[test]
    fn test_numeric_strings_and_php_empty_arrays() {
        let sample: Sample = serde_json::from_str(
            r#"{"ttl": "3600", "assigned": "1", "tags": "web, prod", "attrs": []}"#,
        )
        .unwrap();
        assert_eq!(sample.ttl, Some(3600));
        assert_eq!(sample.assigned, Some(true));
        assert_eq!(sample.tags, vec!["web", "prod"]);
        assert_eq!(sample.attrs, Some(BTreeMap::new()));
    }

    #[test]
    fn test_empty_and_missing_values_are_unset() {
        let sample: Sample = serde_json::from_str(r#"{"ttl": "", "assigned": null}"#).unwrap();
        assert_eq!(sample.ttl, None);
        assert_eq!(sample.assigned, None);
        assert!(sample.tags.is_empty());
        assert_eq!(sample.attrs, None);
    }

    #[test]
    fn test_garbage_integer_is_rejected() {
        let result = serde_json::from_str::<Sample>(r#"{"ttl": "soon"}"#);
        assert!(result.is_err());
    }
}
