//! Decoding helpers for loosely typed columns.
//!
//! Profile lists (`skills`, `education`, `experience`) have been stored both as
//! JSON arrays and as JSON-encoded strings. They are decoded once here into
//! typed vectors; anything unreadable becomes an empty list.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value as JsonValue;

#[derive(Deserialize)]
#[serde(untagged)]
enum ListColumn<T> {
    Items(Vec<T>),
    Encoded(String),
    Other(JsonValue),
}

pub fn deserialize_lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match ListColumn::<T>::deserialize(deserializer)? {
        ListColumn::Items(items) => items,
        ListColumn::Encoded(encoded) => decode_encoded_list(&encoded),
        ListColumn::Other(value) => {
            if !value.is_null() {
                tracing::debug!(%value, "unreadable list column, treating as empty");
            }
            Vec::new()
        }
    };
    Ok(items)
}

fn decode_encoded_list<T: DeserializeOwned>(encoded: &str) -> Vec<T> {
    let trimmed = encoded.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<T>>(trimmed) {
        Ok(items) => items,
        Err(err) => {
            tracing::debug!(error = %err, "list column holds a string that is not a JSON list");
            Vec::new()
        }
    }
}

/// Optional enum column stored as free text. Values outside the known set
/// read as `None`.
pub fn deserialize_lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = match Option::<JsonValue>::deserialize(deserializer)? {
        Some(value) if !value.is_null() => value,
        _ => return Ok(None),
    };
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(_) => {
            tracing::debug!(%value, "unrecognised enum value, treating as absent");
            Ok(None)
        }
    }
}

/// Like [`deserialize_lenient_enum`] but falls back to the type's default.
pub fn deserialize_enum_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(deserialize_lenient_enum(deserializer)?.unwrap_or_default())
}

/// Accepts a string, a number or null and yields optional text.
pub fn deserialize_text_flexible<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        Some(TextOrNumber::Text(s)) => Some(s),
        Some(TextOrNumber::Int(i)) => Some(i.to_string()),
        Some(TextOrNumber::Float(f)) => Some(f.to_string()),
        None => None,
    })
}
