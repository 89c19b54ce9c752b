use crate::error::AppError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

pub trait Serializable: Serialize + for<'de> Deserialize<'de> {}

impl<T> Serializable for T where T: Serialize + for<'de> Deserialize<'de> {}

pub struct Serializer;

impl Serializer {
    pub fn from_json<T: Serializable>(json: &str) -> Result<T, AppError> {
        serde_json::from_str(json).map_err(|e| {
            AppError::SerializationError(format!("Failed to deserialize from JSON: {e}"))
        })
    }

    pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, AppError> {
        serde_json::to_string_pretty(value).map_err(|e| {
            AppError::SerializationError(format!("Failed to serialize to pretty JSON: {e}"))
        })
    }
}

/// Accepts an identifier sent either as a JSON string or a JSON number.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Unsigned(u64),
    }

    match RawId::deserialize(deserializer) {
        Ok(RawId::Text(s)) => Ok(s),
        Ok(RawId::Int(n)) => Ok(n.to_string()),
        Ok(RawId::Unsigned(n)) => Ok(n.to_string()),
        Err(_) => Err(de::Error::custom("expected a string or integer identifier")),
    }
}

/// Optional variant of [`deserialize_id`], used for foreign keys.
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_id")] String);

    Option::<Wrapper>::deserialize(deserializer).map(|w| w.map(|Wrapper(id)| id))
}

/// Treats an explicit `null` like a missing key and falls back to `T::default()`.
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads an optional timestamp written either as RFC 3339 or as a naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` value, which is taken as UTC.
pub fn deserialize_optional_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
}
