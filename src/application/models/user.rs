use crate::presentation::serialization::{
    deserialize_id, deserialize_null_default, deserialize_optional_datetime,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A registered account, as listed on the dashboard.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}
