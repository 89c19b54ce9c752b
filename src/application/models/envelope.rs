/******************************************************************************
    Author: ByteBodh
    Email: dev@bytebodh.com
    Date: 19/10/26
 ******************************************************************************/
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Any response body of the resource endpoints.
///
/// The backend is not consistent about wrapping: some endpoints answer
/// `{ data: T }`, some `{ data: { data: T } }` and a few the bare `T`. All
/// three are accepted and reduced with [`ApiResponse::into_data`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Enveloped(Envelope<T>),
    Bare(T),
}

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Payload<T>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Payload<T> {
    Nested { data: T },
    Flat(T),
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        match self {
            ApiResponse::Enveloped(Envelope {
                data: Payload::Nested { data },
                ..
            }) => data,
            ApiResponse::Enveloped(Envelope {
                data: Payload::Flat(data),
                ..
            }) => data,
            ApiResponse::Bare(data) => data,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ApiResponse::Enveloped(envelope) => envelope.message.as_deref(),
            ApiResponse::Bare(_) => None,
        }
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Decodes a body that may be a plain acknowledgement such as
    /// `{ "success": true, "message": "..." }`, which carries no record.
    ///
    /// A body is taken as a record when it has a non-null `data` or an `id`.
    pub fn decode_optional(body: Value) -> Result<Option<T>, serde_json::Error> {
        let has_record = match &body {
            Value::Null => false,
            Value::Object(map) => {
                map.get("data").is_some_and(|data| !data.is_null()) || map.contains_key("id")
            }
            _ => true,
        };
        if !has_record {
            return Ok(None);
        }
        serde_json::from_value::<ApiResponse<T>>(body).map(|response| Some(response.into_data()))
    }
}
