use crate::error::AppError;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// A file to upload alongside structured data.
#[derive(Clone)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads the file at `path`; the file name part is taken from the path.
    pub async fn from_path(
        path: impl AsRef<Path>,
        content_type: impl Into<String>,
    ) -> Result<Self, AppError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, content_type, bytes))
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Multipart payload: one JSON metadata part and an optional file part.
///
/// Kept as owned data because a `reqwest` form can only be sent once and a
/// request may be replayed after a token refresh.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    metadata_part: String,
    metadata: String,
    file_part: String,
    file: Option<Attachment>,
}

impl MultipartBody {
    pub fn new<T: Serialize + ?Sized>(
        metadata_part: &str,
        metadata: &T,
        file_part: &str,
        file: Option<Attachment>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            metadata_part: metadata_part.to_string(),
            metadata: serde_json::to_string(metadata)?,
            file_part: file_part.to_string(),
            file,
        })
    }

    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    pub fn file(&self) -> Option<&Attachment> {
        self.file.as_ref()
    }

    pub(crate) fn to_form(&self) -> Result<Form, AppError> {
        let metadata = Part::text(self.metadata.clone()).mime_str("application/json")?;
        let mut form = Form::new().part(self.metadata_part.clone(), metadata);

        if let Some(file) = &self.file {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.content_type)?;
            form = form.part(self.file_part.clone(), part);
        }
        Ok(form)
    }
}

/// Joins `base` with percent-encoded path segments, so an id or slug
/// containing `/`, `?` or `#` stays a single segment.
pub fn resource_path(base: &str, segments: &[&str]) -> String {
    segments.iter().fold(base.to_string(), |mut path, segment| {
        path.push('/');
        path.push_str(&urlencoding::encode(segment));
        path
    })
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartBody),
}

/// One logical API call. `path` is relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: RequestBody,
    /// Set once a refresh has been attempted on behalf of this request.
    pub(crate) retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, AppError> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, body: MultipartBody) -> Self {
        self.body = RequestBody::Multipart(body);
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn is_retry(&self) -> bool {
        self.retried
    }
}
