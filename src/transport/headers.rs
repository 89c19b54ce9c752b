/******************************************************************************
    Author: ByteBodh
    Email: dev@bytebodh.com
    Date: 19/10/26
 ******************************************************************************/

use crate::constants::{AUTHORIZATION_HEADER_KEY, BEARER_PREFIX};
use crate::error::AppError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

/// Headers for a single dispatch of an [`ApiRequest`](crate::transport::model::ApiRequest).
#[derive(Debug)]
pub(crate) struct RequestHeaders<'a> {
    pub(crate) access_token: Option<&'a str>,
    pub(crate) extra: &'a [(String, String)],
}

impl<'a> RequestHeaders<'a> {
    pub(crate) fn new(access_token: Option<&'a str>, extra: &'a [(String, String)]) -> Self {
        Self {
            access_token,
            extra,
        }
    }

    /// Builds the header map sent with the request.
    ///
    /// The bearer credential is added only when a non-empty token is present
    /// and is marked sensitive so it never shows up in `Debug` output. The
    /// content type is left to `reqwest`, which picks JSON or a multipart
    /// boundary from the body.
    pub(crate) fn to_header_map(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();

        for (key, value) in self.extra {
            headers.insert(
                HeaderName::from_bytes(key.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }

        if let Some(token) = self.access_token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("{BEARER_PREFIX}{token}"))?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static("authorization"), value);
        } else {
            debug!("No access token available, sending without {}", AUTHORIZATION_HEADER_KEY);
        }

        debug!("Request headers: {:?}", headers);
        Ok(headers)
    }
}
