/******************************************************************************
    Author: ByteBodh
    Email: dev@bytebodh.com
    Date: 19/10/26
 ******************************************************************************/
use crate::error::AuthError;
use serde::{Deserialize, Serialize};

/// Body of `POST /auth/refresh-token`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Envelope returned by the `/auth` endpoints: `{ success, message?, data? }`.
#[derive(Debug, Deserialize)]
pub struct AuthResponse<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> AuthResponse<T> {
    /// Yields the payload, treating `success: false` or a missing payload as failure.
    pub fn into_data(self) -> Result<T, AuthError> {
        if self.success == Some(false) {
            return Err(AuthError::Unsuccessful(
                self.message.unwrap_or_else(|| "success flag was false".to_string()),
            ));
        }
        self.data.ok_or_else(|| {
            AuthError::Unsuccessful(
                self.message
                    .unwrap_or_else(|| "response carried no token data".to_string()),
            )
        })
    }
}
