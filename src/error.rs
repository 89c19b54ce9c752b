/******************************************************************************
    Author: ByteBodh
    Email: dev@bytebodh.com
    Date: 19/10/26
 ******************************************************************************/
use reqwest::StatusCode;
use std::fmt::{Display, Formatter};
use std::{fmt, io};

/// Failures of the authentication exchanges (login and token refresh).
#[derive(Debug)]
pub enum AuthError {
    Network(reqwest::Error),
    Io(io::Error),
    Json(serde_json::Error),
    /// The auth endpoint answered with a non-success status.
    Rejected(StatusCode),
    /// The auth endpoint answered 2xx but reported `success: false` or no tokens.
    Unsuccessful(String),
    /// The store holds no session to refresh.
    MissingRefreshToken,
    Other(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Network(e) => write!(f, "network error: {e}"),
            AuthError::Io(e) => write!(f, "io error: {e}"),
            AuthError::Json(e) => write!(f, "json error: {e}"),
            AuthError::Rejected(s) => write!(f, "auth endpoint rejected the request: {s}"),
            AuthError::Unsuccessful(msg) => write!(f, "auth exchange unsuccessful: {msg}"),
            AuthError::MissingRefreshToken => write!(f, "no refresh token available"),
            AuthError::Other(msg) => write!(f, "other error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        AuthError::Network(e)
    }
}
impl From<serde_json::Error> for AuthError {
    fn from(e: serde_json::Error) -> Self {
        AuthError::Json(e)
    }
}
impl From<AppError> for AuthError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Network(e) => AuthError::Network(e),
            AppError::Io(e) => AuthError::Io(e),
            AppError::Json(e) => AuthError::Json(e),
            AppError::Http { status, .. } => AuthError::Rejected(status),
            other => AuthError::Other(other.to_string()),
        }
    }
}

/// Errors surfaced to callers of the API services.
#[derive(Debug)]
pub enum AppError {
    /// The request never produced a response.
    Network(reqwest::Error),
    Io(io::Error),
    Json(serde_json::Error),
    /// The server answered with a non-success status. A final 401 lands here too.
    Http { status: StatusCode, body: String },
    InvalidHeader(String),
    SerializationError(String),
}

impl AppError {
    /// Status code of an HTTP error, `None` for local and transport failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Consumes a non-success response into an [`AppError::Http`].
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        match response.text().await {
            Ok(body) => AppError::Http { status, body },
            Err(e) => AppError::Network(e),
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(e) => write!(f, "network error: {e}"),
            AppError::Io(e) => write!(f, "io error: {e}"),
            AppError::Json(e) => write!(f, "json error: {e}"),
            AppError::Http { status, body } => {
                write!(f, "API request failed. Status: {status}, Body: {body}")
            }
            AppError::InvalidHeader(s) => write!(f, "invalid header: {s}"),
            AppError::SerializationError(s) => write!(f, "serialization error: {s}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Network(e)
    }
}
impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Io(e)
    }
}
impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}
impl From<reqwest::header::InvalidHeaderValue> for AppError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        AppError::InvalidHeader(e.to_string())
    }
}
impl From<reqwest::header::InvalidHeaderName> for AppError {
    fn from(e: reqwest::header::InvalidHeaderName) -> Self {
        AppError::InvalidHeader(e.to_string())
    }
}
impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Network(e) => AppError::Network(e),
            AuthError::Io(e) => AppError::Io(e),
            AuthError::Json(e) => AppError::Json(e),
            AuthError::Rejected(status) => AppError::Http {
                status,
                body: String::new(),
            },
            AuthError::MissingRefreshToken => AppError::Http {
                status: StatusCode::UNAUTHORIZED,
                body: String::new(),
            },
            AuthError::Unsuccessful(msg) | AuthError::Other(msg) => AppError::Http {
                status: StatusCode::UNAUTHORIZED,
                body: msg,
            },
        }
    }
}
