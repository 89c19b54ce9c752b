use crate::config::Credentials;
use crate::error::{AppError, AuthError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The persisted pair of credentials for the dashboard API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthSession {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Applies a refresh result. The refresh token is only replaced when the
    /// backend rotated it.
    pub fn rotate(self, tokens: TokenPair) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token.unwrap_or(self.refresh_token),
        }
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Tokens returned by a refresh exchange.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("rotated", &self.refresh_token.is_some())
            .finish()
    }
}

/// Shared, mutable home of the current session.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self) -> Result<Option<AuthSession>, AppError>;
    async fn set(&self, session: AuthSession) -> Result<(), AppError>;
    async fn clear(&self) -> Result<(), AppError>;

    async fn access_token(&self) -> Result<Option<String>, AppError> {
        Ok(self.get().await?.map(|s| s.access_token))
    }

    async fn refresh_token(&self) -> Result<Option<String>, AppError> {
        Ok(self.get().await?.map(|s| s.refresh_token))
    }
}

/// Talks to the `/auth` endpoints. Never goes through the bearer/retry layer.
#[async_trait::async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, AuthError>;
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;
}
