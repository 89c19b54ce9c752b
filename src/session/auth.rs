use crate::config::{Config, Credentials};
use crate::constants::{LOGIN_PATH, REFRESH_TOKEN_PATH};
use crate::error::AuthError;
use crate::session::interface::{AuthSession, Authenticator, TokenPair};
use crate::session::session_response::{AuthResponse, RefreshRequest};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// [`Authenticator`] backed by the `/auth` endpoints of the REST API.
///
/// Uses its own `reqwest` client so that the exchanges never carry a bearer
/// token and never loop back into the refresh-and-retry layer.
#[derive(Debug, Clone)]
pub struct HttpAuthenticator {
    client: Client,
    base_url: String,
}

impl HttpAuthenticator {
    pub fn new(config: &Config) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.rest_api.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.rest_api.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn exchange<B, T>(&self, path: &str, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Sending auth exchange to {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Auth exchange {} rejected with status {}", path, status);
            return Err(AuthError::Rejected(status));
        }

        let text = response.text().await?;
        let envelope: AuthResponse<T> = serde_json::from_str(&text).map_err(|e| {
            error!("Failed to decode auth response from {}: {}", path, e);
            AuthError::Json(e)
        })?;
        envelope.into_data()
    }
}

#[async_trait::async_trait]
impl Authenticator for HttpAuthenticator {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, AuthError> {
        let session: AuthSession = self.exchange(LOGIN_PATH, credentials).await?;
        debug!("Login successful");
        Ok(session)
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let tokens: TokenPair = self
            .exchange(REFRESH_TOKEN_PATH, &RefreshRequest { refresh_token })
            .await?;
        debug!("Refresh exchange succeeded, rotated: {}", tokens.refresh_token.is_some());
        Ok(tokens)
    }
}
