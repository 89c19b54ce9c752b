use crate::config::Config;
use crate::error::{AppError, AuthError};
use crate::session::interface::{Authenticator, TokenStore};
use crate::transport::headers::RequestHeaders;
use crate::transport::model::{ApiRequest, RequestBody};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// Transport used by the resource services.
#[async_trait]
pub trait ApiHttpClient: Send + Sync {
    /// Sends `request` and decodes a successful body into `T`.
    ///
    /// An empty success body decodes as JSON `null`, so `()`, `Option<_>` and
    /// `serde_json::Value` work for `204 No Content`.
    async fn request<T>(&self, request: ApiRequest) -> Result<T, AppError>
    where
        T: DeserializeOwned + Send + 'static;
}

/// HTTP client that attaches the stored bearer token to every request and
/// transparently refreshes the session once when the server answers 401.
///
/// Concurrent requests that hit a 401 for the same stale token share a single
/// refresh exchange.
pub struct AuthenticatedHttpClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    authenticator: Arc<dyn Authenticator>,
    refresh_lock: Mutex<()>,
}

impl AuthenticatedHttpClient {
    pub fn new(
        config: &Config,
        store: Arc<dyn TokenStore>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.rest_api.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.rest_api.base_url.trim_end_matches('/').to_string(),
            store,
            authenticator,
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.authenticator
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        access_token: Option<&str>,
    ) -> Result<Response, AppError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("Sending {} request to {}", request.method, url);

        let headers = RequestHeaders::new(access_token, &request.headers).to_header_map()?;
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(body) => builder.multipart(body.to_form()?),
        };

        builder.send().await.map_err(|e| {
            error!("Failed to send {} request: {:?}", request.method, e);
            AppError::Network(e)
        })
    }

    /// Sends the request, running the refresh-and-retry protocol on a 401.
    ///
    /// Returns the raw response of the last attempt unless that attempt was a
    /// 401 that could not be recovered, in which case the 401 is returned as
    /// an error. A failed refresh yields the original 401, never the refresh
    /// error.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, mut request: ApiRequest) -> Result<Response, AppError> {
        loop {
            let access_token = self.store.access_token().await?;
            let response = self.dispatch(&request, access_token.as_deref()).await?;

            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }

            let unauthorized = AppError::from_response(response).await;
            if request.retried {
                warn!("Request was rejected again after a token refresh");
                return Err(unauthorized);
            }
            request.retried = true;

            if let Err(e) = self.refresh_session(access_token.as_deref()).await {
                warn!("Token refresh failed: {}", e);
                return Err(unauthorized);
            }
            debug!("Replaying request with refreshed token");
        }
    }

    /// Refreshes the stored session on behalf of a request that was rejected
    /// while carrying `stale_token`.
    ///
    /// Refreshes are serialized. If the store no longer holds `stale_token`,
    /// another request already refreshed (or logged in) and the stored token
    /// is reused without a new exchange.
    async fn refresh_session(&self, stale_token: Option<&str>) -> Result<(), AuthError> {
        let _guard = self.refresh_lock.lock().await;

        let session = match self.store.get().await? {
            Some(session) => session,
            None => return Err(AuthError::MissingRefreshToken),
        };
        if Some(session.access_token.as_str()) != stale_token {
            debug!("Session was refreshed by a concurrent request");
            return Ok(());
        }

        let tokens = match self.authenticator.refresh(&session.refresh_token).await {
            Ok(tokens) => tokens,
            Err(e) => {
                self.discard_session().await;
                return Err(e);
            }
        };

        // A refreshed session that cannot be saved is discarded.
        if let Err(e) = self.store.set(session.rotate(tokens)).await {
            error!("Failed to store refreshed session: {}", e);
            self.discard_session().await;
            return Err(e.into());
        }
        info!("Access token refreshed");
        Ok(())
    }

    async fn discard_session(&self) {
        match self.store.clear().await {
            Ok(()) => warn!("Session cleared"),
            Err(e) => error!("Failed to clear session: {}", e),
        }
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
        let status = response.status();
        let body_text = response.text().await?;

        debug!("Response Status: {}", status);

        if status.is_success() {
            let text = if body_text.trim().is_empty() {
                "null"
            } else {
                body_text.as_str()
            };
            serde_json::from_str(text).map_err(|e| {
                error!("Failed to deserialize response body: {}", e);
                AppError::Json(e)
            })
        } else {
            error!(
                "API request failed. Status: {}, Body: {}",
                status, body_text
            );
            Err(AppError::Http {
                status,
                body: body_text,
            })
        }
    }
}

#[async_trait]
impl ApiHttpClient for AuthenticatedHttpClient {
    async fn request<T>(&self, request: ApiRequest) -> Result<T, AppError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let response = self.execute(request).await?;
        Self::handle_response(response).await
    }
}

impl fmt::Debug for AuthenticatedHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedHttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests_authenticated_http_client {
    use super::*;
    use crate::config::Credentials;
    use crate::session::auth::HttpAuthenticator;
    use crate::session::interface::{AuthSession, TokenPair};
    use crate::storage::memory_store::MemoryTokenStore;
    use crate::transport::model::{Attachment, MultipartBody};
    use crate::utils::logger::setup_logger;
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn create_client(server: &Server, store: Arc<MemoryTokenStore>) -> AuthenticatedHttpClient {
        let config = Config::with_base_url(&server.url());
        let authenticator = Arc::new(HttpAuthenticator::new(&config).unwrap());
        AuthenticatedHttpClient::new(&config, store, authenticator).unwrap()
    }

    fn logged_in() -> Arc<MemoryTokenStore> {
        Arc::new(MemoryTokenStore::with_session(AuthSession::new("A", "R")))
    }

    /// Authenticator that counts refreshes and answers slowly, so concurrent
    /// requests pile up behind the first refresh.
    struct SlowAuthenticator {
        refreshes: AtomicUsize,
    }

    #[async_trait]
    impl Authenticator for SlowAuthenticator {
        async fn login(&self, _: &Credentials) -> Result<AuthSession, AuthError> {
            Err(AuthError::Other("not used".to_string()))
        }

        async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
            assert_eq!(refresh_token, "R");
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(150)).await;
            Ok(TokenPair {
                access_token: "B".to_string(),
                refresh_token: None,
            })
        }
    }

    #[tokio::test]
    async fn test_bearer_token_attached() {
        setup_logger();
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/api/blogs")
            .match_header("authorization", "Bearer A")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "success"}"#)
            .create_async()
            .await;

        let client = create_client(&server, logged_in());
        let result: serde_json::Value = client.request(ApiRequest::get("/api/blogs")).await.unwrap();

        assert_eq!(result["message"], "success");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_without_token_is_still_sent() {
        setup_logger();
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/api/blogs")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = create_client(&server, Arc::new(MemoryTokenStore::new()));
        let result: Vec<serde_json::Value> =
            client.request(ApiRequest::get("/api/blogs")).await.unwrap();

        assert!(result.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthenticated_401_gives_up_without_refresh() {
        setup_logger();
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", "/api/users")
            .with_status(401)
            .with_body("missing token")
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/auth/refresh-token")
            .expect(0)
            .create_async()
            .await;

        let client = create_client(&server, Arc::new(MemoryTokenStore::new()));
        let result: Result<serde_json::Value, AppError> =
            client.request(ApiRequest::get("/api/users")).await;

        assert!(result.unwrap_err().is_unauthorized());
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_auth_error_passes_through() {
        setup_logger();
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/api/blogs")
            .with_status(500)
            .with_body("boom")
            .expect(1)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/auth/refresh-token")
            .expect(0)
            .create_async()
            .await;

        let store = logged_in();
        let client = create_client(&server, store.clone());
        let result: Result<serde_json::Value, AppError> =
            client.request(ApiRequest::get("/api/blogs")).await;

        match result {
            Err(AppError::Http { status, body }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(store.get().await.unwrap(), Some(AuthSession::new("A", "R")));
        mock.assert_async().await;
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_refresh_and_retry_transparently() {
        setup_logger();
        let mut server = Server::new_async().await;

        let stale = server
            .mock("GET", "/api/categories")
            .match_header("authorization", "Bearer A")
            .with_status(401)
            .with_body(r#"{"message": "jwt expired"}"#)
            .expect(1)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/auth/refresh-token")
            .match_body(Matcher::Json(json!({"refreshToken": "R"})))
            .with_status(200)
            .with_body(r#"{"success": true, "data": {"accessToken": "B"}}"#)
            .expect(1)
            .create_async()
            .await;
        let fresh = server
            .mock("GET", "/api/categories")
            .match_header("authorization", "Bearer B")
            .with_status(200)
            .with_body(r#"[{"id": 1, "name": "Rust"}]"#)
            .expect(1)
            .create_async()
            .await;

        let store = logged_in();
        let client = create_client(&server, store.clone());
        let result: serde_json::Value =
            client.request(ApiRequest::get("/api/categories")).await.unwrap();

        assert_eq!(result, json!([{"id": 1, "name": "Rust"}]));
        assert_eq!(store.get().await.unwrap(), Some(AuthSession::new("B", "R")));
        stale.assert_async().await;
        refresh.assert_async().await;
        fresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_second_401_does_not_refresh_again() {
        setup_logger();
        let mut server = Server::new_async().await;

        let _stale = server
            .mock("GET", "/api/users")
            .match_header("authorization", "Bearer A")
            .with_status(401)
            .with_body("expired")
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/auth/refresh-token")
            .with_status(200)
            .with_body(r#"{"success": true, "data": {"accessToken": "B", "refreshToken": "R2"}}"#)
            .expect(1)
            .create_async()
            .await;
        let still_rejected = server
            .mock("GET", "/api/users")
            .match_header("authorization", "Bearer B")
            .with_status(401)
            .with_body("insufficient role")
            .expect(1)
            .create_async()
            .await;

        let store = logged_in();
        let client = create_client(&server, store.clone());
        let result: Result<serde_json::Value, AppError> =
            client.request(ApiRequest::get("/api/users")).await;

        match result {
            Err(AppError::Http { status, body }) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "insufficient role");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        // the refreshed session is kept, only a failed exchange clears it
        assert_eq!(store.get().await.unwrap(), Some(AuthSession::new("B", "R2")));
        refresh.assert_async().await;
        still_rejected.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_session_and_returns_original_error() {
        setup_logger();
        let mut server = Server::new_async().await;

        let stale = server
            .mock("DELETE", "/api/blogs/9")
            .with_status(401)
            .with_body(r#"{"message": "jwt expired"}"#)
            .expect(1)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/auth/refresh-token")
            .with_status(401)
            .with_body(r#"{"message": "refresh token revoked"}"#)
            .expect(1)
            .create_async()
            .await;

        let store = logged_in();
        let client = create_client(&server, store.clone());
        let result: Result<serde_json::Value, AppError> =
            client.request(ApiRequest::delete("/api/blogs/9")).await;

        match result {
            Err(AppError::Http { status, body }) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, r#"{"message": "jwt expired"}"#);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(store.get().await.unwrap().is_none());
        stale.assert_async().await;
        refresh.assert_async().await;
    }

    /// Store whose writes always fail, as a full disk would.
    struct ReadOnlyStore {
        inner: MemoryTokenStore,
    }

    #[async_trait]
    impl TokenStore for ReadOnlyStore {
        async fn get(&self) -> Result<Option<AuthSession>, AppError> {
            self.inner.get().await
        }

        async fn set(&self, _: AuthSession) -> Result<(), AppError> {
            Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }

        async fn clear(&self) -> Result<(), AppError> {
            self.inner.clear().await
        }
    }

    #[tokio::test]
    async fn test_unsaved_refresh_clears_session_and_returns_original_error() {
        setup_logger();
        let mut server = Server::new_async().await;

        let stale = server
            .mock("GET", "/api/users")
            .match_header("authorization", "Bearer A")
            .with_status(401)
            .with_body("expired")
            .expect(1)
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/auth/refresh-token")
            .with_status(200)
            .with_body(r#"{"success": true, "data": {"accessToken": "B", "refreshToken": "R2"}}"#)
            .expect(1)
            .create_async()
            .await;
        let replay = server
            .mock("GET", "/api/users")
            .match_header("authorization", "Bearer B")
            .with_status(200)
            .with_body("[]")
            .expect(0)
            .create_async()
            .await;

        let store = Arc::new(ReadOnlyStore {
            inner: MemoryTokenStore::with_session(AuthSession::new("A", "R")),
        });
        let config = Config::with_base_url(&server.url());
        let authenticator = Arc::new(HttpAuthenticator::new(&config).unwrap());
        let client = AuthenticatedHttpClient::new(&config, store.clone(), authenticator).unwrap();

        let result: Result<serde_json::Value, AppError> =
            client.request(ApiRequest::get("/api/users")).await;

        assert!(result.unwrap_err().is_unauthorized());
        assert!(store.get().await.unwrap().is_none());
        stale.assert_async().await;
        refresh.assert_async().await;
        replay.assert_async().await;
    }

    #[tokio::test]
    async fn test_network_error_propagates() {
        setup_logger();
        let config = Config::with_base_url("http://127.0.0.1:1");
        let authenticator = Arc::new(HttpAuthenticator::new(&config).unwrap());
        let client = AuthenticatedHttpClient::new(&config, logged_in(), authenticator).unwrap();

        let result: Result<serde_json::Value, AppError> =
            client.request(ApiRequest::get("/api/blogs")).await;

        assert!(matches!(result, Err(AppError::Network(_))));
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh() {
        setup_logger();
        let mut server = Server::new_async().await;

        let _stale = server
            .mock("GET", Matcher::Regex(r"^/api/(blogs|users|contacts)$".to_string()))
            .match_header("authorization", "Bearer A")
            .with_status(401)
            .create_async()
            .await;
        let fresh = server
            .mock("GET", Matcher::Regex(r"^/api/(blogs|users|contacts)$".to_string()))
            .match_header("authorization", "Bearer B")
            .with_status(200)
            .with_body("[]")
            .expect(3)
            .create_async()
            .await;

        let config = Config::with_base_url(&server.url());
        let authenticator = Arc::new(SlowAuthenticator {
            refreshes: AtomicUsize::new(0),
        });
        let client = AuthenticatedHttpClient::new(&config, logged_in(), authenticator.clone())
            .unwrap();

        let (blogs, users, contacts) = tokio::join!(
            client.request::<Vec<serde_json::Value>>(ApiRequest::get("/api/blogs")),
            client.request::<Vec<serde_json::Value>>(ApiRequest::get("/api/users")),
            client.request::<Vec<serde_json::Value>>(ApiRequest::get("/api/contacts")),
        );

        assert!(blogs.is_ok());
        assert!(users.is_ok());
        assert!(contacts.is_ok());
        assert_eq!(authenticator.refreshes.load(Ordering::SeqCst), 1);
        fresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_and_extra_headers() {
        setup_logger();
        let mut server = Server::new_async().await;

        let mock = server
            .mock("PATCH", "/api/job-notifications/7/active")
            .match_query(Matcher::UrlEncoded("isActive".into(), "false".into()))
            .match_header("x-request-source", "dashboard")
            .match_header("authorization", "Bearer A")
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let client = create_client(&server, logged_in());
        let request = ApiRequest::patch("/api/job-notifications/7/active")
            .query("isActive", false)
            .header("X-Request-Source", "dashboard");
        let result: serde_json::Value = client.request(request).await.unwrap();

        assert_eq!(result["success"], true);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_success_body() {
        setup_logger();
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("DELETE", "/api/categories/3")
            .with_status(204)
            .create_async()
            .await;

        let client = create_client(&server, logged_in());
        let result: Result<(), AppError> =
            client.request(ApiRequest::delete("/api/categories/3")).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_json_body_sent_as_json() {
        setup_logger();
        let mut server = Server::new_async().await;

        let mock = server
            .mock("POST", "/api/categories")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"name": "Rust"})))
            .with_status(201)
            .with_body(r#"{"data": {"id": 5, "name": "Rust"}}"#)
            .create_async()
            .await;

        let client = create_client(&server, logged_in());
        let request = ApiRequest::post("/api/categories")
            .json(&json!({"name": "Rust"}))
            .unwrap();
        let result: serde_json::Value = client.request(request).await.unwrap();

        assert_eq!(result["data"]["id"], 5);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_multipart_shape() {
        setup_logger();
        let mut server = Server::new_async().await;

        let mock = server
            .mock("POST", "/api/blogs")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="data""#.to_string()),
                Matcher::Regex(r#"\{"title":"X"\}"#.to_string()),
                Matcher::Regex(r#"name="image"; filename="cover.png""#.to_string()),
                Matcher::Regex("PNGDATA".to_string()),
            ]))
            .with_status(201)
            .with_body(r#"{"data": {"id": 1}}"#)
            .create_async()
            .await;

        let client = create_client(&server, logged_in());
        let body = MultipartBody::new(
            "data",
            &json!({"title": "X"}),
            "image",
            Some(Attachment::new("cover.png", "image/png", b"PNGDATA".to_vec())),
        )
        .unwrap();
        let result: serde_json::Value = client
            .request(ApiRequest::post("/api/blogs").multipart(body))
            .await
            .unwrap();

        assert_eq!(result["data"]["id"], 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        setup_logger();
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", "/api/blogs")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = create_client(&server, logged_in());
        let result: Result<serde_json::Value, AppError> =
            client.request(ApiRequest::get("/api/blogs")).await;

        assert!(matches!(result, Err(AppError::Json(_))));
    }
}
