/******************************************************************************
    Author: ByteBodh
    Email: dev@bytebodh.com
    Date: 19/10/26
 ******************************************************************************/
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::services::blog_service::{BlogService, BlogServiceImpl};
use crate::application::services::category_service::CategoryServiceImpl;
use crate::application::services::contact_service::{ContactService, ContactServiceImpl};
use crate::application::services::job_notification_service::{
    JobNotificationService, JobNotificationServiceImpl,
};
use crate::application::services::user_service::{UserService, UserServiceImpl};
use crate::config::{Config, Credentials};
use crate::error::AppError;
use crate::session::auth::HttpAuthenticator;
use crate::session::interface::{AuthSession, Authenticator, TokenStore};
use crate::storage::file_store::FileTokenStore;
use crate::storage::memory_store::MemoryTokenStore;
use crate::transport::http_client::AuthenticatedHttpClient;

/// Counts shown on the dashboard landing page.
///
/// A `None` count means that fetch failed; the others are still filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub blog_count: Option<usize>,
    pub user_count: Option<usize>,
    pub contact_count: Option<usize>,
    pub job_count: Option<usize>,
    pub fetched_at: DateTime<Utc>,
}

impl fmt::Display for DashboardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn count(value: Option<usize>) -> String {
            value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
        }
        write!(
            f,
            "blogs: {}, users: {}, contacts: {}, jobs: {} (at {})",
            count(self.blog_count),
            count(self.user_count),
            count(self.contact_count),
            count(self.job_count),
            self.fetched_at.to_rfc3339()
        )
    }
}

/// Entry point wiring one authenticated transport into every resource service.
pub struct ByteBodhClient {
    config: Config,
    http: Arc<AuthenticatedHttpClient>,
    blogs: BlogServiceImpl<AuthenticatedHttpClient>,
    categories: CategoryServiceImpl<AuthenticatedHttpClient>,
    jobs: JobNotificationServiceImpl<AuthenticatedHttpClient>,
    users: UserServiceImpl<AuthenticatedHttpClient>,
    contacts: ContactServiceImpl<AuthenticatedHttpClient>,
}

impl ByteBodhClient {
    /// Builds the client from configuration. The session is persisted to
    /// `token_storage.path` when set and kept in memory otherwise.
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let store: Arc<dyn TokenStore> = match &config.token_storage.path {
            Some(path) => {
                info!("Using file token store at {}", path);
                Arc::new(FileTokenStore::open(path).await?)
            }
            None => Arc::new(MemoryTokenStore::new()),
        };
        let authenticator: Arc<dyn Authenticator> = Arc::new(HttpAuthenticator::new(&config)?);
        Self::with_parts(config, store, authenticator)
    }

    pub fn with_parts(
        config: Config,
        store: Arc<dyn TokenStore>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self, AppError> {
        let http = Arc::new(AuthenticatedHttpClient::new(&config, store, authenticator)?);

        Ok(Self {
            blogs: BlogServiceImpl::new(http.clone()),
            categories: CategoryServiceImpl::new(http.clone()),
            jobs: JobNotificationServiceImpl::new(http.clone()),
            users: UserServiceImpl::new(http.clone()),
            contacts: ContactServiceImpl::new(http.clone()),
            http,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn http_client(&self) -> &Arc<AuthenticatedHttpClient> {
        &self.http
    }

    pub fn blogs(&self) -> &BlogServiceImpl<AuthenticatedHttpClient> {
        &self.blogs
    }

    pub fn categories(&self) -> &CategoryServiceImpl<AuthenticatedHttpClient> {
        &self.categories
    }

    pub fn jobs(&self) -> &JobNotificationServiceImpl<AuthenticatedHttpClient> {
        &self.jobs
    }

    pub fn users(&self) -> &UserServiceImpl<AuthenticatedHttpClient> {
        &self.users
    }

    pub fn contacts(&self) -> &ContactServiceImpl<AuthenticatedHttpClient> {
        &self.contacts
    }

    /// Exchanges credentials for a session and stores it.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, AppError> {
        info!("Logging in as {}", credentials.email);
        let session = self.http.authenticator().login(credentials).await?;
        self.http.token_store().set(session.clone()).await?;
        Ok(session)
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        info!("Logging out");
        self.http.token_store().clear().await
    }

    pub async fn session(&self) -> Result<Option<AuthSession>, AppError> {
        self.http.token_store().get().await
    }

    /// Fetches every dashboard collection concurrently and counts them.
    pub async fn dashboard_summary(&self) -> DashboardSummary {
        let (blogs, users, contacts, jobs) = tokio::join!(
            self.blogs.list(),
            self.users.list(),
            self.contacts.list(),
            self.jobs.list()
        );

        DashboardSummary {
            blog_count: count_or_log("blogs", blogs),
            user_count: count_or_log("users", users),
            contact_count: count_or_log("contacts", contacts),
            job_count: count_or_log("job notifications", jobs),
            fetched_at: Utc::now(),
        }
    }
}

impl fmt::Debug for ByteBodhClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBodhClient")
            .field("base_url", &self.http.base_url())
            .finish()
    }
}

fn count_or_log<T>(what: &str, result: Result<Vec<T>, AppError>) -> Option<usize> {
    match result {
        Ok(items) => Some(items.len()),
        Err(e) => {
            warn!("Failed to fetch {} for the dashboard: {}", what, e);
            None
        }
    }
}
