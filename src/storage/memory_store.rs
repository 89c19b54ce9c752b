use crate::error::AppError;
use crate::session::interface::{AuthSession, TokenStore};
use tokio::sync::RwLock;

/// Process-local [`TokenStore`]. The session is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: RwLock<Option<AuthSession>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: AuthSession) -> Self {
        Self {
            inner: RwLock::new(Some(session)),
        }
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<AuthSession>, AppError> {
        Ok(self.inner.read().await.clone())
    }

    async fn set(&self, session: AuthSession) -> Result<(), AppError> {
        *self.inner.write().await = Some(session);
        Ok(())
    }

    async fn clear(&self) -> Result<(), AppError> {
        *self.inner.write().await = None;
        Ok(())
    }
}
