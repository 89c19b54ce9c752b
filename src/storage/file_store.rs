/******************************************************************************
    Author: ByteBodh
    Email: dev@bytebodh.com
    Date: 19/10/26
 ******************************************************************************/
use crate::error::AppError;
use crate::presentation::serialization::Serializer;
use crate::session::interface::{AuthSession, TokenStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// [`TokenStore`] persisting the session as JSON so it survives restarts.
///
/// Reads are served from memory; every `set` rewrites the file and `clear`
/// removes it.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cached: RwLock<Option<AuthSession>>,
}

impl FileTokenStore {
    /// Opens the store, loading a previously saved session if one exists.
    ///
    /// An unreadable or corrupt file is treated as "no session" and logged.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let cached = match fs::read_to_string(&path).await {
            Ok(contents) => match Serializer::from_json::<AuthSession>(&contents) {
                Ok(session) => {
                    debug!("Loaded persisted session from {}", path.display());
                    Some(session)
                }
                Err(e) => {
                    warn!("Ignoring unreadable session file {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            cached: RwLock::new(cached),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Result<Option<AuthSession>, AppError> {
        Ok(self.cached.read().await.clone())
    }

    async fn set(&self, session: AuthSession) -> Result<(), AppError> {
        let mut cached = self.cached.write().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, Serializer::to_json_pretty(&session)?).await?;
        *cached = Some(session);
        Ok(())
    }

    async fn clear(&self) -> Result<(), AppError> {
        let mut cached = self.cached.write().await;
        *cached = None;
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
