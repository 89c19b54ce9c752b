use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    application::models::{envelope::ApiResponse, user::User},
    constants::USERS_PATH,
    error::AppError,
    transport::{
        http_client::ApiHttpClient,
        model::{resource_path, ApiRequest},
    },
};

#[async_trait]
pub trait UserService: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, AppError>;

    async fn get_by_id(&self, id: &str) -> Result<User, AppError>;
}

pub struct UserServiceImpl<T: ApiHttpClient> {
    client: Arc<T>,
}

impl<T: ApiHttpClient> UserServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: ApiHttpClient + 'static> UserService for UserServiceImpl<T> {
    async fn list(&self) -> Result<Vec<User>, AppError> {
        info!("Fetching users");

        let result = self
            .client
            .request::<ApiResponse<Vec<User>>>(ApiRequest::get(USERS_PATH))
            .await?
            .into_data();

        debug!("Fetched {} users", result.len());
        Ok(result)
    }

    async fn get_by_id(&self, id: &str) -> Result<User, AppError> {
        let path = resource_path(USERS_PATH, &[id]);
        info!("Fetching user {}", id);

        let result = self
            .client
            .request::<ApiResponse<User>>(ApiRequest::get(path))
            .await?;
        Ok(result.into_data())
    }
}
