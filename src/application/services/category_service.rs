use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    application::models::{
        category::{Category, CategoryPayload},
        envelope::ApiResponse,
    },
    constants::CATEGORIES_PATH,
    error::AppError,
    transport::{
        http_client::ApiHttpClient,
        model::{resource_path, ApiRequest},
    },
};

#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, AppError>;

    async fn get_by_id(&self, id: &str) -> Result<Category, AppError>;

    async fn create(&self, payload: &CategoryPayload) -> Result<Category, AppError>;

    async fn update(&self, id: &str, payload: &CategoryPayload) -> Result<Category, AppError>;

    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

pub struct CategoryServiceImpl<T: ApiHttpClient> {
    client: Arc<T>,
}

impl<T: ApiHttpClient> CategoryServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: ApiHttpClient + 'static> CategoryService for CategoryServiceImpl<T> {
    async fn list(&self) -> Result<Vec<Category>, AppError> {
        info!("Fetching categories");

        let result = self
            .client
            .request::<ApiResponse<Vec<Category>>>(ApiRequest::get(CATEGORIES_PATH))
            .await?
            .into_data();

        debug!("Fetched {} categories", result.len());
        Ok(result)
    }

    async fn get_by_id(&self, id: &str) -> Result<Category, AppError> {
        let path = resource_path(CATEGORIES_PATH, &[id]);

        let result = self
            .client
            .request::<ApiResponse<Category>>(ApiRequest::get(path))
            .await?;
        Ok(result.into_data())
    }

    async fn create(&self, payload: &CategoryPayload) -> Result<Category, AppError> {
        info!("Creating category '{}'", payload.name);

        let request = ApiRequest::post(CATEGORIES_PATH).json(payload)?;
        let result = self
            .client
            .request::<ApiResponse<Category>>(request)
            .await?;
        Ok(result.into_data())
    }

    async fn update(&self, id: &str, payload: &CategoryPayload) -> Result<Category, AppError> {
        let path = resource_path(CATEGORIES_PATH, &[id]);
        info!("Updating category {}", id);

        let request = ApiRequest::put(path).json(payload)?;
        let result = self
            .client
            .request::<ApiResponse<Category>>(request)
            .await?;
        Ok(result.into_data())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let path = resource_path(CATEGORIES_PATH, &[id]);
        info!("Deleting category {}", id);

        self.client
            .request::<serde_json::Value>(ApiRequest::delete(path))
            .await?;
        Ok(())
    }
}
