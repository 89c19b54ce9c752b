use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    application::models::{
        blog::{Blog, BlogPayload},
        envelope::ApiResponse,
    },
    constants::{BLOGS_PATH, BLOG_DATA_PART, BLOG_IMAGE_PART},
    error::AppError,
    transport::{
        http_client::ApiHttpClient,
        model::{resource_path, ApiRequest, Attachment, MultipartBody},
    },
};

/// Blog posts: listing, lookup and multipart create/update with a cover image.
#[async_trait]
pub trait BlogService: Send + Sync {
    async fn list(&self) -> Result<Vec<Blog>, AppError>;

    async fn get_by_id(&self, id: &str) -> Result<Blog, AppError>;

    async fn get_by_slug(&self, slug: &str) -> Result<Blog, AppError>;

    async fn create(&self, payload: &BlogPayload, image: Option<Attachment>)
        -> Result<Blog, AppError>;

    async fn update(
        &self,
        id: &str,
        payload: &BlogPayload,
        image: Option<Attachment>,
    ) -> Result<Blog, AppError>;

    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

pub struct BlogServiceImpl<T: ApiHttpClient> {
    client: Arc<T>,
}

impl<T: ApiHttpClient> BlogServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }

    fn multipart(payload: &BlogPayload, image: Option<Attachment>) -> Result<MultipartBody, AppError> {
        MultipartBody::new(BLOG_DATA_PART, payload, BLOG_IMAGE_PART, image)
    }
}

#[async_trait]
impl<T: ApiHttpClient + 'static> BlogService for BlogServiceImpl<T> {
    async fn list(&self) -> Result<Vec<Blog>, AppError> {
        info!("Fetching blogs");

        let result = self
            .client
            .request::<ApiResponse<Vec<Blog>>>(ApiRequest::get(BLOGS_PATH))
            .await?
            .into_data();

        debug!("Fetched {} blogs", result.len());
        Ok(result)
    }

    async fn get_by_id(&self, id: &str) -> Result<Blog, AppError> {
        let path = resource_path(BLOGS_PATH, &[id]);
        info!("Fetching blog {}", id);

        let result = self
            .client
            .request::<ApiResponse<Blog>>(ApiRequest::get(path))
            .await?;
        Ok(result.into_data())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Blog, AppError> {
        let path = resource_path(BLOGS_PATH, &["slug", slug]);
        info!("Fetching blog by slug {}", slug);

        let result = self
            .client
            .request::<ApiResponse<Blog>>(ApiRequest::get(path))
            .await?;
        Ok(result.into_data())
    }

    async fn create(
        &self,
        payload: &BlogPayload,
        image: Option<Attachment>,
    ) -> Result<Blog, AppError> {
        info!("Creating blog '{}', with image: {}", payload.title, image.is_some());

        let body = Self::multipart(payload, image)?;
        let result = self
            .client
            .request::<ApiResponse<Blog>>(ApiRequest::post(BLOGS_PATH).multipart(body))
            .await?
            .into_data();

        debug!("Created blog {}", result.id);
        Ok(result)
    }

    async fn update(
        &self,
        id: &str,
        payload: &BlogPayload,
        image: Option<Attachment>,
    ) -> Result<Blog, AppError> {
        let path = resource_path(BLOGS_PATH, &[id]);
        info!("Updating blog {}, with image: {}", id, image.is_some());

        let body = Self::multipart(payload, image)?;
        let result = self
            .client
            .request::<ApiResponse<Blog>>(ApiRequest::put(path).multipart(body))
            .await?;
        Ok(result.into_data())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let path = resource_path(BLOGS_PATH, &[id]);
        info!("Deleting blog {}", id);

        self.client
            .request::<serde_json::Value>(ApiRequest::delete(path))
            .await?;
        Ok(())
    }
}
