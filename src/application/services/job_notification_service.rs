use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    application::models::{
        envelope::ApiResponse,
        job_notification::{JobNotification, JobNotificationPayload},
    },
    constants::JOB_NOTIFICATIONS_PATH,
    error::AppError,
    transport::{
        http_client::ApiHttpClient,
        model::{resource_path, ApiRequest},
    },
};

/// Job postings, including the toggle that hides a posting from the site.
#[async_trait]
pub trait JobNotificationService: Send + Sync {
    async fn list(&self) -> Result<Vec<JobNotification>, AppError>;

    async fn get_by_id(&self, id: &str) -> Result<JobNotification, AppError>;

    async fn create(&self, payload: &JobNotificationPayload) -> Result<JobNotification, AppError>;

    async fn update(
        &self,
        id: &str,
        payload: &JobNotificationPayload,
    ) -> Result<JobNotification, AppError>;

    async fn delete(&self, id: &str) -> Result<(), AppError>;

    /// `PATCH /api/job-notifications/{id}/active?isActive={bool}`
    ///
    /// Returns `None` when the backend acknowledges the change without
    /// echoing the updated posting.
    async fn update_active_status(
        &self,
        id: &str,
        is_active: bool,
    ) -> Result<Option<JobNotification>, AppError>;
}

pub struct JobNotificationServiceImpl<T: ApiHttpClient> {
    client: Arc<T>,
}

impl<T: ApiHttpClient> JobNotificationServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: ApiHttpClient + 'static> JobNotificationService for JobNotificationServiceImpl<T> {
    async fn list(&self) -> Result<Vec<JobNotification>, AppError> {
        info!("Fetching job notifications");

        let result = self
            .client
            .request::<ApiResponse<Vec<JobNotification>>>(ApiRequest::get(JOB_NOTIFICATIONS_PATH))
            .await?
            .into_data();

        debug!("Fetched {} job notifications", result.len());
        Ok(result)
    }

    async fn get_by_id(&self, id: &str) -> Result<JobNotification, AppError> {
        let path = resource_path(JOB_NOTIFICATIONS_PATH, &[id]);

        let result = self
            .client
            .request::<ApiResponse<JobNotification>>(ApiRequest::get(path))
            .await?;
        Ok(result.into_data())
    }

    async fn create(&self, payload: &JobNotificationPayload) -> Result<JobNotification, AppError> {
        info!("Creating job notification '{}'", payload.title);

        let request = ApiRequest::post(JOB_NOTIFICATIONS_PATH).json(payload)?;
        let result = self
            .client
            .request::<ApiResponse<JobNotification>>(request)
            .await?;
        Ok(result.into_data())
    }

    async fn update(
        &self,
        id: &str,
        payload: &JobNotificationPayload,
    ) -> Result<JobNotification, AppError> {
        let path = resource_path(JOB_NOTIFICATIONS_PATH, &[id]);
        info!("Updating job notification {}", id);

        let request = ApiRequest::put(path).json(payload)?;
        let result = self
            .client
            .request::<ApiResponse<JobNotification>>(request)
            .await?;
        Ok(result.into_data())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let path = resource_path(JOB_NOTIFICATIONS_PATH, &[id]);
        info!("Deleting job notification {}", id);

        self.client
            .request::<serde_json::Value>(ApiRequest::delete(path))
            .await?;
        Ok(())
    }

    async fn update_active_status(
        &self,
        id: &str,
        is_active: bool,
    ) -> Result<Option<JobNotification>, AppError> {
        let path = resource_path(JOB_NOTIFICATIONS_PATH, &[id, "active"]);
        info!("Setting job notification {} active={}", id, is_active);

        let request = ApiRequest::patch(path).query("isActive", is_active);
        let body = self.client.request::<serde_json::Value>(request).await?;
        Ok(ApiResponse::<JobNotification>::decode_optional(body)?)
    }
}
