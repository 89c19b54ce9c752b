use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    application::models::{
        contact::{Contact, ContactPayload},
        envelope::ApiResponse,
    },
    constants::CONTACTS_PATH,
    error::AppError,
    transport::{http_client::ApiHttpClient, model::ApiRequest},
};

/// Contact-form inquiries: listed on the dashboard, submitted from the site.
#[async_trait]
pub trait ContactService: Send + Sync {
    async fn list(&self) -> Result<Vec<Contact>, AppError>;

    async fn submit(&self, payload: &ContactPayload) -> Result<Contact, AppError>;
}

pub struct ContactServiceImpl<T: ApiHttpClient> {
    client: Arc<T>,
}

impl<T: ApiHttpClient> ContactServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: ApiHttpClient + 'static> ContactService for ContactServiceImpl<T> {
    async fn list(&self) -> Result<Vec<Contact>, AppError> {
        info!("Fetching contact inquiries");

        let result = self
            .client
            .request::<ApiResponse<Vec<Contact>>>(ApiRequest::get(CONTACTS_PATH))
            .await?
            .into_data();

        debug!("Fetched {} contact inquiries", result.len());
        Ok(result)
    }

    async fn submit(&self, payload: &ContactPayload) -> Result<Contact, AppError> {
        info!("Submitting contact inquiry");

        let request = ApiRequest::post(CONTACTS_PATH).json(payload)?;
        let result = self
            .client
            .request::<ApiResponse<Contact>>(request)
            .await?;
        Ok(result.into_data())
    }
}
