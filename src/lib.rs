/******************************************************************************
    Author: ByteBodh
    Email: dev@bytebodh.com
    Date: 19/10/26
 ******************************************************************************/

//! Async client for the ByteBodh dashboard API.
//!
//! Every request goes through [`transport::http_client::AuthenticatedHttpClient`],
//! which attaches the stored bearer token and, on a `401`, refreshes the session
//! once and replays the request. The resource services (blogs, categories, job
//! notifications, users, contacts) are thin declarations on top of it, wired
//! together by [`ByteBodhClient`].

pub mod config;

pub mod constants;

pub mod error;

pub mod application;

pub mod presentation;

pub mod session;

pub mod storage;

pub mod transport;

pub mod utils;

pub use application::client::{ByteBodhClient, DashboardSummary};
pub use application::services::blog_service::BlogService;
pub use application::services::category_service::CategoryService;
pub use application::services::contact_service::ContactService;
pub use application::services::job_notification_service::JobNotificationService;
pub use application::services::user_service::UserService;
pub use config::{Config, Credentials};
pub use error::{AppError, AuthError};
