pub mod blog_service;
pub mod category_service;
pub mod contact_service;
pub mod job_notification_service;
pub mod user_service;
