pub mod blog;
pub mod category;
pub mod contact;
pub mod envelope;
pub mod job_notification;
pub mod user;
