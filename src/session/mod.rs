pub mod auth;
pub mod interface;
pub mod session_response;
