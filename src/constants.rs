/******************************************************************************
   Author: ByteBodh
   Email: dev@bytebodh.com
   Date: 19/10/26
******************************************************************************/

pub(crate) const AUTHORIZATION_HEADER_KEY: &str = "Authorization";
pub(crate) const BEARER_PREFIX: &str = "Bearer ";

pub(crate) const LOGIN_PATH: &str = "/auth/login";
pub(crate) const REFRESH_TOKEN_PATH: &str = "/auth/refresh-token";

pub(crate) const BLOGS_PATH: &str = "/api/blogs";
pub(crate) const CATEGORIES_PATH: &str = "/api/categories";
pub(crate) const JOB_NOTIFICATIONS_PATH: &str = "/api/job-notifications";
pub(crate) const USERS_PATH: &str = "/api/users";
pub(crate) const CONTACTS_PATH: &str = "/api/contacts";

/// Multipart part carrying the JSON metadata of a blog post.
pub(crate) const BLOG_DATA_PART: &str = "data";
/// Multipart part carrying the blog cover image.
pub(crate) const BLOG_IMAGE_PART: &str = "image";

pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub(crate) const DEFAULT_REST_TIMEOUT: u64 = 30;
