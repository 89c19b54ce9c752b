use crate::constants::{DEFAULT_BASE_URL, DEFAULT_REST_TIMEOUT};
use crate::storage::config::TokenStorageConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::error;

/// Dashboard login credentials.
#[derive(Deserialize, Serialize, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub rest_api: RestApiConfig,
    pub token_storage: TokenStorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RestApiConfig {
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"email\":\"{}\",\"password\":\"[REDACTED]\"}}",
            self.email
        )
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"credentials\":{},\"rest_api\":{},\"token_storage\":{}}}",
            self.credentials, self.rest_api, self.token_storage
        )
    }
}

impl fmt::Display for RestApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"base_url\":\"{}\",\"timeout\":{}}}",
            self.base_url, self.timeout
        )
    }
}

pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            credentials: Credentials {
                email: get_env_or_default("BYTEBODH_EMAIL", String::from("admin@bytebodh.com")),
                password: get_env_or_default("BYTEBODH_PASSWORD", String::from("default_password")),
            },
            rest_api: RestApiConfig {
                base_url: get_env_or_default(
                    "BYTEBODH_API_BASE_URL",
                    String::from(DEFAULT_BASE_URL),
                ),
                timeout: get_env_or_default("BYTEBODH_API_TIMEOUT", DEFAULT_REST_TIMEOUT),
            },
            token_storage: TokenStorageConfig {
                path: env::var("BYTEBODH_TOKEN_PATH")
                    .ok()
                    .filter(|p| !p.trim().is_empty()),
            },
        }
    }

    /// Same as [`Config::new`] with the base URL replaced, handy for tests and demos.
    pub fn with_base_url(base_url: &str) -> Self {
        let mut config = Self::new();
        config.rest_api.base_url = base_url.to_string();
        config
    }
}
