use serde::Deserialize;
use std::fmt;

/// Where the session tokens are persisted. `None` keeps them in memory only.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TokenStorageConfig {
    pub path: Option<String>,
}

impl fmt::Display for TokenStorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"path\":{}}}",
            self.path
                .as_ref()
                .map_or("null".to_string(), |p| format!("\"{}\"", p))
        )
    }
}
