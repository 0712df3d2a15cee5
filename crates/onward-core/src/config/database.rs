use serde::{Deserialize, Serialize};

use crate::error::{OnwardError, Result};

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL. Usually supplied through `DATABASE_URL`.
    #[serde(default)]
    pub url: String,

    /// Connection pool size.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Pool checkout timeout in seconds.
    #[serde(default = "default_pool_timeout")]
    pub pool_timeout_secs: u64,

    /// Statement timeout in seconds. Zero disables the limit.
    #[serde(default)]
    pub statement_timeout_secs: u64,

    /// Namespace holding the version table.
    #[serde(default = "default_schema")]
    pub schema: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            pool_size: default_pool_size(),
            pool_timeout_secs: default_pool_timeout(),
            statement_timeout_secs: 0,
            schema: default_schema(),
        }
    }
}

impl DatabaseConfig {
    /// The connection URL, or a configuration error when none was given.
    pub fn require_url(&self) -> Result<&str> {
        if self.url.trim().is_empty() {
            return Err(OnwardError::Config(
                "DATABASE_URL is not set and no database.url was configured".to_string(),
            ));
        }
        Ok(&self.url)
    }
}

fn default_pool_size() -> u32 {
    2
}

fn default_pool_timeout() -> u64 {
    30
}

pub(crate) fn default_schema() -> String {
    "onward".to_string()
}

/// Check that `name` can be spliced into SQL as an unquoted identifier.
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if !valid || name.len() > 63 {
        return Err(OnwardError::Config(format!(
            "Invalid schema name '{}': expected [A-Za-z_][A-Za-z0-9_]*",
            name
        )));
    }
    Ok(())
}
