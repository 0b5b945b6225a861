//! Database settings.

use crate::error::{JoblyError, JoblyResult};
use serde::Deserialize;

/// Default upper bound on pooled connections.
pub const DEFAULT_MAX_POOL_SIZE: usize = 16;

/// Connection settings for the record store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DbConfig {
    pub url: String,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: usize,
}

fn default_max_pool_size() -> usize {
    DEFAULT_MAX_POOL_SIZE
}

impl DbConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
        }
    }

    /// Read `DATABASE_URL` and `JOBLY_POOL_MAX_SIZE` from the process
    /// environment, after loading a `.env` file if one exists.
    pub fn from_env() -> JoblyResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> JoblyResult<Self> {
        let url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| JoblyError::Config("DATABASE_URL is not set".to_string()))?;

        let max_pool_size = match lookup("JOBLY_POOL_MAX_SIZE") {
            None => DEFAULT_MAX_POOL_SIZE,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(JoblyError::Config(format!(
                        "JOBLY_POOL_MAX_SIZE must be a positive integer, got {raw:?}"
                    )));
                }
            },
        };

        Ok(Self { url, max_pool_size })
    }
}
