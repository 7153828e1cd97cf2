use anyhow::{Context, Result};
use axum::http::HeaderValue;
use cf_tracker_libs::CodeforcesConfig;
use std::env;

const DEFAULT_HANDLE: &str = "tourist";
const DEFAULT_DATABASE_URL: &str = "sqlite://cf_tracker.db";
const DEFAULT_FRONTEND_ORIGINS: &str =
    "http://localhost:5173,http://localhost:5174,http://localhost:3000";

/// Process wide settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub codeforces: CodeforcesConfig,
    pub default_handle: String,
    pub database_url: String,
    pub frontend_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = CodeforcesConfig::default();
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let or_default = |key: &str, default: &str| {
            optional(key).unwrap_or_else(|| {
                tracing::warn!(
                    "{} environment variable is not set. Default value `{}` will be used.",
                    key,
                    default
                );
                String::from(default)
            })
        };

        let workers = match optional("CF_API_WORKERS") {
            Some(workers) => workers
                .trim()
                .parse::<usize>()
                .with_context(|| format!("CF_API_WORKERS must be a number: {}", workers))?,
            None => defaults.workers,
        };

        let api_key = optional("CF_API_KEY");
        let api_secret = optional("CF_API_SECRET");
        if api_key.is_none() || api_secret.is_none() {
            tracing::warn!("CF_API_KEY or CF_API_SECRET is not set. Friends lookup is disabled.");
        }

        let codeforces = CodeforcesConfig {
            base_url: or_default("CF_API_BASE_URL", defaults.base_url.as_str()),
            api_key,
            api_secret,
            workers,
            short_timeout: defaults.short_timeout,
            bulk_timeout: defaults.bulk_timeout,
        };

        let frontend_origins = or_default("FRONTEND_ORIGINS", DEFAULT_FRONTEND_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(AppConfig {
            codeforces,
            default_handle: or_default("CF_DEFAULT_HANDLE", DEFAULT_HANDLE),
            database_url: or_default("DATABASE_URL", DEFAULT_DATABASE_URL),
            frontend_origins,
        })
    }

    /// Allowed CORS origins as header values.
    pub fn origin_headers(&self) -> Result<Vec<HeaderValue>> {
        self.frontend_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid origin in FRONTEND_ORIGINS: {}", origin))
            })
            .collect()
    }
}
