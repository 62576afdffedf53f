//! # Database Configuration
//!
//! Connection settings for the PostgreSQL catalog, read from the environment.

use std::time::Duration;

/// Pool sizing: 5 steady connections plus 5 overflow
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 0;
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Normalized connection URL
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    /// Apply bundled migrations at startup
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl AsRef<str>) -> Self {
        Self {
            url: normalize_database_url(url.as_ref()),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            run_migrations: false,
        }
    }

    /// Read `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS` and
    /// `DATABASE_RUN_MIGRATIONS`. Returns `None` when no URL is set.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty())?;
        let mut config = Self::new(url.trim());

        if let Some(max) = lookup("DATABASE_MAX_CONNECTIONS").and_then(|v| v.trim().parse().ok()) {
            config.max_connections = max;
        }
        config.run_migrations = lookup("DATABASE_RUN_MIGRATIONS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Some(config)
    }
}

/// Accept the URL spellings used by hosting providers and other drivers:
/// `postgres://`, `postgresql://`, and driver-qualified schemes such as
/// `postgresql+asyncpg://`.
pub fn normalize_database_url(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) if scheme.starts_with("postgres") => {
            let base = scheme.split('+').next().unwrap_or(scheme);
            format!("{}://{}", base, rest)
        }
        _ => url.to_string(),
    }
}
