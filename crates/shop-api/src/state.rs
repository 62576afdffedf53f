//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the catalog backend, the payment strategy and configuration.

use anyhow::Context;
use shop_core::{
    BoxedCatalogSource, BoxedPaymentStrategy, CatalogSource, CheckoutService, Currency,
    StaticCatalog,
};
use shop_square::{SquareConfig, SquarePaymentLinks};
use shop_store::{DatabaseConfig, PgCatalog};
use std::path::PathBuf;
use std::sync::Arc;

/// Static catalog locations tried when `CATALOG_PATH` is not set
const DEFAULT_CATALOG_PATHS: [&str; 3] = [
    "config/products.toml",
    "../config/products.toml",
    "../../config/products.toml",
];

/// Allowed CORS origins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// `*`
    Any,
    /// Explicit origins; credentials are allowed
    List(Vec<String>),
}

impl CorsOrigins {
    /// `*` or a comma-separated origin list
    pub fn parse(value: &str) -> Self {
        let origins: Vec<String> = value
            .split(',')
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Service name
    pub api_name: String,
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins
    pub cors_origins: CorsOrigins,
    /// Currency of catalog prices
    pub currency: Currency,
    /// Explicit static catalog path
    pub catalog_path: Option<PathBuf>,
    /// PostgreSQL catalog, when `DATABASE_URL` is set
    pub database: Option<DatabaseConfig>,
    /// Log output format
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a number, got {}", p))?,
            None => 8080,
        };

        let currency = match get("SHOP_CURRENCY") {
            Some(c) => c.parse::<Currency>()?,
            None => Currency::USD,
        };

        let log_format = match get("LOG_FORMAT").as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            api_name: get("API_NAME").unwrap_or_else(|| "Street Momentum API".to_string()),
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            cors_origins: CorsOrigins::parse(
                &get("CORS_ORIGIN").unwrap_or_else(|| "*".to_string()),
            ),
            currency,
            catalog_path: get("CATALOG_PATH").map(PathBuf::from),
            database: DatabaseConfig::from_lookup(&lookup),
            log_format,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Catalog backend
    pub catalog: BoxedCatalogSource,
    /// Payment provider
    pub strategy: BoxedPaymentStrategy,
    /// Cart validation + link creation
    pub checkout: CheckoutService,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build state for `config`: database or static catalog, Square strategy
    /// read from the environment.
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let square = SquareConfig::from_env()?;
        let strategy = SquarePaymentLinks::new(square)?;

        let catalog: BoxedCatalogSource = match &config.database {
            Some(db) => Arc::new(
                PgCatalog::connect(db, config.currency)
                    .await
                    .context("Failed to initialize database catalog")?,
            ),
            None => Arc::new(load_static_catalog(&config)?),
        };

        Ok(Self::from_parts(config, catalog, Arc::new(strategy)))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(
        config: AppConfig,
        catalog: BoxedCatalogSource,
        strategy: BoxedPaymentStrategy,
    ) -> Self {
        let checkout = CheckoutService::new(catalog.clone(), strategy.clone())
            .with_currency(config.currency);
        Self {
            catalog,
            strategy,
            checkout,
            config,
        }
    }

    pub fn catalog_source(&self) -> &'static str {
        self.catalog.source_name()
    }
}

/// Load the static catalog: `CATALOG_PATH` must exist when given; otherwise
/// the default locations are tried and an empty catalog is the fallback.
fn load_static_catalog(config: &AppConfig) -> anyhow::Result<StaticCatalog> {
    if let Some(path) = &config.catalog_path {
        let catalog = StaticCatalog::from_path(path, config.currency)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?;
        tracing::info!("Loaded {} variants from {}", catalog.len(), path.display());
        return Ok(catalog);
    }

    for path in DEFAULT_CATALOG_PATHS {
        if std::path::Path::new(path).exists() {
            let catalog = StaticCatalog::from_path(path, config.currency)
                .with_context(|| format!("Failed to load catalog {}", path))?;
            tracing::info!("Loaded {} variants from {}", catalog.len(), path);
            return Ok(catalog);
        }
    }

    tracing::warn!("No DATABASE_URL and no product catalog found, using empty catalog");
    Ok(StaticCatalog::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_app_config_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_name, "Street Momentum API");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, CorsOrigins::Any);
        assert_eq!(config.currency, Currency::USD);
        assert!(config.database.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_app_config_overrides() {
        let config = config_from(&[
            ("PORT", "3000"),
            ("CORS_ORIGIN", "https://shop.example/, https://admin.shop.example"),
            ("DATABASE_URL", "postgres://db/shop"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(
            config.cors_origins,
            CorsOrigins::List(vec![
                "https://shop.example".to_string(),
                "https://admin.shop.example".to_string()
            ])
        );
        assert_eq!(config.database.unwrap().url, "postgres://db/shop");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_bad_port_rejected() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = config_from(&[("HOST", "0.0.0.0"), ("PORT", "3000")]).unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_cors_wildcard_in_list() {
        assert_eq!(CorsOrigins::parse("https://a.example,*"), CorsOrigins::Any);
        assert_eq!(CorsOrigins::parse(""), CorsOrigins::Any);
    }
}
