//! # Square Configuration
//!
//! Configuration management for the Square integration.
//! Credentials come from environment variables; missing credentials are not
//! an error at startup so that `/config-check` can report them.

use shop_core::ShopError;
use std::env;
use std::time::Duration;

/// `Square-Version` header sent when `SQUARE_API_VERSION` is not set
pub const DEFAULT_API_VERSION: &str = "2025-01-23";

/// Provider request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Square environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquareEnvironment {
    Sandbox,
    Production,
}

impl SquareEnvironment {
    /// `"sandbox"` (any case) selects the sandbox; anything else is production
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("sandbox") {
            SquareEnvironment::Sandbox
        } else {
            SquareEnvironment::Production
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SquareEnvironment::Sandbox => "sandbox",
            SquareEnvironment::Production => "production",
        }
    }

    /// API host for this environment
    pub fn base_url(&self) -> &'static str {
        match self {
            SquareEnvironment::Sandbox => "https://connect.squareupsandbox.com",
            SquareEnvironment::Production => "https://connect.squareup.com",
        }
    }
}

/// Square API configuration
#[derive(Debug, Clone)]
pub struct SquareConfig {
    /// Access token (`SQUARE_ACCESS_TOKEN`)
    pub access_token: Option<String>,

    /// Location the orders are created for (`SQUARE_LOCATION_ID`)
    pub location_id: Option<String>,

    /// Sandbox or production (`SQUARE_ENV`)
    pub environment: SquareEnvironment,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,

    /// Ask the hosted page to collect a shipping address
    pub ask_for_shipping_address: bool,

    /// Request timeout
    pub timeout: Duration,
}

impl SquareConfig {
    /// Load configuration from environment variables.
    ///
    /// Read env vars:
    /// - `SQUARE_ACCESS_TOKEN`
    /// - `SQUARE_LOCATION_ID`
    /// - `SQUARE_ENV` (default `sandbox`)
    /// - `SQUARE_API_VERSION`
    /// - `SQUARE_ASK_FOR_SHIPPING` (default `true`)
    pub fn from_env() -> Result<Self, ShopError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ShopError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = non_empty("SQUARE_ENV")
            .map(|v| SquareEnvironment::parse(&v))
            .unwrap_or(SquareEnvironment::Sandbox);

        let ask_for_shipping_address = match non_empty("SQUARE_ASK_FOR_SHIPPING") {
            Some(v) => parse_flag(&v).ok_or_else(|| {
                ShopError::Configuration(format!(
                    "SQUARE_ASK_FOR_SHIPPING must be true or false, got {}",
                    v
                ))
            })?,
            None => true,
        };

        Ok(Self {
            access_token: non_empty("SQUARE_ACCESS_TOKEN"),
            location_id: non_empty("SQUARE_LOCATION_ID"),
            environment,
            api_base_url: environment.base_url().to_string(),
            api_version: non_empty("SQUARE_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            ask_for_shipping_address,
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        access_token: impl Into<String>,
        location_id: impl Into<String>,
        environment: SquareEnvironment,
    ) -> Self {
        Self {
            access_token: Some(access_token.into()),
            location_id: Some(location_id.into()),
            environment,
            api_base_url: environment.base_url().to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            ask_for_shipping_address: true,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn has_location(&self) -> bool {
        self.location_id.is_some()
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> Option<String> {
        self.access_token
            .as_ref()
            .map(|token| format!("Bearer {}", token))
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: toggle shipping address collection
    pub fn with_shipping_address(mut self, ask: bool) -> Self {
        self.ask_for_shipping_address = ask;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
