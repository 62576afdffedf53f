//! # Street Shop
//!
//! Catalog and hosted-checkout backend.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export SQUARE_ACCESS_TOKEN=EAAA...
//! export SQUARE_LOCATION_ID=L...
//! export DATABASE_URL=postgres://localhost/shop   # or use config/products.toml
//!
//! # Run the server
//! street-shop
//! ```

use shop_api::{routes, AppConfig, AppState, LogFormat};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    print_banner();

    let addr = config.socket_addr()?;
    let state = AppState::new(config).await?;

    info!("Service: {}", state.config.api_name);
    info!("Catalog source: {}", state.catalog_source());

    let provider = state.strategy.status();
    info!(
        "Payment provider: {} ({}), token={}, location={}",
        provider.provider, provider.environment, provider.has_token, provider.has_location
    );
    if !provider.is_configured() {
        warn!("Payment provider credentials missing; checkout will answer 500");
    }

    let app = routes::create_router(state);

    info!("Street Shop starting on http://{}", addr);
    info!("Products: GET http://{}/products", addr);
    info!("Checkout: POST http://{}/create-payment-link", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` filter (default info), pretty or JSON output
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init(),
    }
}

fn print_banner() {
    println!(
        r#"
  Street Shop
  ━━━━━━━━━━━━━━━━━━━━━━━
  Catalog + hosted checkout
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
