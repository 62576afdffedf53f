//! # shop-api
//!
//! HTTP API layer for street-shop.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Route index |
//! | GET | `/health` | Health check |
//! | GET | `/config-check` | Which provider credentials are set |
//! | GET | `/products` | List products |
//! | POST | `/create-payment-link` | Create hosted checkout link |
//! | POST | `/create-checkout-session` | Alias of `/create-payment-link` |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, CorsOrigins, LogFormat};
