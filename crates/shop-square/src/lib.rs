//! # shop-square
//!
//! Square payment strategy for street-shop.
//!
//! `SquarePaymentLinks` turns a validated `Order` into a Square order plus a
//! hosted payment page via the Online Checkout API, and returns the page URL.
//! Each call sends the order's own idempotency key; there are no retries.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_square::SquarePaymentLinks;
//! use shop_core::PaymentStrategy;
//!
//! // Reads SQUARE_ACCESS_TOKEN, SQUARE_LOCATION_ID, SQUARE_ENV
//! let strategy = SquarePaymentLinks::from_env()?;
//!
//! let link = strategy.create_payment_link(
//!     &order,
//!     "https://example.com/thanks",
//!     "https://example.com/cart",
//! ).await?;
//!
//! // Redirect user to link.url
//! ```

pub mod config;
pub mod links;

// Re-exports
pub use config::{SquareConfig, SquareEnvironment};
pub use links::SquarePaymentLinks;
