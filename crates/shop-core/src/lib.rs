//! # shop-core
//!
//! Core types and traits for the street-shop catalog and checkout service.
//!
//! This crate provides:
//! - `Variant`, `Price` and `ProductListing` for the catalog
//! - `CatalogSource` trait and the file-backed `StaticCatalog`
//! - `PaymentStrategy` trait for hosted-checkout providers
//! - `CheckoutService`, which validates carts and mints checkout links
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{CartItem, CheckoutRequest, CheckoutService, StaticCatalog, Currency};
//!
//! let catalog = StaticCatalog::from_path("config/products.toml", Currency::USD)?;
//! let service = CheckoutService::new(Arc::new(catalog), strategy);
//!
//! let link = service.create_link(&CheckoutRequest {
//!     items: vec![CartItem::new("tee-black-m", 2)],
//!     success_url: "https://shop.example/thanks".into(),
//!     cancel_url: "https://shop.example/cart".into(),
//! }).await?;
//!
//! // Redirect user to link.url
//! ```

pub mod catalog;
pub mod checkout;
pub mod error;
pub mod order;
pub mod product;
pub mod strategy;

// Re-exports for convenience
pub use catalog::{BoxedCatalogSource, CatalogSource, StaticCatalog};
pub use checkout::CheckoutService;
pub use error::{ShopError, ShopResult};
pub use order::{CartItem, CheckoutLink, CheckoutRequest, LineItem, Order};
pub use product::{listing_order, Currency, Price, ProductListing, Variant};
pub use strategy::{BoxedPaymentStrategy, PaymentStrategy, ProviderStatus};
