//! # shop-store
//!
//! PostgreSQL catalog backend for street-shop.
//!
//! Variants are read from `product_variants` joined with `products` and
//! left-joined with `inventory` (missing inventory rows count as zero stock).
//! The schema ships as `sqlx` migrations under `migrations/`.

pub mod catalog;
pub mod config;

pub use catalog::{PgCatalog, VariantRow};
pub use config::{normalize_database_url, DatabaseConfig};
