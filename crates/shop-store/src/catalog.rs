//! # PostgreSQL Catalog
//!
//! `CatalogSource` backed by the `products`, `product_variants` and
//! `inventory` tables. Every call runs one query on a pooled connection;
//! nothing is cached.

use crate::config::DatabaseConfig;
use async_trait::async_trait;
use shop_core::{CatalogSource, Currency, Price, ShopError, ShopResult, Variant};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

const LIST_ACTIVE_VARIANTS: &str = r#"
    SELECT
        p.id                           AS product_id,
        p.name                         AS product_name,
        p.description                  AS description,
        v.id                           AS variant_id,
        v.label                        AS label,
        v.price_cents::BIGINT          AS price_cents,
        v.image_url                    AS image_url,
        COALESCE(i.in_stock, 0)::BIGINT AS in_stock,
        v.active                       AS active
    FROM product_variants v
    JOIN products p ON p.id = v.product_id
    LEFT JOIN inventory i ON i.variant_id = v.id
    WHERE v.active = TRUE
    ORDER BY p.name, v.label NULLS LAST
"#;

const LOOKUP_VARIANTS: &str = r#"
    SELECT
        p.id                           AS product_id,
        p.name                         AS product_name,
        p.description                  AS description,
        v.id                           AS variant_id,
        v.label                        AS label,
        v.price_cents::BIGINT          AS price_cents,
        v.image_url                    AS image_url,
        COALESCE(i.in_stock, 0)::BIGINT AS in_stock,
        v.active                       AS active
    FROM product_variants v
    JOIN products p ON p.id = v.product_id
    LEFT JOIN inventory i ON i.variant_id = v.id
    WHERE v.id = ANY($1)
"#;

/// One joined variant row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VariantRow {
    pub product_id: String,
    pub product_name: String,
    pub description: Option<String>,
    pub variant_id: String,
    pub label: Option<String>,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub in_stock: i64,
    pub active: bool,
}

impl VariantRow {
    /// Convert to a catalog variant, enforcing the non-negative price invariant
    pub fn into_variant(self, currency: Currency) -> ShopResult<Variant> {
        let price = Price::from_cents(self.price_cents, currency).map_err(|_| {
            ShopError::InvalidPrice {
                message: format!(
                    "variant {} has negative price {}",
                    self.variant_id, self.price_cents
                ),
            }
        })?;

        Ok(Variant {
            id: self.variant_id,
            product_id: self.product_id,
            product_name: self.product_name,
            label: self.label,
            description: self.description,
            price,
            image_url: self.image_url,
            stock: self.in_stock,
            active: self.active,
        })
    }
}

fn db_error(err: sqlx::Error) -> ShopError {
    ShopError::Database(err.to_string())
}

/// Catalog served from PostgreSQL
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
    currency: Currency,
}

impl PgCatalog {
    pub fn new(pool: PgPool, currency: Currency) -> Self {
        Self { pool, currency }
    }

    /// Open a pool, verify it with `SELECT 1`, and optionally migrate
    pub async fn connect(config: &DatabaseConfig, currency: Currency) -> ShopResult<Self> {
        info!("Initializing database connection pool");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .test_before_acquire(true)
            .connect(&config.url)
            .await
            .map_err(db_error)?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(db_error)?;

        if config.run_migrations {
            info!("Running database migrations");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| ShopError::Database(format!("migration failed: {}", e)))?;
        }

        info!("Database connection pool initialized");
        Ok(Self::new(pool, currency))
    }

    fn convert(&self, rows: Vec<VariantRow>) -> ShopResult<Vec<Variant>> {
        rows.into_iter()
            .map(|row| row.into_variant(self.currency))
            .collect()
    }
}

#[async_trait]
impl CatalogSource for PgCatalog {
    #[instrument(skip(self))]
    async fn list_variants(&self) -> ShopResult<Vec<Variant>> {
        let rows = sqlx::query_as::<_, VariantRow>(LIST_ACTIVE_VARIANTS)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        debug!("Loaded {} active variants", rows.len());
        self.convert(rows)
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn lookup(&self, ids: &[String]) -> ShopResult<HashMap<String, Variant>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, VariantRow>(LOOKUP_VARIANTS)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(self
            .convert(rows)?
            .into_iter()
            .map(|variant| (variant.id.clone(), variant))
            .collect())
    }

    fn source_name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(price_cents: i64, label: Option<&str>) -> VariantRow {
        VariantRow {
            product_id: "tee".into(),
            product_name: "Momentum Tee".into(),
            description: Some("Heavyweight cotton".into()),
            variant_id: "tee-m".into(),
            label: label.map(String::from),
            price_cents,
            image_url: None,
            in_stock: 0,
            active: true,
        }
    }

    #[test]
    fn test_row_into_variant() {
        let variant = row(2800, Some("M")).into_variant(Currency::USD).unwrap();
        assert_eq!(variant.id, "tee-m");
        assert_eq!(variant.product_id, "tee");
        assert_eq!(variant.display_name(), "Momentum Tee — M");
        assert_eq!(variant.price.amount, 2800);
        assert!(!variant.is_in_stock());
    }

    #[test]
    fn test_negative_price_row_rejected() {
        let err = row(-100, None).into_variant(Currency::USD).unwrap_err();
        assert!(matches!(err, ShopError::InvalidPrice { .. }));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_queries_select_the_row_columns() {
        for query in [LIST_ACTIVE_VARIANTS, LOOKUP_VARIANTS] {
            for column in [
                "product_id",
                "product_name",
                "description",
                "variant_id",
                "label",
                "price_cents",
                "image_url",
                "in_stock",
                "active",
            ] {
                assert!(query.contains(&format!("AS {}", column)), "{} missing", column);
            }
        }
    }
}
