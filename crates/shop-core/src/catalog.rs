//! # Catalog Sources
//!
//! `CatalogSource` abstracts where variants come from. The database backend
//! lives in `shop-store`; `StaticCatalog` here serves a TOML file such as
//! `config/products.toml`:
//!
//! ```toml
//! currency = "USD"
//!
//! [[variants]]
//! id = "tee-black-m"
//! product_id = "tee-black"
//! product_name = "Momentum Tee"
//! label = "Black / M"
//! price_cents = 2800
//! in_stock = 12
//! ```

use crate::error::{ShopError, ShopResult};
use crate::product::{listing_order, Currency, Price, Variant};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Read access to the purchasable variants
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All active variants, sorted by product name then label.
    async fn list_variants(&self) -> ShopResult<Vec<Variant>>;

    /// Variants for the given ids, keyed by id. Ids that do not exist are
    /// absent from the map; inactive variants are included.
    async fn lookup(&self, ids: &[String]) -> ShopResult<HashMap<String, Variant>>;

    /// Backend name (for logging)
    fn source_name(&self) -> &'static str;
}

/// Type alias for a shared catalog (dynamic dispatch)
pub type BoxedCatalogSource = Arc<dyn CatalogSource>;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    currency: Option<Currency>,
    #[serde(default)]
    variants: Vec<VariantRecord>,
}

#[derive(Debug, Deserialize)]
struct VariantRecord {
    id: String,
    #[serde(default)]
    product_id: Option<String>,
    product_name: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    description: Option<String>,
    price_cents: i64,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    in_stock: i64,
    #[serde(default = "default_true")]
    active: bool,
}

fn default_true() -> bool {
    true
}

impl VariantRecord {
    fn into_variant(self, currency: Currency) -> ShopResult<Variant> {
        let price = Price::from_cents(self.price_cents, currency).map_err(|_| {
            ShopError::InvalidPrice {
                message: format!("variant {} has negative price {}", self.id, self.price_cents),
            }
        })?;
        Ok(Variant {
            product_id: self.product_id.unwrap_or_else(|| self.id.clone()),
            id: self.id,
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

/// Catalog held in memory, loaded from a static list
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    variants: Vec<Variant>,
}

impl StaticCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from variants
    pub fn from_variants(variants: impl IntoIterator<Item = Variant>) -> Self {
        let mut catalog = Self::new();
        for variant in variants {
            catalog.add(variant);
        }
        catalog
    }

    /// Add a variant to the catalog
    pub fn add(&mut self, variant: Variant) {
        self.variants.push(variant);
    }

    /// Builder: add a variant
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.add(variant);
        self
    }

    /// Find a variant by ID
    pub fn get(&self, id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Load catalog from TOML string with prices in `currency`. A file that
    /// names a different currency is rejected.
    pub fn from_toml(toml_str: &str, currency: Currency) -> ShopResult<Self> {
        let file: CatalogFile =
            toml::from_str(toml_str).map_err(|e| ShopError::Catalog(e.to_string()))?;
        if let Some(declared) = file.currency.filter(|c| *c != currency) {
            return Err(ShopError::Catalog(format!(
                "catalog currency {} does not match shop currency {}",
                declared.as_str(),
                currency.as_str()
            )));
        }
        let variants = file
            .variants
            .into_iter()
            .map(|record| record.into_variant(currency))
            .collect::<ShopResult<Vec<_>>>()?;
        Ok(Self::from_variants(variants))
    }

    /// Load catalog from a TOML file
    pub fn from_path(path: impl AsRef<Path>, currency: Currency) -> ShopResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ShopError::Catalog(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content, currency)
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn list_variants(&self) -> ShopResult<Vec<Variant>> {
        let mut active: Vec<Variant> =
            self.variants.iter().filter(|v| v.active).cloned().collect();
        active.sort_by(listing_order);
        Ok(active)
    }

    async fn lookup(&self, ids: &[String]) -> ShopResult<HashMap<String, Variant>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.get(id).map(|v| (id.clone(), v.clone())))
            .collect())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[variants]]
        id = "tee-m"
        product_id = "tee"
        product_name = "Momentum Tee"
        label = "M"
        price_cents = 2800
        in_stock = 4

        [[variants]]
        id = "sticker"
        product_name = "Sticker Pack"
        price_cents = 500

        [[variants]]
        id = "old-cap"
        product_name = "Archive Cap"
        price_cents = 1500
        in_stock = 9
        active = false
    "#;

    #[test]
    fn test_from_toml() {
        let catalog = StaticCatalog::from_toml(SAMPLE, Currency::USD).unwrap();
        assert_eq!(catalog.len(), 3);

        let tee = catalog.get("tee-m").unwrap();
        assert_eq!(tee.product_id, "tee");
        assert_eq!(tee.price.amount, 2800);
        assert_eq!(tee.price.currency, Currency::USD);
        assert_eq!(tee.stock, 4);

        let sticker = catalog.get("sticker").unwrap();
        assert_eq!(sticker.product_id, "sticker");
        assert_eq!(sticker.stock, 0);
    }

    #[test]
    fn test_file_currency_must_match_shop() {
        let toml = r#"
            currency = "EUR"
            [[variants]]
            id = "x"
            product_name = "X"
            price_cents = 100
        "#;
        let err = StaticCatalog::from_toml(toml, Currency::USD).unwrap_err();
        assert!(matches!(err, ShopError::Catalog(_)));
        assert!(err.to_string().contains("EUR"));

        let catalog = StaticCatalog::from_toml(toml, Currency::EUR).unwrap();
        assert_eq!(catalog.get("x").unwrap().price.currency, Currency::EUR);
    }

    #[test]
    fn test_negative_price_rejected() {
        let toml = r#"
            [[variants]]
            id = "bad"
            product_name = "Bad"
            price_cents = -5
        "#;
        let err = StaticCatalog::from_toml(toml, Currency::USD).unwrap_err();
        assert!(matches!(err, ShopError::InvalidPrice { .. }));
    }

    #[tokio::test]
    async fn test_list_hides_inactive_and_sorts() {
        let catalog = StaticCatalog::from_toml(SAMPLE, Currency::USD).unwrap();
        let listed = catalog.list_variants().await.unwrap();

        let ids: Vec<_> = listed.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["tee-m", "sticker"]);
    }

    #[tokio::test]
    async fn test_lookup_skips_missing_ids() {
        let catalog = StaticCatalog::from_toml(SAMPLE, Currency::USD).unwrap();
        let found = catalog
            .lookup(&["tee-m".to_string(), "nope".to_string(), "old-cap".to_string()])
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert!(found.contains_key("tee-m"));
        assert!(found.contains_key("old-cap"));
        assert!(!found.contains_key("nope"));
    }
}
