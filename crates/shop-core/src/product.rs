//! # Product Types
//!
//! Catalog types for street-shop. A `Variant` is the purchasable unit
//! (a product in a given size/colour); the public product list is a flat
//! list of variants rendered as `ProductListing` cards.

use crate::error::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
        }
    }

    /// Returns the number of decimal places for this currency
    /// (JPY has 0 decimals, most others have 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }
}

impl FromStr for Currency {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            "CAD" => Ok(Currency::CAD),
            "AUD" => Ok(Currency::AUD),
            other => Err(ShopError::Configuration(format!(
                "Unsupported currency: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price with amount in the smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (cents for USD), never negative
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a price from smallest unit (cents), rejecting negative amounts
    pub fn from_cents(amount: i64, currency: Currency) -> ShopResult<Self> {
        if amount < 0 {
            return Err(ShopError::InvalidPrice {
                message: format!("{} is negative", amount),
            });
        }
        Ok(Self { amount, currency })
    }

    /// Multiply by a quantity, saturating instead of overflowing
    pub fn times(&self, quantity: u32) -> Price {
        Price {
            amount: self.amount.saturating_mul(i64::from(quantity)),
            currency: self.currency,
        }
    }

    /// Format for display (e.g., "$10.00")
    pub fn display(&self) -> String {
        let symbol = match self.currency {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
            Currency::AUD => "A$",
        };
        match self.currency.decimal_places() {
            0 => format!("{}{}", symbol, self.amount),
            _ => format!("{}{}.{:02}", symbol, self.amount / 100, self.amount % 100),
        }
    }
}

/// A purchasable catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    /// Variant id; this is the id carts refer to
    pub id: String,

    /// Parent product id
    pub product_id: String,

    /// Parent product name
    pub product_name: String,

    /// Variant label (size, colour, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Product description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unit price
    pub price: Price,

    /// Optional image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Units in stock
    pub stock: i64,

    /// Whether this variant is offered for sale
    pub active: bool,
}

impl Variant {
    /// Create an active variant with no stock
    pub fn new(id: impl Into<String>, product_name: impl Into<String>, price: Price) -> Self {
        let id = id.into();
        Self {
            product_id: id.clone(),
            id,
            product_name: product_name.into(),
            label: None,
            description: None,
            price,
            image_url: None,
            stock: 0,
            active: true,
        }
    }

    /// Builder: set parent product id
    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = product_id.into();
        self
    }

    /// Builder: set label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Builder: set stock count
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    /// Builder: mark as not for sale
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Name shown to customers: product name plus label when present
    pub fn display_name(&self) -> String {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => format!("{} — {}", self.product_name, label),
            _ => self.product_name.clone(),
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Product card returned by `GET /products`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListing {
    /// Variant id
    pub id: String,
    pub name: String,
    /// Price in cents
    pub price: i64,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub in_stock: bool,
}

impl From<&Variant> for ProductListing {
    fn from(variant: &Variant) -> Self {
        Self {
            id: variant.id.clone(),
            name: variant.display_name(),
            price: variant.price.amount,
            image_url: variant.image_url.clone(),
            description: variant.description.clone(),
            in_stock: variant.is_in_stock(),
        }
    }
}

/// Sort key used by every catalog backend: product name, then label with
/// unlabelled variants last.
pub fn listing_order(a: &Variant, b: &Variant) -> std::cmp::Ordering {
    a.product_name
        .cmp(&b.product_name)
        .then_with(|| match (&a.label, &b.label) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(cents: i64) -> Price {
        Price::from_cents(cents, Currency::USD).unwrap()
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(Price::from_cents(-1, Currency::USD).is_err());
        assert_eq!(usd(0).amount, 0);
    }

    #[test]
    fn test_price_display() {
        assert_eq!(usd(2999).display(), "$29.99");
        assert_eq!(usd(5).display(), "$0.05");

        let yen = Price::from_cents(1000, Currency::JPY).unwrap();
        assert_eq!(yen.display(), "¥1000");
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!(" EUR ".parse::<Currency>().unwrap(), Currency::EUR);
        assert!("BTC".parse::<Currency>().is_err());
    }

    #[test]
    fn test_display_name() {
        let plain = Variant::new("v1", "Momentum Tee", usd(2800));
        assert_eq!(plain.display_name(), "Momentum Tee");

        let labelled = plain.clone().with_label("Black / M");
        assert_eq!(labelled.display_name(), "Momentum Tee — Black / M");
    }

    #[test]
    fn test_listing_from_variant() {
        let variant = Variant::new("v1", "Momentum Tee", usd(2800))
            .with_label("M")
            .with_image("https://cdn.example.com/tee.png")
            .with_stock(3);

        let listing = ProductListing::from(&variant);
        assert_eq!(listing.id, "v1");
        assert_eq!(listing.name, "Momentum Tee — M");
        assert_eq!(listing.price, 2800);
        assert!(listing.in_stock);

        let sold_out = ProductListing::from(&variant.with_stock(0));
        assert!(!sold_out.in_stock);
    }

    #[test]
    fn test_listing_order_puts_unlabelled_last() {
        let mut variants = vec![
            Variant::new("c", "Cap", usd(1500)),
            Variant::new("b", "Beanie", usd(1200)),
            Variant::new("a", "Cap", usd(1500)).with_label("Red"),
        ];
        variants.sort_by(listing_order);

        let ids: Vec<_> = variants.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
