//! # Order Types
//!
//! Cart, order and checkout link types for street-shop.
//! None of these are persisted; they live for the duration of one request.

use crate::product::{Currency, Price, Variant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An item in a checkout request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Variant id
    pub id: String,
    /// Quantity
    pub quantity: u32,
}

impl CartItem {
    pub fn new(id: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }
}

/// Body of `POST /create-payment-link`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartItem>,
    /// Where the hosted page sends the customer after paying
    pub success_url: String,
    /// Where the customer lands if they abandon checkout
    pub cancel_url: String,
}

/// A line item in an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Variant ID
    pub variant_id: String,

    /// Display name (product name plus variant label)
    pub name: String,

    /// Unit price
    pub unit_price: Price,

    /// Quantity
    pub quantity: u32,
}

impl LineItem {
    /// Create a line item from a catalog variant
    pub fn from_variant(variant: &Variant, quantity: u32) -> Self {
        Self {
            variant_id: variant.id.clone(),
            name: variant.display_name(),
            unit_price: variant.price,
            quantity,
        }
    }

    /// Calculate the total price for this line item
    pub fn total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// An order to be checked out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID (generated)
    pub id: String,

    /// Line items
    pub line_items: Vec<LineItem>,

    /// Currency (same for all items)
    pub currency: Currency,

    /// Idempotency key, fresh for every checkout attempt
    pub idempotency_key: String,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order with generated ID and idempotency key
    pub fn new(currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            line_items: Vec::new(),
            currency,
            idempotency_key: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        }
    }

    /// Add a line item
    pub fn add_item(&mut self, item: LineItem) {
        self.line_items.push(item);
    }

    /// Add a variant with quantity
    pub fn add_variant(&mut self, variant: &Variant, quantity: u32) {
        self.add_item(LineItem::from_variant(variant, quantity));
    }

    /// Calculate order total
    pub fn total(&self) -> Price {
        let amount = self
            .line_items
            .iter()
            .fold(0_i64, |acc, item| acc.saturating_add(item.total().amount));
        Price {
            amount,
            currency: self.currency,
        }
    }

    /// Check if order is empty
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Total units across all line items
    pub fn item_count(&self) -> u64 {
        self.line_items
            .iter()
            .fold(0_u64, |acc, item| acc.saturating_add(u64::from(item.quantity)))
    }
}

/// A hosted checkout link created by a payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutLink {
    /// Provider's link ID
    pub link_id: String,

    /// Provider-side order ID, when the provider creates one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_order_id: Option<String>,

    /// Our internal order ID
    pub order_id: String,

    /// Provider name (e.g., "square")
    pub provider: String,

    /// URL to redirect customer to for payment
    pub url: String,

    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl CheckoutLink {
    pub fn new(
        link_id: impl Into<String>,
        order_id: impl Into<String>,
        provider: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            link_id: link_id.into(),
            provider_order_id: None,
            order_id: order_id.into(),
            provider: provider.into(),
            url: url.into(),
            created_at: Utc::now(),
        }
    }
}
