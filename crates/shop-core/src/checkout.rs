//! # Checkout Orchestration
//!
//! Validates a cart against the catalog and asks the payment provider for a
//! hosted checkout link. Checks run in a fixed order: provider credentials,
//! empty cart, then per item (in request order) unknown id, inactive
//! variant, stock, quantity. The provider is only contacted once every item
//! has passed.

use crate::catalog::BoxedCatalogSource;
use crate::error::{ShopError, ShopResult};
use crate::order::{CheckoutLink, CheckoutRequest, Order};
use crate::product::Currency;
use crate::strategy::BoxedPaymentStrategy;
use tracing::{debug, info, instrument, warn};

/// Catalog-backed checkout against one payment provider
#[derive(Clone)]
pub struct CheckoutService {
    catalog: BoxedCatalogSource,
    strategy: BoxedPaymentStrategy,
    currency: Currency,
}

impl CheckoutService {
    pub fn new(catalog: BoxedCatalogSource, strategy: BoxedPaymentStrategy) -> Self {
        Self {
            catalog,
            strategy,
            currency: Currency::USD,
        }
    }

    /// Builder: currency of the orders this service builds
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Build a validated order from the request's items
    pub async fn build_order(&self, request: &CheckoutRequest) -> ShopResult<Order> {
        if request.items.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        let ids: Vec<String> = request.items.iter().map(|item| item.id.clone()).collect();
        let by_id = self.catalog.lookup(&ids).await?;

        let mut order = Order::new(self.currency);
        for item in &request.items {
            let variant = by_id.get(&item.id).ok_or_else(|| ShopError::UnknownVariant {
                id: item.id.clone(),
            })?;

            if !variant.active {
                return Err(ShopError::Unavailable {
                    name: variant.display_name(),
                });
            }
            if !variant.is_in_stock() {
                return Err(ShopError::OutOfStock {
                    name: variant.display_name(),
                });
            }
            if item.quantity == 0 {
                return Err(ShopError::InvalidQuantity {
                    id: item.id.clone(),
                });
            }

            order.add_variant(variant, item.quantity);
        }

        Ok(order)
    }

    /// Validate the cart and create a hosted checkout link.
    #[instrument(
        skip(self, request),
        fields(items = request.items.len(), provider = self.strategy.provider_name())
    )]
    pub async fn create_link(&self, request: &CheckoutRequest) -> ShopResult<CheckoutLink> {
        if !self.strategy.status().is_configured() {
            warn!("Checkout attempted without provider credentials");
            return Err(ShopError::Configuration(
                self.strategy.not_configured_message(),
            ));
        }

        let order = self.build_order(request).await?;

        info!(
            "Creating payment link: order={}, {} units, total={}",
            order.id,
            order.item_count(),
            order.total().display()
        );
        debug!("Idempotency key: {}", order.idempotency_key);

        let link = self
            .strategy
            .create_payment_link(&order, &request.success_url, &request.cancel_url)
            .await?;

        info!("Created payment link: id={}, order={}", link.link_id, order.id);
        Ok(link)
    }
}
