//! # Payment Strategy Trait
//!
//! Strategy trait for hosted-checkout payment providers.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentStrategy (trait)                  │
//! │  ├── create_payment_link()                                  │
//! │  ├── status()                                               │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                  ┌─────────┴─────────┐
//!          ┌───────┴───────┐   ┌───────┴───────┐
//!          │ SquarePayment │   │  test doubles │
//!          │     Links     │   │               │
//!          └───────────────┘   └───────────────┘
//! ```

use crate::error::ShopResult;
use crate::order::{CheckoutLink, Order};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Which credentials a provider has been given, as reported by `/config-check`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    /// Provider name (e.g., "square")
    pub provider: String,
    /// Provider environment (e.g., "sandbox", "production")
    pub environment: String,
    pub has_token: bool,
    pub has_location: bool,
}

impl ProviderStatus {
    /// True when every credential needed to create links is present
    pub fn is_configured(&self) -> bool {
        self.has_token && self.has_location
    }
}

/// Core trait for payment provider implementations.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Create a hosted checkout link for `order`.
    ///
    /// # Arguments
    /// * `order` - The validated order, carrying a fresh idempotency key
    /// * `success_url` - URL to redirect after successful payment
    /// * `cancel_url` - URL to return to if the customer abandons checkout
    async fn create_payment_link(
        &self,
        order: &Order,
        success_url: &str,
        cancel_url: &str,
    ) -> ShopResult<CheckoutLink>;

    /// Report which credentials are present.
    fn status(&self) -> ProviderStatus;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;

    /// Message used when the provider lacks credentials
    fn not_configured_message(&self) -> String {
        format!("{} is not configured", capitalize(self.provider_name()))
    }
}

/// Type alias for a boxed payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
