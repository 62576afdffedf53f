//! # Square Payment Links
//!
//! Implementation of the Square Online Checkout payment-links API.
//! Each checkout creates a Square order plus a hosted payment page and
//! returns the page URL.

use crate::config::SquareConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shop_core::{CheckoutLink, Order, PaymentStrategy, ProviderStatus, ShopError, ShopResult};
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "Square";

/// Square payment-link strategy
///
/// Uses Square's hosted checkout page, so card data never touches this
/// service.
pub struct SquarePaymentLinks {
    config: SquareConfig,
    client: Client,
}

impl SquarePaymentLinks {
    /// Create a new Square strategy
    pub fn new(config: SquareConfig) -> ShopResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ShopError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> ShopResult<Self> {
        let config = SquareConfig::from_env()?;
        Self::new(config)
    }

    /// Build the JSON body for `POST /v2/online-checkout/payment-links`
    fn build_request<'a>(
        &'a self,
        order: &'a Order,
        location_id: &'a str,
        redirect_url: &'a str,
    ) -> CreatePaymentLinkRequest<'a> {
        let line_items = order
            .line_items
            .iter()
            .map(|item| SquareLineItem {
                name: &item.name,
                quantity: item.quantity.to_string(),
                base_price_money: SquareMoney {
                    amount: item.unit_price.amount,
                    currency: item.unit_price.currency.as_str(),
                },
            })
            .collect();

        CreatePaymentLinkRequest {
            idempotency_key: &order.idempotency_key,
            order: SquareOrder {
                location_id,
                reference_id: &order.id,
                line_items,
            },
            checkout_options: SquareCheckoutOptions {
                redirect_url,
                ask_for_shipping_address: self.config.ask_for_shipping_address,
            },
        }
    }
}

#[async_trait]
impl PaymentStrategy for SquarePaymentLinks {
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    async fn create_payment_link(
        &self,
        order: &Order,
        success_url: &str,
        cancel_url: &str,
    ) -> ShopResult<CheckoutLink> {
        let (Some(auth), Some(location_id)) =
            (self.config.auth_header(), self.config.location_id.as_deref())
        else {
            return Err(ShopError::Configuration(self.not_configured_message()));
        };

        if order.is_empty() {
            return Err(ShopError::EmptyCart);
        }

        let body = self.build_request(order, location_id, success_url);

        debug!(
            "Creating Square payment link: {} line items, cancel_url={} (unused by Square)",
            body.order.line_items.len(),
            cancel_url
        );

        let url = format!(
            "{}/v2/online-checkout/payment-links",
            self.config.api_base_url
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", auth)
            .header("Square-Version", &self.config.api_version)
            .json(&body)
            .send()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Square API error: status={}, body={}", status, text);
            return Err(ShopError::Provider {
                provider: PROVIDER.to_string(),
                message: first_error_detail(&text)
                    .unwrap_or_else(|| format!("HTTP {}", status)),
            });
        }

        let parsed: CreatePaymentLinkResponse = serde_json::from_str(&text).map_err(|e| {
            ShopError::Serialization(format!("Failed to parse Square response: {}", e))
        })?;

        // Square can answer 200 with an errors array and no link
        let Some(link) = parsed.payment_link else {
            let message = parsed
                .errors
                .first()
                .map(SquareError::describe)
                .unwrap_or_else(|| "response contained no payment link".to_string());
            return Err(ShopError::Provider {
                provider: PROVIDER.to_string(),
                message,
            });
        };

        info!("Created Square payment link: id={}, url={}", link.id, link.url);

        Ok(CheckoutLink {
            link_id: link.id,
            provider_order_id: link.order_id,
            order_id: order.id.clone(),
            provider: "square".to_string(),
            url: link.url,
            created_at: link
                .created_at
                .as_deref()
                .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
                .map(|ts| ts.with_timezone(&Utc))
                .unwrap_or_else(Utc::now),
        })
    }

    fn status(&self) -> ProviderStatus {
        ProviderStatus {
            provider: "square".to_string(),
            environment: self.config.environment.as_str().to_string(),
            has_token: self.config.has_token(),
            has_location: self.config.has_location(),
        }
    }

    fn provider_name(&self) -> &'static str {
        "square"
    }
}

/// First error's detail (or code) from a Square error body
fn first_error_detail(body: &str) -> Option<String> {
    let parsed: SquareErrorResponse = serde_json::from_str(body).ok()?;
    parsed.errors.first().map(SquareError::describe)
}

// =============================================================================
// Square API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreatePaymentLinkRequest<'a> {
    idempotency_key: &'a str,
    order: SquareOrder<'a>,
    checkout_options: SquareCheckoutOptions<'a>,
}

#[derive(Debug, Serialize)]
struct SquareOrder<'a> {
    location_id: &'a str,
    reference_id: &'a str,
    line_items: Vec<SquareLineItem<'a>>,
}

#[derive(Debug, Serialize)]
struct SquareLineItem<'a> {
    name: &'a str,
    /// Square expects quantities as decimal strings
    quantity: String,
    base_price_money: SquareMoney<'a>,
}

#[derive(Debug, Serialize)]
struct SquareMoney<'a> {
    amount: i64,
    currency: &'a str,
}

#[derive(Debug, Serialize)]
struct SquareCheckoutOptions<'a> {
    redirect_url: &'a str,
    ask_for_shipping_address: bool,
}

#[derive(Debug, Deserialize)]
struct CreatePaymentLinkResponse {
    #[serde(default)]
    payment_link: Option<SquarePaymentLink>,
    #[serde(default)]
    errors: Vec<SquareError>,
}

#[derive(Debug, Deserialize)]
struct SquarePaymentLink {
    id: String,
    url: String,
    #[serde(default)]
    order_id: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SquareErrorResponse {
    #[serde(default)]
    errors: Vec<SquareError>,
}

#[derive(Debug, Deserialize)]
struct SquareError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl SquareError {
    fn describe(&self) -> String {
        self.detail
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SquareEnvironment;
    use serde_json::json;
    use shop_core::{Currency, Price, Variant};
    use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn order_with(quantity: u32) -> Order {
        let variant = Variant::new(
            "tee-m",
            "Momentum Tee",
            Price::from_cents(2800, Currency::USD).unwrap(),
        )
        .with_label("M")
        .with_stock(5);

        let mut order = Order::new(Currency::USD);
        order.add_variant(&variant, quantity);
        order
    }

    fn strategy(base_url: &str) -> SquarePaymentLinks {
        let config = SquareConfig::new("EAAA-test", "L-TEST", SquareEnvironment::Sandbox)
            .with_api_base_url(base_url);
        SquarePaymentLinks::new(config).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let strategy = strategy("http://unused");
        let order = order_with(2);
        let body = strategy.build_request(&order, "L-TEST", "https://shop.example/thanks");
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["idempotency_key"], json!(order.idempotency_key));
        assert_eq!(value["order"]["location_id"], json!("L-TEST"));
        assert_eq!(
            value["order"]["line_items"][0],
            json!({
                "name": "Momentum Tee — M",
                "quantity": "2",
                "base_price_money": {"amount": 2800, "currency": "USD"}
            })
        );
        assert_eq!(
            value["checkout_options"],
            json!({"redirect_url": "https://shop.example/thanks", "ask_for_shipping_address": true})
        );
    }

    #[test]
    fn test_first_error_detail() {
        let body = r#"{"errors":[{"category":"INVALID_REQUEST_ERROR","code":"NOT_FOUND","detail":"Location not found"},{"code":"OTHER"}]}"#;
        assert_eq!(first_error_detail(body).as_deref(), Some("Location not found"));

        let code_only = r#"{"errors":[{"code":"UNAUTHORIZED"}]}"#;
        assert_eq!(first_error_detail(code_only).as_deref(), Some("UNAUTHORIZED"));

        assert!(first_error_detail("<html>bad gateway</html>").is_none());
    }

    #[tokio::test]
    async fn test_create_payment_link_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/online-checkout/payment-links"))
            .and(header("Authorization", "Bearer EAAA-test"))
            .and(header_exists("Square-Version"))
            .and(body_partial_json(json!({
                "order": {
                    "location_id": "L-TEST",
                    "line_items": [{
                        "quantity": "2",
                        "base_price_money": {"amount": 2800, "currency": "USD"}
                    }]
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payment_link": {
                    "id": "PL123",
                    "version": 1,
                    "order_id": "ORD456",
                    "url": "https://square.link/u/abc",
                    "created_at": "2026-10-19T12:00:00Z"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let link = strategy(&server.uri())
            .create_payment_link(
                &order_with(2),
                "https://shop.example/thanks",
                "https://shop.example/cart",
            )
            .await
            .unwrap();

        assert_eq!(link.url, "https://square.link/u/abc");
        assert_eq!(link.link_id, "PL123");
        assert_eq!(link.provider_order_id.as_deref(), Some("ORD456"));
        assert_eq!(link.provider, "square");
    }

    #[tokio::test]
    async fn test_provider_error_carries_first_detail() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/online-checkout/payment-links"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errors": [{
                    "category": "INVALID_REQUEST_ERROR",
                    "code": "INVALID_VALUE",
                    "detail": "Invalid location id"
                }]
            })))
            .mount(&server)
            .await;

        let err = strategy(&server.uri())
            .create_payment_link(
                &order_with(1),
                "https://shop.example/thanks",
                "https://shop.example/cart",
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 502);
        assert_eq!(err.public_detail(), "Square error: Invalid location id");
    }

    #[tokio::test]
    async fn test_unparseable_success_is_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = strategy(&server.uri())
            .create_payment_link(
                &order_with(1),
                "https://shop.example/thanks",
                "https://shop.example/cart",
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ShopError::Serialization(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_unreachable_api_is_network_error() {
        // Bind then drop to get a local port with no listener
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let err = strategy(&format!("http://127.0.0.1:{}", port))
            .create_payment_link(&order_with(1), "https://a", "https://b")
            .await
            .unwrap_err();

        assert!(matches!(err, ShopError::Network(_)));
        assert_eq!(err.status_code(), 500);
        assert!(err
            .public_detail()
            .starts_with("Unhandled server error: NetworkError:"));
    }

    #[tokio::test]
    async fn test_slow_api_times_out_as_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let mut config = SquareConfig::new("EAAA-test", "L-TEST", SquareEnvironment::Sandbox)
            .with_api_base_url(server.uri());
        config.timeout = std::time::Duration::from_millis(50);

        let err = SquarePaymentLinks::new(config)
            .unwrap()
            .create_payment_link(&order_with(1), "https://a", "https://b")
            .await
            .unwrap_err();

        assert!(matches!(err, ShopError::Network(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let mut config = SquareConfig::new("EAAA-test", "L-TEST", SquareEnvironment::Sandbox);
        config.access_token = None;
        let strategy = SquarePaymentLinks::new(config).unwrap();

        let status = strategy.status();
        assert!(!status.has_token);
        assert!(status.has_location);

        let err = strategy
            .create_payment_link(&order_with(1), "https://a", "https://b")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Square is not configured");
    }
}
