//! # Request Handlers
//!
//! Axum request handlers for the catalog and checkout API.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use shop_core::{CheckoutRequest, ProductListing, ProviderStatus, ShopError};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create payment link response
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutResponse {
    /// Hosted checkout URL (redirect user here)
    pub url: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>, code: u16) -> Self {
        Self {
            detail: detail.into(),
            code,
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn shop_error_to_response(err: ShopError) -> ApiError {
    let code = err.status_code();
    if err.is_client_error() {
        warn!("Rejected request: {}", err);
    } else {
        error!("Request failed: {}", err);
    }
    let response = ErrorResponse::new(err.public_detail(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Route index
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "routes": [
            "/health",
            "/products",
            "/create-payment-link",
            "/create-checkout-session",
            "/config-check"
        ]
    }))
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Which provider credentials are present
pub async fn config_check(State(state): State<AppState>) -> Json<ProviderStatus> {
    Json(state.strategy.status())
}

/// Active variants as product cards
#[instrument(skip(state), fields(source = state.catalog_source()))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductListing>>, ApiError> {
    let variants = state
        .catalog
        .list_variants()
        .await
        .map_err(shop_error_to_response)?;

    Ok(Json(variants.iter().map(ProductListing::from).collect()))
}

/// Validate the cart and create a hosted checkout link
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn create_payment_link(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let link = state
        .checkout
        .create_link(&request)
        .await
        .map_err(shop_error_to_response)?;

    info!("Checkout link ready: provider={}, id={}", link.provider, link.link_id);

    Ok(Json(CheckoutResponse { url: link.url }))
}
