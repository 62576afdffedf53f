//! # Shop Error Types
//!
//! Typed error handling for the street-shop service.
//! Every catalog and checkout operation returns `Result<T, ShopError>`.

use thiserror::Error;

/// Core error type for catalog and checkout operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Cart contained no items
    #[error("No items in cart")]
    EmptyCart,

    /// Requested variant id is not in the catalog
    #[error("Unknown variant id={id}")]
    UnknownVariant { id: String },

    /// Variant exists but is not offered for sale
    #[error("Product is not available: {name}")]
    Unavailable { name: String },

    /// Variant has no stock left
    #[error("Out of stock: {name}")]
    OutOfStock { name: String },

    /// Quantity must be at least one
    #[error("Invalid quantity for variant id={id}")]
    InvalidQuantity { id: String },

    /// Provider credentials or other configuration missing
    #[error("{0}")]
    Configuration(String),

    /// Payment provider rejected the request
    #[error("{provider} error: {message}")]
    Provider { provider: String, message: String },

    /// Transport failure talking to the provider
    #[error("Network error: {0}")]
    Network(String),

    /// Catalog storage failure
    #[error("Database error: {0}")]
    Database(String),

    /// Stored price violates the non-negative cents invariant
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Static catalog could not be read or parsed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::EmptyCart
            | ShopError::UnknownVariant { .. }
            | ShopError::Unavailable { .. }
            | ShopError::OutOfStock { .. }
            | ShopError::InvalidQuantity { .. } => 400,
            ShopError::Configuration(_) => 500,
            ShopError::Provider { .. } => 502,
            ShopError::Network(_)
            | ShopError::Database(_)
            | ShopError::InvalidPrice { .. }
            | ShopError::Catalog(_)
            | ShopError::Serialization(_)
            | ShopError::Internal(_) => 500,
        }
    }

    /// True for errors caused by the caller's cart
    pub fn is_client_error(&self) -> bool {
        self.status_code() == 400
    }

    /// Short name of the failure class, used in generic server error details
    pub fn kind(&self) -> &'static str {
        match self {
            ShopError::EmptyCart => "EmptyCart",
            ShopError::UnknownVariant { .. } => "UnknownVariant",
            ShopError::Unavailable { .. } => "Unavailable",
            ShopError::OutOfStock { .. } => "OutOfStock",
            ShopError::InvalidQuantity { .. } => "InvalidQuantity",
            ShopError::Configuration(_) => "ConfigurationError",
            ShopError::Provider { .. } => "ProviderError",
            ShopError::Network(_) => "NetworkError",
            ShopError::Database(_) => "DatabaseError",
            ShopError::InvalidPrice { .. } => "InvalidPrice",
            ShopError::Catalog(_) => "CatalogError",
            ShopError::Serialization(_) => "SerializationError",
            ShopError::Internal(_) => "InternalError",
        }
    }

    /// Message safe to return to API callers.
    ///
    /// Client, configuration and provider errors are reported as-is; anything
    /// else is wrapped as an unhandled server error carrying only its kind and
    /// message.
    pub fn public_detail(&self) -> String {
        match self {
            ShopError::Network(msg)
            | ShopError::Database(msg)
            | ShopError::Catalog(msg)
            | ShopError::Serialization(msg)
            | ShopError::Internal(msg) => {
                format!("Unhandled server error: {}: {}", self.kind(), msg)
            }
            ShopError::InvalidPrice { message } => {
                format!("Unhandled server error: {}: {}", self.kind(), message)
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for shop operations
pub type ShopResult<T> = Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ShopError::EmptyCart.status_code(), 400);
        assert_eq!(
            ShopError::UnknownVariant { id: "v1".into() }.status_code(),
            400
        );
        assert_eq!(
            ShopError::Configuration("Square is not configured".into()).status_code(),
            500
        );
        assert_eq!(
            ShopError::Provider {
                provider: "Square".into(),
                message: "bad location".into()
            }
            .status_code(),
            502
        );
        assert_eq!(ShopError::Network("timeout".into()).status_code(), 500);
    }

    #[test]
    fn test_client_messages_name_the_item() {
        let err = ShopError::UnknownVariant { id: "var_42".into() };
        assert_eq!(err.public_detail(), "Unknown variant id=var_42");
        assert!(err.is_client_error());

        let err = ShopError::OutOfStock { name: "Hoodie — XL".into() };
        assert_eq!(err.public_detail(), "Out of stock: Hoodie — XL");
    }

    #[test]
    fn test_provider_detail() {
        let err = ShopError::Provider {
            provider: "Square".into(),
            message: "Location not found".into(),
        };
        assert_eq!(err.public_detail(), "Square error: Location not found");
    }

    #[test]
    fn test_unexpected_errors_are_wrapped() {
        let err = ShopError::Network("connection reset".into());
        assert_eq!(
            err.public_detail(),
            "Unhandled server error: NetworkError: connection reset"
        );
        assert!(!err.is_client_error());
    }
}
