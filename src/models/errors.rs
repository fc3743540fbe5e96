use thiserror::Error;

use super::ProductId;

/// Failures of a cart operation
///
/// Every variant leaves the cart exactly as it was before the call.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Out of stock: product_id={product_id}, requested={requested}, available={available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("Product not in cart: {product_id}")]
    NotFound { product_id: ProductId },

    #[error("Lookup failed for product {product_id}: {source}")]
    LookupFailure {
        product_id: ProductId,
        #[source]
        source: LookupError,
    },

    #[error("Invalid request: product_id={product_id}, amount={amount}")]
    InvalidRequest { product_id: ProductId, amount: u32 },

    #[error("Storage error: {source}")]
    Storage {
        #[from]
        source: StorageError,
    },
}

/// Failures talking to the product catalog or the stock service
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Request failed: {message}")]
    Request { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unexpected status {status} from {resource}")]
    Status { resource: String, status: u16 },

    #[error("Invalid response body: {message}")]
    Decode { message: String },
}

/// Failures reading or writing the persisted key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl CartError {
    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            CartError::OutOfStock { .. } => "out_of_stock",
            CartError::NotFound { .. } => "not_found",
            CartError::LookupFailure { .. } => "lookup_failure",
            CartError::InvalidRequest { .. } => "invalid_request",
            CartError::Storage { .. } => "storage",
        }
    }

    pub(crate) fn lookup(product_id: ProductId, source: LookupError) -> Self {
        CartError::LookupFailure { product_id, source }
    }
}

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;

/// Result type alias for catalog and stock lookups
pub type LookupResult<T> = Result<T, LookupError>;

/// Result type alias for persisted store access
pub type StorageResult<T> = Result<T, StorageError>;
