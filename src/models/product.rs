use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a catalog product
pub type ProductId = u64;

/// Product as returned by the storefront catalog
///
/// Fields the cart does not interpret are kept in `metadata` so that they
/// survive a trip through the persisted blob unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    /// Written as a JSON number; strings are accepted when reading
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// Available quantity of a product as reported by the stock service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    #[serde(rename = "id", alias = "productId")]
    pub product_id: ProductId,
    pub amount: u32,
}

impl Product {
    /// Create a product with no extra metadata
    pub fn new(id: ProductId, title: impl Into<String>, price: Decimal, image: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
            metadata: Map::new(),
        }
    }
}

impl StockRecord {
    pub fn new(product_id: ProductId, amount: u32) -> Self {
        Self { product_id, amount }
    }

    /// Whether the requested quantity can be served from this snapshot
    pub fn covers(&self, requested: u32) -> bool {
        self.amount >= requested
    }

    pub fn is_available(&self) -> bool {
        self.amount > 0
    }
}
