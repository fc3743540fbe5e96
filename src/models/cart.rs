use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Product, ProductId};

/// Ordered list of products a shopper intends to buy
///
/// Product ids are unique within a cart and items keep their insertion
/// order. Serialises as a plain JSON array of items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

/// A product in the cart together with the requested amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

/// Totals for displaying the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub distinct_products: usize,
    pub total_units: u64,
    pub total_price: Decimal,
}

/// One row of a cart summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub title: String,
    pub amount: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl Cart {
    /// Create a new empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from persisted items
    ///
    /// Items with a zero amount and later duplicates of an id are dropped.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.amount > 0 && !cart.contains_item(item.id()) {
                cart.items.push(item);
            }
        }
        cart
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Append a product with the given amount
    ///
    /// Returns false without touching the cart if the product is already present.
    pub fn push_item(&mut self, product: Product, amount: u32) -> bool {
        if self.contains_item(product.id) {
            return false;
        }
        self.items.push(CartItem::new(product, amount));
        true
    }

    /// Replace the amount of an item in place, keeping its position
    pub fn set_amount(&mut self, product_id: ProductId, amount: u32) -> bool {
        match self.items.iter_mut().find(|item| item.id() == product_id) {
            Some(item) => {
                item.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Remove an item from the cart
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let original_len = self.items.len();
        self.items.retain(|item| item.id() != product_id);
        self.items.len() != original_len
    }

    /// Get a specific item from the cart
    pub fn get_item(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == product_id)
    }

    /// Check if a specific product is in the cart
    pub fn contains_item(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.id() == product_id)
    }

    /// Get the amount of a specific product in the cart, 0 when absent
    pub fn get_item_amount(&self, product_id: ProductId) -> u32 {
        self.get_item(product_id).map(|item| item.amount).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the total number of units in the cart
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Get the total price of all items in the cart
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    pub fn summary(&self) -> CartSummary {
        let lines = self
            .items
            .iter()
            .map(|item| CartLine {
                product_id: item.id(),
                title: item.product.title.clone(),
                amount: item.amount,
                unit_price: item.product.price,
                subtotal: item.subtotal(),
            })
            .collect();

        CartSummary {
            lines,
            distinct_products: self.len(),
            total_units: self.total_units(),
            total_price: self.total_price(),
        }
    }
}

impl CartItem {
    /// Create a new cart item
    ///
    /// A stray `amount` key in the product metadata is discarded so the
    /// serialised item carries a single amount.
    pub fn new(mut product: Product, amount: u32) -> Self {
        product.metadata.remove("amount");
        Self { product, amount }
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// Get the total price for this item (price * amount)
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.amount)
    }
}
