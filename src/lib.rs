pub mod config;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod services;

pub use config::{Config, ConfigError};
pub use models::{Cart, CartError, CartItem, CartResult, Product, ProductId, StockRecord};
pub use observability::{init_observability, Metrics};
pub use services::{CartStore, Notifier, CART_STORAGE_KEY};
