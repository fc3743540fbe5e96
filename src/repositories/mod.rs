// Repositories module - external collaborators of the cart store

pub mod catalog;
pub mod storage;

pub use catalog::{HttpStorefrontApi, ProductCatalog, StockService};
pub use storage::{FileStore, InMemoryStore, PersistedStore};
