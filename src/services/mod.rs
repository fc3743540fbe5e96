// Services module - cart state and user notifications

pub mod cart_store;
pub mod notifier;

pub use cart_store::{CartStore, CART_STORAGE_KEY};
pub use notifier::{
    user_message, ConsoleNotifier, Notifier, Operation, TracingNotifier, ADD_PRODUCT_ERROR_MESSAGE,
    OUT_OF_STOCK_MESSAGE, REMOVE_PRODUCT_ERROR_MESSAGE, UPDATE_AMOUNT_ERROR_MESSAGE,
};
