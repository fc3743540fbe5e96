use std::fmt;
use tracing::warn;

use crate::models::CartError;

pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity is out of stock";
pub const ADD_PRODUCT_ERROR_MESSAGE: &str = "Could not add the product";
pub const REMOVE_PRODUCT_ERROR_MESSAGE: &str = "Could not remove the product";
pub const UPDATE_AMOUNT_ERROR_MESSAGE: &str = "Could not change the product quantity";

/// Fire-and-forget channel for user-facing messages
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Cart operations, used to pick notification text and label metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::AddProduct => "add_product",
            Operation::RemoveProduct => "remove_product",
            Operation::UpdateProductAmount => "update_product_amount",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text shown to the user when `operation` fails with `error`
///
/// Stock shortfalls share one message across operations; every other
/// failure is reported with the generic message of the operation.
pub fn user_message(operation: Operation, error: &CartError) -> &'static str {
    if let CartError::OutOfStock { .. } = error {
        return OUT_OF_STOCK_MESSAGE;
    }

    match operation {
        Operation::AddProduct => ADD_PRODUCT_ERROR_MESSAGE,
        Operation::RemoveProduct => REMOVE_PRODUCT_ERROR_MESSAGE,
        Operation::UpdateProductAmount => UPDATE_AMOUNT_ERROR_MESSAGE,
    }
}

/// Prints notifications to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        eprintln!("! {}", message);
    }
}

/// Emits notifications as warn-level log events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        warn!(notification = message, "User notification");
    }
}
