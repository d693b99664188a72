//! Error taxonomy for order operations.

use common::{ItemId, OrderId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::order::Money;

/// Classification of a failed operation.
///
/// Carried next to the message in every failure [`Response`](crate::Response)
/// so the request layer can pick a status without inspecting message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An input broke one of the entity invariants.
    Validation,
    /// A referenced order or item does not exist.
    NotFound,
    /// An identifier collided with an existing one.
    Conflict,
}

impl ErrorKind {
    /// Returns the kind as a static label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during order operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Table ID is negative.
    #[error("Table ID must be a non-negative integer (got {table_id})")]
    NegativeTableId { table_id: i32 },

    /// Total price is negative.
    #[error("Total price must not be negative (got {price})")]
    NegativeTotalPrice { price: Money },

    /// An order with the same ID is already active.
    #[error("Order {order_id} already exists")]
    DuplicateOrder { order_id: OrderId },

    /// Order not found in the active store.
    #[error("Order {order_id} not found")]
    OrderNotFound { order_id: OrderId },

    /// Item not found in the order.
    #[error("Item {item_id} not found in order {order_id}")]
    ItemNotFound { order_id: OrderId, item_id: ItemId },

    /// Item has no display name.
    #[error("Item {item_id} must have a name")]
    EmptyItemName { item_id: ItemId },

    /// Item amount below one.
    #[error("Item {item_id} amount must be at least 1 (got {amount})")]
    InvalidItemAmount { item_id: ItemId, amount: i32 },

    /// Item has an empty identifier.
    #[error("Item '{name}' must have a non-empty ID")]
    InvalidItemId { name: String },

    /// Item ID already present in the order.
    #[error("Item {item_id} already exists in the order and was skipped")]
    DuplicateItem { item_id: ItemId },

    /// Order is `Done` and waiting to be archived; it no longer accepts changes.
    #[error("Order {order_id} is being finalized")]
    OrderFinalizing { order_id: OrderId },

    /// Adding the items would exceed the per-order item cap.
    #[error("Order would hold {requested} items, more than the maximum of {limit}")]
    ItemLimitExceeded { requested: i64, limit: u32 },
}

impl OrderError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::OrderNotFound { .. } | OrderError::ItemNotFound { .. } => {
                ErrorKind::NotFound
            }
            OrderError::DuplicateOrder { .. }
            | OrderError::DuplicateItem { .. }
            | OrderError::OrderFinalizing { .. } => ErrorKind::Conflict,
            OrderError::NegativeTableId { .. }
            | OrderError::NegativeTotalPrice { .. }
            | OrderError::EmptyItemName { .. }
            | OrderError::InvalidItemAmount { .. }
            | OrderError::InvalidItemId { .. }
            | OrderError::ItemLimitExceeded { .. } => ErrorKind::Validation,
        }
    }
}
