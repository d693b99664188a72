//! Order commands.

use super::entity::validate_details;
use super::{Money, Order, OrderItem, OrderStatus};
use crate::error::OrderError;

/// Command to place a new order.
#[derive(Debug, Clone, Default)]
pub struct PlaceOrder {
    /// The table the order is for.
    pub table_id: i32,

    /// Total price of the order.
    pub total_price: Money,

    /// Free-text note for the kitchen.
    pub note: String,

    /// Items the order starts with.
    pub items: Vec<OrderItem>,
}

impl PlaceOrder {
    /// Creates a new PlaceOrder command.
    pub fn new(table_id: i32, total_price: Money) -> Self {
        Self {
            table_id,
            total_price,
            note: String::new(),
            items: Vec::new(),
        }
    }

    /// Attaches a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Starts the order with `items`.
    pub fn with_items(mut self, items: Vec<OrderItem>) -> Self {
        self.items = items;
        self
    }
}

/// Replacement values for the editable order details.
///
/// Items are never touched by a details update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub table_id: i32,
    pub total_price: Money,
    pub status: OrderStatus,
}

impl OrderDetails {
    /// Creates a new set of order details.
    pub fn new(table_id: i32, total_price: Money, status: OrderStatus) -> Self {
        Self {
            table_id,
            total_price,
            status,
        }
    }
}

impl From<&Order> for OrderDetails {
    fn from(order: &Order) -> Self {
        Self {
            table_id: order.table_id(),
            total_price: order.total_price(),
            status: order.status(),
        }
    }
}

/// Partial update of an order; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderPatch {
    pub table_id: Option<i32>,
    pub total_price: Option<Money>,
    pub status: Option<OrderStatus>,
    pub note: Option<String>,
}

impl OrderPatch {
    pub fn table_id(table_id: i32) -> Self {
        Self {
            table_id: Some(table_id),
            ..Self::default()
        }
    }

    pub fn total_price(total_price: Money) -> Self {
        Self {
            total_price: Some(total_price),
            ..Self::default()
        }
    }

    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn note(note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Self::default()
        }
    }

    /// Checks the supplied fields, returning every rule they break.
    pub fn validate(&self) -> Vec<OrderError> {
        validate_details(
            self.table_id.unwrap_or(0),
            self.total_price.unwrap_or_default(),
        )
    }

    pub(crate) fn apply(self, order: &mut Order) {
        if let Some(table_id) = self.table_id {
            order.set_table_id(table_id);
        }
        if let Some(total_price) = self.total_price {
            order.set_total_price(total_price);
        }
        if let Some(status) = self.status {
            order.set_status(status);
        }
        if let Some(note) = self.note {
            order.set_note(note);
        }
    }
}

impl From<OrderDetails> for OrderPatch {
    fn from(details: OrderDetails) -> Self {
        Self {
            table_id: Some(details.table_id),
            total_price: Some(details.total_price),
            status: Some(details.status),
            note: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch_is_valid() {
        assert!(OrderPatch::default().validate().is_empty());
    }

    #[test]
    fn test_patch_validates_supplied_fields() {
        assert_eq!(OrderPatch::table_id(-1).validate().len(), 1);
        assert_eq!(
            OrderPatch::total_price(Money::from_cents(-5)).validate().len(),
            1
        );
    }

    #[test]
    fn test_details_patch_leaves_items_and_note() {
        let mut order = Order::new(1).with_note("window seat");
        let details = OrderDetails::new(12, Money::from_cents(4500), OrderStatus::Ready);

        OrderPatch::from(details.clone()).apply(&mut order);

        assert_eq!(OrderDetails::from(&order), details);
        assert_eq!(order.note(), "window seat");
    }
}
