//! The order entity.

use chrono::{DateTime, Utc};
use common::{ItemId, OrderId};
use serde::{Deserialize, Serialize};

use crate::error::OrderError;

use super::{Money, OrderItem, OrderStatus};

/// Longest note kept on an order, in characters. Longer notes are truncated.
pub const MAX_NOTE_LENGTH: usize = 1024;

/// A restaurant order.
///
/// The identifier, order number and creation time are fixed at
/// construction. Everything else is mutated through the
/// [`OrderStore`](crate::OrderStore) while the order is active.
///
/// Deserialization trusts its input: it skips validation and note
/// truncation, so it is only meant for reading back archived orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    order_number: u32,
    table_id: i32,
    total_price: Money,
    status: OrderStatus,
    items: Vec<OrderItem>,
    created_at: DateTime<Utc>,
    note: String,
}

impl Order {
    /// Creates an empty `Placed` order with a fresh identifier.
    pub fn new(order_number: u32) -> Self {
        Self {
            id: OrderId::new(),
            order_number,
            table_id: 0,
            total_price: Money::zero(),
            status: OrderStatus::Placed,
            items: Vec::new(),
            created_at: Utc::now(),
            note: String::new(),
        }
    }

    /// Replaces the generated identifier.
    pub fn with_id(mut self, id: impl Into<OrderId>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the table.
    pub fn with_table_id(mut self, table_id: i32) -> Self {
        self.table_id = table_id;
        self
    }

    /// Sets the total price.
    pub fn with_total_price(mut self, total_price: Money) -> Self {
        self.total_price = total_price;
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the note, truncated to [`MAX_NOTE_LENGTH`] characters.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.set_note(note);
        self
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Display number, not unique: the sequence wraps around.
    pub fn order_number(&self) -> u32 {
        self.order_number
    }

    pub fn table_id(&self) -> i32 {
        self.table_id
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// Returns an item by ID.
    pub fn get_item(&self, item_id: &ItemId) -> Option<&OrderItem> {
        self.items.iter().find(|item| &item.id == item_id)
    }

    /// Returns true if an item with this ID is on the order.
    pub fn has_item(&self, item_id: &ItemId) -> bool {
        self.get_item(item_id).is_some()
    }

    /// Sum of the amounts of every item.
    pub fn item_amount_total(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.amount)).sum()
    }

    /// Checks the order-level invariants, returning every rule it breaks.
    pub fn validate(&self) -> Vec<OrderError> {
        validate_details(self.table_id, self.total_price)
    }
}

// Mutation methods, reached through the store.
impl Order {
    pub(crate) fn set_table_id(&mut self, table_id: i32) {
        self.table_id = table_id;
    }

    pub(crate) fn set_total_price(&mut self, total_price: Money) {
        self.total_price = total_price;
    }

    pub(crate) fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }

    /// Sets the note, truncated to [`MAX_NOTE_LENGTH`] characters.
    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = truncate_note(note.into());
    }

    pub(crate) fn push_item(&mut self, item: OrderItem) {
        self.items.push(item);
    }

    pub(crate) fn remove_item(&mut self, item_id: &ItemId) -> Option<OrderItem> {
        let index = self.items.iter().position(|item| &item.id == item_id)?;
        Some(self.items.remove(index))
    }
}

/// Validates the numeric order fields shared by creation and updates.
pub(crate) fn validate_details(table_id: i32, total_price: Money) -> Vec<OrderError> {
    let mut errors = Vec::new();

    if table_id < 0 {
        errors.push(OrderError::NegativeTableId { table_id });
    }

    if total_price.is_negative() {
        errors.push(OrderError::NegativeTotalPrice { price: total_price });
    }

    errors
}

fn truncate_note(note: String) -> String {
    match note.char_indices().nth(MAX_NOTE_LENGTH) {
        Some((byte_index, _)) => note[..byte_index].to_string(),
        None => note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_defaults() {
        let order = Order::new(7);
        assert_eq!(order.order_number(), 7);
        assert_eq!(order.table_id(), 0);
        assert_eq!(order.total_price(), Money::zero());
        assert_eq!(order.status(), OrderStatus::Placed);
        assert!(order.items().is_empty());
        assert!(order.note().is_empty());
    }

    #[test]
    fn test_new_orders_have_distinct_ids() {
        assert_ne!(Order::new(1).id(), Order::new(1).id());
    }

    #[test]
    fn test_long_note_is_truncated() {
        let order = Order::new(1).with_note("x".repeat(MAX_NOTE_LENGTH + 50));
        assert_eq!(order.note().chars().count(), MAX_NOTE_LENGTH);
    }

    #[test]
    fn test_note_truncation_counts_characters() {
        let note = "é".repeat(MAX_NOTE_LENGTH + 1);
        let order = Order::new(1).with_note(note);
        assert_eq!(order.note().chars().count(), MAX_NOTE_LENGTH);
        assert!(order.note().chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_short_note_is_kept() {
        let order = Order::new(1).with_note("no onions");
        assert_eq!(order.note(), "no onions");
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let order = Order::new(1)
            .with_table_id(-3)
            .with_total_price(Money::from_cents(-1));
        assert_eq!(order.validate().len(), 2);
    }

    #[test]
    fn test_item_helpers() {
        let mut order = Order::new(1);
        order.push_item(OrderItem::new("1", "Soup", 2));
        order.push_item(OrderItem::new("2", "Bread", 3));

        assert_eq!(order.item_amount_total(), 5);
        assert!(order.has_item(&ItemId::new("2")));

        let removed = order.remove_item(&ItemId::new("1")).unwrap();
        assert_eq!(removed.name, "Soup");
        assert!(order.remove_item(&ItemId::new("1")).is_none());
        assert_eq!(order.items().len(), 1);
    }

    #[test]
    fn test_serialization_roundtrip_preserves_fields() {
        let order = Order::new(3).with_id("abc").with_table_id(4);
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["status"], "PLACED");

        let parsed: Order = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, order);
    }
}
