//! Value objects for the order domain.

use common::ItemId;
use serde::{Deserialize, Serialize};

use crate::error::OrderError;

/// Money amount represented in cents to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = $10.00)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

/// A line on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Identifier, unique within the parent order.
    pub id: ItemId,

    /// Display name of the dish or drink.
    pub name: String,

    /// Quantity ordered.
    pub amount: i32,
}

impl OrderItem {
    /// Creates a new order item.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, amount: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount,
        }
    }

    /// Checks the item invariants, returning every rule it breaks.
    pub fn validate(&self) -> Vec<OrderError> {
        let mut errors = Vec::new();

        if !self.id.is_valid() {
            errors.push(OrderError::InvalidItemId {
                name: self.name.clone(),
            });
        }

        if self.name.trim().is_empty() {
            errors.push(OrderError::EmptyItemName {
                item_id: self.id.clone(),
            });
        }

        if self.amount < 1 {
            errors.push(OrderError::InvalidItemAmount {
                item_id: self.id.clone(),
                amount: self.amount,
            });
        }

        errors
    }
}
