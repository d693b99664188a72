//! Order status.

use serde::{Deserialize, Serialize};

/// The status of an order on its way through the kitchen.
///
/// Intended forward path:
/// ```text
/// Placed ──► Processing ──► Ready ──► Done
/// ```
/// The store does not enforce the ordering; `Done` is only reached through
/// finalization, after which the order leaves the active store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order has been taken, nothing started yet.
    #[default]
    Placed,

    /// Kitchen is working on the order.
    Processing,

    /// Order is ready to be served.
    Ready,

    /// Order is finished (terminal).
    Done,
}

/// Error returned when a string or code names no status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No such order status: {0}")]
pub struct UnknownStatus(pub String);

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Placed,
        OrderStatus::Processing,
        OrderStatus::Ready,
        OrderStatus::Done,
    ];

    /// Returns true if this is the terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Done)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Ready => "READY",
            OrderStatus::Done => "DONE",
        }
    }

    /// Returns the numeric status code.
    pub fn code(&self) -> i32 {
        match self {
            OrderStatus::Placed => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Ready => 2,
            OrderStatus::Done => 3,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<i32> for OrderStatus {
    type Error = UnknownStatus;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or_else(|| UnknownStatus(code.to_string()))
    }
}
