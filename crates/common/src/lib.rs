//! Shared types for the restaurant order service.

mod types;

pub use types::{ItemId, OrderId};
