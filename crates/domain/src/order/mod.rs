//! Order entity and related types.

mod commands;
mod entity;
mod sequence;
mod service;
mod state;
mod value_objects;

pub use commands::{OrderDetails, OrderPatch, PlaceOrder};
pub use entity::{MAX_NOTE_LENGTH, Order};
pub use sequence::OrderNumberSequence;
pub use service::{DEFAULT_ARCHIVE_TIMEOUT, OrderService};
pub use state::{OrderStatus, UnknownStatus};
pub use value_objects::{Money, OrderItem};
