//! Order management core for the restaurant order service.
//!
//! This crate provides:
//! - Order and OrderItem entities with their invariants
//! - A uniform [`Response`] envelope with an explicit [`ErrorKind`]
//! - The in-memory [`OrderStore`] with validated queries and mutations
//! - The [`ArchiveSink`] collaborator and the finalize workflow in [`OrderService`]

pub mod archive;
pub mod config;
pub mod error;
pub mod order;
pub mod response;
pub mod store;

pub use archive::{ArchiveError, ArchiveSink, InMemoryArchive, NoopArchive};
pub use config::StoreConfig;
pub use error::{ErrorKind, OrderError};
pub use order::{
    DEFAULT_ARCHIVE_TIMEOUT, MAX_NOTE_LENGTH, Money, Order, OrderDetails, OrderItem,
    OrderNumberSequence, OrderPatch, OrderService, OrderStatus, PlaceOrder, UnknownStatus,
};
pub use response::Response;
pub use store::OrderStore;
