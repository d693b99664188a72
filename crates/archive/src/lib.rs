//! Durable archive for finalized orders.
//!
//! Provides [`PostgresArchive`], an [`ArchiveSink`](domain::ArchiveSink)
//! that writes each finished order to the `finished_orders` table.

pub mod error;
pub mod postgres;

pub use error::{ArchiveStoreError, Result};
pub use postgres::PostgresArchive;
