//! Archival of finished orders.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::order::Order;

/// Errors reported by an archival backend.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The backend rejected or failed the write.
    #[error("Archive backend error: {0}")]
    Backend(String),

    /// The order could not be encoded for storage.
    #[error("Archive serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Destination for orders once they are finalized.
///
/// Called once per finalized order, outside the store lock. Failures are
/// logged by the caller and never retried.
#[async_trait]
pub trait ArchiveSink: Send + Sync {
    /// Persists one finished order.
    async fn archive(&self, order: &Order) -> Result<(), ArchiveError>;
}

#[async_trait]
impl<T: ArchiveSink + ?Sized> ArchiveSink for Arc<T> {
    async fn archive(&self, order: &Order) -> Result<(), ArchiveError> {
        (**self).archive(order).await
    }
}

/// Sink used when no archival backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopArchive;

#[async_trait]
impl ArchiveSink for NoopArchive {
    async fn archive(&self, order: &Order) -> Result<(), ArchiveError> {
        tracing::trace!(order_id = %order.id(), "archival disabled, dropping order");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryArchiveState {
    orders: Vec<Order>,
    fail: bool,
    delay: Option<Duration>,
}

/// In-memory archive for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArchive {
    state: Arc<RwLock<InMemoryArchiveState>>,
}

impl InMemoryArchive {
    /// Creates a new in-memory archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the archive to fail every write.
    pub fn set_fail(&self, fail: bool) {
        self.state.write().unwrap().fail = fail;
    }

    /// Makes every write wait `delay` before completing.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.state.write().unwrap().delay = delay;
    }

    /// Returns the number of archived orders.
    pub fn archived_count(&self) -> usize {
        self.state.read().unwrap().orders.len()
    }

    /// Returns a copy of every archived order.
    pub fn archived(&self) -> Vec<Order> {
        self.state.read().unwrap().orders.clone()
    }
}

#[async_trait]
impl ArchiveSink for InMemoryArchive {
    async fn archive(&self, order: &Order) -> Result<(), ArchiveError> {
        let delay = self.state.read().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.write().unwrap();
        if state.fail {
            return Err(ArchiveError::Backend("archive unavailable".to_string()));
        }
        state.orders.push(order.clone());

        Ok(())
    }
}
