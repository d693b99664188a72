//! Order service combining the store with archival.

use std::time::Duration;

use common::OrderId;

use crate::archive::ArchiveSink;
use crate::error::ErrorKind;
use crate::response::Response;
use crate::store::OrderStore;

use super::Order;

/// How long finalization waits for the archive before giving up.
pub const DEFAULT_ARCHIVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Service for managing orders.
///
/// Owns the active [`OrderStore`] and the sink finished orders are archived
/// to. Request handlers use [`store`](Self::store) for everyday operations
/// and [`finalize_order`](Self::finalize_order) to close an order.
pub struct OrderService<A: ArchiveSink> {
    store: OrderStore,
    archive: A,
    archive_timeout: Duration,
}

impl<A: ArchiveSink> OrderService<A> {
    /// Creates a new order service.
    pub fn new(store: OrderStore, archive: A) -> Self {
        Self {
            store,
            archive,
            archive_timeout: DEFAULT_ARCHIVE_TIMEOUT,
        }
    }

    /// Sets how long finalization waits for the archive.
    pub fn with_archive_timeout(mut self, timeout: Duration) -> Self {
        self.archive_timeout = timeout;
        self
    }

    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    pub fn archive(&self) -> &A {
        &self.archive
    }

    /// Finishes an order: marks it `Done`, archives it, removes it.
    ///
    /// Only the first of several concurrent calls for one order proceeds;
    /// the others get a conflict. Archival is best effort. A failed or timed-out write is logged and
    /// the order is removed from the active store anyway.
    #[tracing::instrument(skip(self))]
    pub async fn finalize_order(&self, order_id: &OrderId) -> Response<Order> {
        let marked = self.store.mark_done(order_id).await;
        let Some(order) = marked.data else {
            tracing::debug!(message = %marked.message, "order cannot be finalized");
            return Response::failure(
                marked.error_kind.unwrap_or(ErrorKind::NotFound),
                marked.message,
            );
        };

        match tokio::time::timeout(self.archive_timeout, self.archive.archive(&order)).await {
            Ok(Ok(())) => tracing::debug!("order archived"),
            Ok(Err(e)) => {
                metrics::counter!("orders_archive_failures_total").increment(1);
                tracing::warn!(error = %e, "failed to archive finished order");
            }
            Err(_) => {
                metrics::counter!("orders_archive_failures_total").increment(1);
                tracing::warn!(
                    timeout_ms = self.archive_timeout.as_millis() as u64,
                    "archiving finished order timed out"
                );
            }
        }

        self.store.delete_order(order_id).await;
        metrics::counter!("orders_finalized_total").increment(1);
        tracing::info!(order_number = order.order_number(), "order finalized");

        Response::ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{InMemoryArchive, NoopArchive};
    use crate::order::OrderStatus;

    async fn service_with_order(archive: InMemoryArchive) -> (OrderService<InMemoryArchive>, OrderId) {
        let service = OrderService::new(OrderStore::new(), archive);
        let order = Order::new(1).with_id("a");
        service.store().add_order(order).await;
        (service, OrderId::from("a"))
    }

    #[tokio::test]
    async fn test_finalize_archives_and_removes() {
        let (service, id) = service_with_order(InMemoryArchive::new()).await;

        let response = service.finalize_order(&id).await;

        assert!(response.successful);
        assert_eq!(response.data.unwrap().status(), OrderStatus::Done);
        assert!(service.store().is_empty().await);
        assert_eq!(service.archive().archived_count(), 1);
        assert_eq!(service.archive().archived()[0].status(), OrderStatus::Done);
    }

    #[tokio::test]
    async fn test_finalize_unknown_order() {
        let service = OrderService::new(OrderStore::new(), NoopArchive);

        let response = service.finalize_order(&OrderId::from("nope")).await;

        assert_eq!(response.kind(), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_failed_archive_still_removes_order() {
        let archive = InMemoryArchive::new();
        archive.set_fail(true);
        let (service, id) = service_with_order(archive).await;

        let response = service.finalize_order(&id).await;

        assert!(response.successful);
        assert!(service.store().is_empty().await);
        assert_eq!(service.archive().archived_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_archive_timeout_still_removes_order() {
        let archive = InMemoryArchive::new();
        archive.set_delay(Some(Duration::from_secs(60)));
        let (service, id) = service_with_order(archive).await;
        let service = service.with_archive_timeout(Duration::from_millis(100));

        let response = service.finalize_order(&id).await;

        assert!(response.successful);
        assert!(service.store().is_empty().await);
        assert_eq!(service.archive().archived_count(), 0);
    }

    #[tokio::test]
    async fn test_store_usable_while_archive_is_slow() {
        let archive = InMemoryArchive::new();
        archive.set_delay(Some(Duration::from_millis(200)));
        let (service, id) = service_with_order(archive).await;
        let service = std::sync::Arc::new(service);

        let finalizing = {
            let service = service.clone();
            let id = id.clone();
            tokio::spawn(async move { service.finalize_order(&id).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let read = tokio::time::timeout(Duration::from_millis(50), service.store().get_order(&id))
            .await
            .expect("store lock held during archival");
        assert_eq!(read.data.unwrap().status(), OrderStatus::Done);

        assert!(finalizing.await.unwrap().successful);
    }

    #[tokio::test]
    async fn test_concurrent_finalize_archives_once() {
        let archive = InMemoryArchive::new();
        archive.set_delay(Some(Duration::from_millis(100)));
        let (service, id) = service_with_order(archive).await;
        let service = std::sync::Arc::new(service);

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let service = service.clone();
                let id = id.clone();
                tokio::spawn(async move { service.finalize_order(&id).await })
            })
            .collect();

        let mut responses = Vec::new();
        for handle in handles {
            responses.push(handle.await.unwrap());
        }

        assert_eq!(responses.iter().filter(|r| r.successful).count(), 1);
        let rejected: Vec<_> = responses.iter().filter(|r| !r.successful).collect();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].kind(), Some(ErrorKind::Conflict));
        assert_eq!(service.archive().archived_count(), 1);
        assert!(service.store().is_empty().await);
    }

    #[tokio::test]
    async fn test_edits_during_archival_are_rejected() {
        let archive = InMemoryArchive::new();
        archive.set_delay(Some(Duration::from_millis(100)));
        let (service, id) = service_with_order(archive).await;
        let service = std::sync::Arc::new(service);

        let finalizing = {
            let service = service.clone();
            let id = id.clone();
            tokio::spawn(async move { service.finalize_order(&id).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let added = service
            .store()
            .add_items_to_order(&id, vec![crate::OrderItem::new("1", "Soup", 1)])
            .await;
        let patched = service
            .store()
            .patch_order(&id, crate::OrderPatch::status(OrderStatus::Placed))
            .await;

        assert_eq!(added.kind(), Some(ErrorKind::Conflict));
        assert_eq!(patched.kind(), Some(ErrorKind::Conflict));

        assert!(finalizing.await.unwrap().successful);
        let archived = service.archive().archived();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].status(), OrderStatus::Done);
        assert!(archived[0].items().is_empty());
    }
}
