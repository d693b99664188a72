//! In-memory store of active orders.

use std::collections::HashSet;
use std::sync::Arc;

use common::{ItemId, OrderId};
use tokio::sync::RwLock;

use crate::config::StoreConfig;
use crate::error::OrderError;
use crate::order::{
    Order, OrderDetails, OrderItem, OrderNumberSequence, OrderPatch, OrderStatus, PlaceOrder,
};
use crate::response::{Response, join_messages};

/// Active orders plus the IDs of those currently being finalized.
#[derive(Debug, Default)]
struct ActiveOrders {
    orders: Vec<Order>,
    finalizing: HashSet<OrderId>,
}

impl ActiveOrders {
    /// Finds an order that still accepts changes.
    fn editable<T>(&mut self, order_id: &OrderId) -> Result<&mut Order, Response<T>> {
        if self.finalizing.contains(order_id) {
            let rejection = Response::from_error(OrderError::OrderFinalizing {
                order_id: order_id.clone(),
            });
            record_rejection(&rejection);
            return Err(rejection);
        }

        self.orders
            .iter_mut()
            .find(|o| o.id() == order_id)
            .ok_or_else(|| not_found(order_id))
    }
}

/// The collection of active orders.
///
/// Cloning is cheap and every clone shares the same orders. All operations
/// run their lookup and mutation under a single lock, so two concurrent
/// calls can never both observe the same state and act on it.
#[derive(Clone)]
pub struct OrderStore {
    state: Arc<RwLock<ActiveOrders>>,
    sequence: Arc<OrderNumberSequence>,
    config: StoreConfig,
}

impl OrderStore {
    /// Creates an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates an empty store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(ActiveOrders::default())),
            sequence: Arc::new(OrderNumberSequence::new(config.order_number_max)),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Constructs a fresh order numbered from this store's sequence.
    ///
    /// The order is not added to the store.
    pub fn new_order(&self) -> Order {
        Order::new(self.sequence.next_number())
    }

    /// Returns the number of active orders.
    pub async fn len(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns true if no orders are active.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.orders.is_empty()
    }

    /// Adds a caller-constructed order.
    ///
    /// Every violated rule is reported in one message; nothing is stored
    /// unless the order is valid and its ID is not already taken.
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id()))]
    pub async fn add_order(&self, order: Order) -> Response<Order> {
        let mut state = self.state.write().await;
        let orders = &mut state.orders;

        let mut errors = order.validate();
        if orders.iter().any(|o| o.id() == order.id()) {
            errors.push(OrderError::DuplicateOrder {
                order_id: order.id().clone(),
            });
        }

        if let Some(rejection) = Response::from_errors(errors) {
            record_rejection(&rejection);
            tracing::debug!(message = %rejection.message, "order rejected");
            return rejection;
        }

        orders.push(order.clone());
        metrics::counter!("orders_placed_total").increment(1);
        metrics::gauge!("orders_active").set(orders.len() as f64);
        tracing::debug!(order_number = order.order_number(), "order added");

        Response::ok(order)
    }

    /// Builds a new order from `cmd` and adds it.
    ///
    /// Items are checked the same way [`add_items_to_order`](Self::add_items_to_order)
    /// checks them, before the order is stored, so a rejected batch never
    /// leaves an empty order behind.
    pub async fn place_order(&self, cmd: PlaceOrder) -> Response<Order> {
        let mut order = self
            .new_order()
            .with_table_id(cmd.table_id)
            .with_total_price(cmd.total_price)
            .with_note(cmd.note);

        let mut errors = order.validate();
        errors.extend(cmd.items.iter().flat_map(OrderItem::validate));
        if let Some(rejection) = Response::from_errors(errors) {
            record_rejection(&rejection);
            return rejection;
        }

        let (accepted, skipped) =
            match admit_items(&order, cmd.items, self.config.max_items_per_order) {
                Ok(admitted) => admitted,
                Err(rejection) => return rejection,
            };
        for item in accepted {
            order.push_item(item);
        }

        let response = self.add_order(order).await;
        if response.successful && !skipped.is_empty() {
            return Response {
                message: join_messages(&skipped),
                ..response
            };
        }
        response
    }

    /// Removes an order. Returns false if there was no such order.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, order_id: &OrderId) -> bool {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let Some(index) = state.orders.iter().position(|o| o.id() == order_id) else {
            tracing::debug!("delete of unknown order");
            return false;
        };

        state.orders.remove(index);
        state.finalizing.remove(order_id);
        metrics::counter!("orders_deleted_total").increment(1);
        metrics::gauge!("orders_active").set(state.orders.len() as f64);

        true
    }

    /// Looks up an order.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: &OrderId) -> Response<Order> {
        let state = self.state.read().await;
        let orders = &state.orders;

        match orders.iter().find(|o| o.id() == order_id) {
            Some(order) => Response::ok(order.clone()),
            None => not_found(order_id),
        }
    }

    /// Returns one page of orders, optionally filtered by status.
    ///
    /// Pages are 1-indexed; anything below 1 is treated as page 1. An empty
    /// page is still a success, with a message saying nothing matched.
    #[tracing::instrument(skip(self))]
    pub async fn get_order_subset(
        &self,
        status: Option<OrderStatus>,
        page: i32,
    ) -> Response<Vec<Order>> {
        let page_size = self.config.page_size;
        let page = usize::try_from(page.max(1)).unwrap_or(1);
        let offset = (page - 1).saturating_mul(page_size);

        let state = self.state.read().await;
        let orders = &state.orders;
        let subset: Vec<Order> = orders
            .iter()
            .filter(|o| status.is_none_or(|s| o.status() == s))
            .skip(offset)
            .take(page_size)
            .cloned()
            .collect();

        if subset.is_empty() {
            let message = match status {
                Some(status) => format!("No orders with status {status} on page {page}"),
                None => format!("No orders on page {page}"),
            };
            return Response::ok_with_message(subset, message);
        }

        Response::ok(subset)
    }

    /// Overwrites table, price and status of an order. Items are untouched.
    #[tracing::instrument(skip(self))]
    pub async fn update_order_details(
        &self,
        order_id: &OrderId,
        details: OrderDetails,
    ) -> Response<Order> {
        self.patch_order(order_id, OrderPatch::from(details)).await
    }

    /// Applies the supplied fields of `patch` to an order.
    ///
    /// The patch is validated before the order is looked up.
    #[tracing::instrument(skip(self))]
    pub async fn patch_order(&self, order_id: &OrderId, patch: OrderPatch) -> Response<Order> {
        if let Some(rejection) = Response::from_errors(patch.validate()) {
            record_rejection(&rejection);
            return rejection;
        }

        let mut state = self.state.write().await;
        let order = match state.editable(order_id) {
            Ok(order) => order,
            Err(rejection) => return rejection,
        };

        patch.apply(order);
        tracing::debug!(status = %order.status(), "order updated");

        Response::ok(order.clone())
    }

    /// Appends items to an order.
    ///
    /// If any item is invalid the whole batch is rejected. Items whose ID is
    /// already on the order (or earlier in the batch) are skipped and named
    /// in the message; the rest are appended and the call still succeeds.
    #[tracing::instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn add_items_to_order(
        &self,
        order_id: &OrderId,
        items: Vec<OrderItem>,
    ) -> Response<Order> {
        let errors: Vec<OrderError> = items.iter().flat_map(OrderItem::validate).collect();
        if let Some(rejection) = Response::from_errors(errors) {
            record_rejection(&rejection);
            return rejection;
        }

        let mut state = self.state.write().await;
        let order = match state.editable(order_id) {
            Ok(order) => order,
            Err(rejection) => return rejection,
        };

        let (accepted, skipped) =
            match admit_items(order, items, self.config.max_items_per_order) {
                Ok(admitted) => admitted,
                Err(rejection) => return rejection,
            };

        tracing::debug!(
            added = accepted.len(),
            skipped = skipped.len(),
            "items added to order"
        );
        for item in accepted {
            order.push_item(item);
        }

        if skipped.is_empty() {
            Response::ok(order.clone())
        } else {
            Response::ok_with_message(order.clone(), join_messages(&skipped))
        }
    }

    /// Looks up one item of an order.
    #[tracing::instrument(skip(self))]
    pub async fn get_item_from_order(
        &self,
        order_id: &OrderId,
        item_id: &ItemId,
    ) -> Response<OrderItem> {
        let state = self.state.read().await;
        let orders = &state.orders;
        let Some(order) = orders.iter().find(|o| o.id() == order_id) else {
            return not_found(order_id);
        };

        match order.get_item(item_id) {
            Some(item) => Response::ok(item.clone()),
            None => item_not_found(order_id, item_id),
        }
    }

    /// Removes one item from an order and returns the updated order.
    #[tracing::instrument(skip(self))]
    pub async fn delete_item_from_order(
        &self,
        order_id: &OrderId,
        item_id: &ItemId,
    ) -> Response<Order> {
        let mut state = self.state.write().await;
        let order = match state.editable(order_id) {
            Ok(order) => order,
            Err(rejection) => return rejection,
        };

        match order.remove_item(item_id) {
            Some(_) => Response::ok(order.clone()),
            None => item_not_found(order_id, item_id),
        }
    }

    /// Sets an order to `Done`, locks it against further changes and
    /// returns a copy of it. The order stays in the store until the caller
    /// deletes it.
    ///
    /// Fails if the order is not active or is already being finalized, so
    /// only one caller can finalize a given order.
    pub(crate) async fn mark_done(&self, order_id: &OrderId) -> Response<Order> {
        let mut state = self.state.write().await;
        let order = match state.editable(order_id) {
            Ok(order) => order,
            Err(rejection) => return rejection,
        };

        order.set_status(OrderStatus::Done);
        let snapshot = order.clone();
        state.finalizing.insert(order_id.clone());

        Response::ok(snapshot)
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found<T>(order_id: &OrderId) -> Response<T> {
    Response::from_error(OrderError::OrderNotFound {
        order_id: order_id.clone(),
    })
}

/// Splits a validated batch into items to append and collisions to report.
///
/// An item collides if its ID is already on `order` or earlier in the batch.
/// Fails if the accepted items would take the order over `cap`.
fn admit_items<T>(
    order: &Order,
    items: Vec<OrderItem>,
    cap: Option<u32>,
) -> Result<(Vec<OrderItem>, Vec<OrderError>), Response<T>> {
    let mut accepted: Vec<OrderItem> = Vec::with_capacity(items.len());
    let mut skipped = Vec::new();
    for item in items {
        if order.has_item(&item.id) || accepted.iter().any(|a| a.id == item.id) {
            skipped.push(OrderError::DuplicateItem { item_id: item.id });
        } else {
            accepted.push(item);
        }
    }

    if let Some(limit) = cap {
        let requested = order.item_amount_total()
            + accepted.iter().map(|i| i64::from(i.amount)).sum::<i64>();
        if requested > i64::from(limit) {
            let rejection = Response::from_error(OrderError::ItemLimitExceeded { requested, limit });
            record_rejection(&rejection);
            return Err(rejection);
        }
    }

    Ok((accepted, skipped))
}

fn item_not_found<T>(order_id: &OrderId, item_id: &ItemId) -> Response<T> {
    Response::from_error(OrderError::ItemNotFound {
        order_id: order_id.clone(),
        item_id: item_id.clone(),
    })
}

fn record_rejection<T>(response: &Response<T>) {
    if let Some(kind) = response.kind() {
        metrics::counter!("orders_rejected_total", "kind" => kind.as_str()).increment(1);
    }
}
