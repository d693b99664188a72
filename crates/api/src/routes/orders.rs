//! Order management endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{ItemId, OrderId};
use domain::{
    ArchiveSink, Money, Order, OrderError, OrderItem, OrderPatch, OrderService, OrderStatus, PlaceOrder,
    Response,
};
use serde::Deserialize;

use crate::error::{ApiError, into_result};
use crate::notify::{Notifier, OrderEvent};

/// Shared application state accessible from all handlers.
pub struct AppState<A: ArchiveSink> {
    pub service: OrderService<A>,
    pub notifier: Notifier,
}

type ApiResult<T> = Result<Json<Response<T>>, ApiError>;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub table_id: i32,
    pub total_price_cents: i64,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Deserialize)]
pub struct OrderItemRequest {
    pub id: String,
    pub name: String,
    pub amount: i32,
}

impl From<OrderItemRequest> for OrderItem {
    fn from(req: OrderItemRequest) -> Self {
        OrderItem::new(req.id, req.name, req.amount)
    }
}

/// Body of `PUT /order/{id}`; absent fields are left unchanged.
#[derive(Deserialize, Default)]
pub struct UpdateOrderRequest {
    pub table_id: Option<i32>,
    pub total_price_cents: Option<i64>,
    pub status: Option<StatusValue>,
    pub note: Option<String>,
}

/// A status given either by name (`"READY"`) or by numeric code (`2`).
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum StatusValue {
    Code(i32),
    Name(String),
}

impl TryFrom<StatusValue> for OrderStatus {
    type Error = ApiError;

    fn try_from(value: StatusValue) -> Result<Self, Self::Error> {
        let status = match value {
            StatusValue::Code(code) => OrderStatus::try_from(code)?,
            StatusValue::Name(name) => name.parse()?,
        };
        if status.is_terminal() {
            return Err(ApiError::BadRequest(
                "Orders are closed through the finalize endpoint".to_string(),
            ));
        }
        Ok(status)
    }
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: StatusValue,
}

#[derive(Deserialize)]
pub struct PriceRequest {
    pub total_price_cents: i64,
}

#[derive(Deserialize)]
pub struct TableRequest {
    pub table_id: i32,
}

#[derive(Deserialize, Debug)]
pub struct PageQuery {
    pub page: Option<i32>,
}

// -- Handlers --

/// GET /order/active/{filter}?page=N: one page of active orders.
///
/// `filter` is `all` or a status name.
#[tracing::instrument(skip(state))]
pub async fn list_active<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path(filter): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<Order>> {
    let status = if filter.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(filter.parse::<OrderStatus>()?)
    };

    let page = query.page.unwrap_or(1);
    into_result(state.service.store().get_order_subset(status, page).await)
}

/// POST /order/create: place a new order, optionally with items.
#[tracing::instrument(skip(state, req))]
pub async fn create<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Response<Order>>), ApiError> {
    let cmd = PlaceOrder::new(req.table_id, Money::from_cents(req.total_price_cents))
        .with_note(req.note)
        .with_items(req.items.into_iter().map(OrderItem::from).collect());

    let Json(response) = into_result(state.service.store().place_order(cmd).await)?;

    if let Some(order) = &response.data {
        state.notifier.publish(OrderEvent::New, order);
    }
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /order/{id}
#[tracing::instrument(skip(state))]
pub async fn get<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path(id): Path<String>,
) -> ApiResult<Order> {
    into_result(state.service.store().get_order(&OrderId::from(id)).await)
}

/// PUT /order/{id}: update table, price, status or note.
#[tracing::instrument(skip(state, req))]
pub async fn update<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderRequest>,
) -> ApiResult<Order> {
    let patch = OrderPatch {
        table_id: req.table_id,
        total_price: req.total_price_cents.map(Money::from_cents),
        status: req.status.map(OrderStatus::try_from).transpose()?,
        note: req.note,
    };
    apply_patch(&state, id, patch).await
}

/// DELETE /order/{id}: drop an order without archiving it.
#[tracing::instrument(skip(state))]
pub async fn delete<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path(id): Path<String>,
) -> ApiResult<OrderId> {
    let order_id = OrderId::from(id);
    if state.service.store().delete_order(&order_id).await {
        Ok(Json(Response::ok(order_id)))
    } else {
        Err(ApiError::rejected(Response::<()>::from_error(
            OrderError::OrderNotFound { order_id },
        )))
    }
}

/// POST /order/{id}/item: append items to an order.
#[tracing::instrument(skip(state, items))]
pub async fn add_items<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path(id): Path<String>,
    Json(items): Json<Vec<OrderItemRequest>>,
) -> ApiResult<Order> {
    let items = items.into_iter().map(OrderItem::from).collect();
    let response = state
        .service
        .store()
        .add_items_to_order(&OrderId::from(id), items)
        .await;
    publish_update(&state, into_result(response))
}

/// GET /order/{id}/item/{item_id}
#[tracing::instrument(skip(state))]
pub async fn get_item<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path((id, item_id)): Path<(String, String)>,
) -> ApiResult<OrderItem> {
    let response = state
        .service
        .store()
        .get_item_from_order(&OrderId::from(id), &ItemId::from(item_id))
        .await;
    into_result(response)
}

/// DELETE /order/{id}/item/{item_id}
#[tracing::instrument(skip(state))]
pub async fn delete_item<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path((id, item_id)): Path<(String, String)>,
) -> ApiResult<Order> {
    let response = state
        .service
        .store()
        .delete_item_from_order(&OrderId::from(id), &ItemId::from(item_id))
        .await;
    publish_update(&state, into_result(response))
}

/// GET /order/{id}/status
pub async fn get_status<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path(id): Path<String>,
) -> ApiResult<OrderStatus> {
    let response = state.service.store().get_order(&OrderId::from(id)).await;
    into_result(response.map(|o| o.status()))
}

/// PUT /order/{id}/status: move an order to PLACED, PROCESSING or READY.
#[tracing::instrument(skip(state, req))]
pub async fn set_status<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<Order> {
    let status = OrderStatus::try_from(req.status)?;
    apply_patch(&state, id, OrderPatch::status(status)).await
}

/// GET /order/{id}/price
pub async fn get_price<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path(id): Path<String>,
) -> ApiResult<Money> {
    let response = state.service.store().get_order(&OrderId::from(id)).await;
    into_result(response.map(|o| o.total_price()))
}

/// PUT /order/{id}/price
#[tracing::instrument(skip(state, req))]
pub async fn set_price<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path(id): Path<String>,
    Json(req): Json<PriceRequest>,
) -> ApiResult<Order> {
    let patch = OrderPatch::total_price(Money::from_cents(req.total_price_cents));
    apply_patch(&state, id, patch).await
}

/// GET /order/{id}/tableno
pub async fn get_table<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path(id): Path<String>,
) -> ApiResult<i32> {
    let response = state.service.store().get_order(&OrderId::from(id)).await;
    into_result(response.map(|o| o.table_id()))
}

/// PUT /order/{id}/tableno
#[tracing::instrument(skip(state, req))]
pub async fn set_table<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path(id): Path<String>,
    Json(req): Json<TableRequest>,
) -> ApiResult<Order> {
    apply_patch(&state, id, OrderPatch::table_id(req.table_id)).await
}

/// POST /order/{id}/finalize: mark done, archive and remove an order.
#[tracing::instrument(skip(state))]
pub async fn finalize<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Path(id): Path<String>,
) -> ApiResult<Order> {
    let result = into_result(state.service.finalize_order(&OrderId::from(id)).await);
    if let Ok(Json(Response {
        data: Some(order), ..
    })) = &result
    {
        state.notifier.publish(OrderEvent::Finalized, order);
    }
    result
}

async fn apply_patch<A: ArchiveSink>(
    state: &AppState<A>,
    id: String,
    patch: OrderPatch,
) -> ApiResult<Order> {
    let response = state
        .service
        .store()
        .patch_order(&OrderId::from(id), patch)
        .await;
    publish_update(state, into_result(response))
}

fn publish_update<A: ArchiveSink>(state: &AppState<A>, result: ApiResult<Order>) -> ApiResult<Order> {
    if let Ok(Json(Response {
        data: Some(order), ..
    })) = &result
    {
        state.notifier.publish(OrderEvent::Update, order);
    }
    result
}
