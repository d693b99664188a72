//! HTTP and WebSocket API for the order management core.
//!
//! Exposes the order store over REST under `/order`, streams order changes
//! over a WebSocket, and serves health and Prometheus metrics endpoints.

pub mod config;
pub mod error;
pub mod notify;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use domain::{ArchiveSink, OrderService, OrderStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use notify::Notifier;
use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<A: ArchiveSink + 'static>(
    state: Arc<AppState<A>>,
    metrics_handle: PrometheusHandle,
    cors_origins: &[String],
) -> Router {
    use routes::orders;

    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check::<A>))
        .route("/order/ws", get(routes::ws::subscribe::<A>))
        .route("/order/active/{filter}", get(orders::list_active::<A>))
        .route("/order/create", post(orders::create::<A>))
        .route(
            "/order/{id}",
            get(orders::get::<A>)
                .put(orders::update::<A>)
                .delete(orders::delete::<A>),
        )
        .route("/order/{id}/item", post(orders::add_items::<A>))
        .route(
            "/order/{id}/item/{item_id}",
            get(orders::get_item::<A>).delete(orders::delete_item::<A>),
        )
        .route(
            "/order/{id}/status",
            get(orders::get_status::<A>).put(orders::set_status::<A>),
        )
        .route(
            "/order/{id}/price",
            get(orders::get_price::<A>).put(orders::set_price::<A>),
        )
        .route(
            "/order/{id}/tableno",
            get(orders::get_table::<A>).put(orders::set_table::<A>),
        )
        .route("/order/{id}/finalize", post(orders::finalize::<A>))
        .with_state(state)
        .merge(metrics_router)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Creates the application state for the given configuration and archive.
pub fn create_state<A: ArchiveSink>(config: &Config, archive: A) -> Arc<AppState<A>> {
    let store = OrderStore::with_config(config.store_config());
    let service = OrderService::new(store, archive).with_archive_timeout(config.archive_timeout);

    Arc::new(AppState {
        service,
        notifier: Notifier::default(),
    })
}
