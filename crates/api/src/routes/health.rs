//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use domain::ArchiveSink;
use serde::Serialize;

use super::orders::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub active_orders: usize,
}

/// GET /health: liveness plus the number of active orders.
pub async fn check<A: ArchiveSink + 'static>(
    State(state): State<Arc<AppState<A>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        active_orders: state.service.store().len().await,
    })
}
