use crate::infra::{AppState, InMemoryOrderRepository, OrderTableHistory};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use fulfillment_guard::error::AppError;
use fulfillment_guard::orders::{
    order_router, Amount, OrderFulfillmentService, OrderId, OrderRecord, OrderSnapshot,
};
use fulfillment_guard::trust::{
    trust_router, CustomerId, InMemoryTrustStore, TrustOverrideManager,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Order payload accepted by the intake endpoint; mirrors the upstream order row.
#[derive(Debug, Deserialize)]
pub(crate) struct OrderIntakeRequest {
    pub(crate) customer_id: String,
    #[serde(flatten)]
    pub(crate) snapshot: OrderSnapshot,
    #[serde(default)]
    pub(crate) total_amount: Amount,
    #[serde(default)]
    pub(crate) created_at: Option<DateTime<Utc>>,
}

pub(crate) fn with_routes(
    orders: Arc<OrderFulfillmentService<InMemoryOrderRepository>>,
    trust: Arc<TrustOverrideManager<InMemoryTrustStore, OrderTableHistory>>,
) -> axum::Router {
    order_router(orders)
        .merge(trust_router(trust))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/orders/:order_id",
            axum::routing::put(order_intake_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Register an order in the in-process table. Status changes go through the guarded status route.
pub(crate) async fn order_intake_endpoint(
    Extension(state): Extension<AppState>,
    Path(order_id): Path<String>,
    Json(payload): Json<OrderIntakeRequest>,
) -> Result<Json<OrderRecord>, AppError> {
    payload.snapshot.validate()?;

    let now = Utc::now();
    let record = OrderRecord {
        id: OrderId(order_id),
        customer_id: CustomerId(payload.customer_id),
        snapshot: payload.snapshot,
        total_amount: payload.total_amount,
        created_at: payload.created_at.unwrap_or(now),
        updated_at: now,
    };

    Ok(Json(state.orders.register(record)?))
}
