use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{OrderId, OrderStatus};
use super::repository::OrderRepository;
use super::service::{OrderFulfillmentService, TransitionOutcome};
use super::translator::{translate_failure, BackendFailure};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub(crate) struct TransitionRequest {
    pub(crate) target: OrderStatus,
}

/// Router builder exposing the guard, status writes and failure translation.
pub fn order_router<R>(service: Arc<OrderFulfillmentService<R>>) -> Router
where
    R: OrderRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/orders/:order_id/blocker",
            get(blocker_handler::<R>),
        )
        .route(
            "/api/v1/orders/:order_id/transitions",
            get(transitions_handler::<R>),
        )
        .route(
            "/api/v1/orders/:order_id/transitions/check",
            post(check_handler::<R>),
        )
        .route(
            "/api/v1/orders/:order_id/status",
            post(status_handler::<R>),
        )
        .route("/api/v1/order-failures/translate", post(translate_handler))
        .with_state(service)
}

pub(crate) async fn blocker_handler<R>(
    State(service): State<Arc<OrderFulfillmentService<R>>>,
    Path(order_id): Path<String>,
) -> Response
where
    R: OrderRepository + 'static,
{
    let id = OrderId(order_id);
    match service.blocker(&id) {
        Ok(blocker) => {
            let payload = json!({
                "order_id": id.0,
                "blocker": blocker.map(|blocker| blocker.summary()),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn transitions_handler<R>(
    State(service): State<Arc<OrderFulfillmentService<R>>>,
    Path(order_id): Path<String>,
) -> Response
where
    R: OrderRepository + 'static,
{
    match service.available_transitions(&OrderId(order_id)) {
        Ok(checks) => (StatusCode::OK, axum::Json(checks)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn check_handler<R>(
    State(service): State<Arc<OrderFulfillmentService<R>>>,
    Path(order_id): Path<String>,
    axum::Json(request): axum::Json<TransitionRequest>,
) -> Response
where
    R: OrderRepository + 'static,
{
    match service.check(&OrderId(order_id), request.target) {
        Ok(check) => (StatusCode::OK, axum::Json(check)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<OrderFulfillmentService<R>>>,
    Path(order_id): Path<String>,
    axum::Json(request): axum::Json<TransitionRequest>,
) -> Response
where
    R: OrderRepository + 'static,
{
    match service.transition(&OrderId(order_id), request.target) {
        Ok(outcome @ TransitionOutcome::Applied { .. }) => {
            (StatusCode::OK, axum::Json(outcome)).into_response()
        }
        Ok(outcome @ TransitionOutcome::Blocked { .. }) => {
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(outcome)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn translate_handler(
    axum::Json(failure): axum::Json<Option<BackendFailure>>,
) -> Response {
    let notice = translate_failure(failure.as_ref());
    (StatusCode::OK, axum::Json(notice)).into_response()
}
