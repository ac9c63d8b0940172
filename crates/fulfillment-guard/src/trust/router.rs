use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use super::domain::{CustomerId, TrustTier};
use super::repository::{OrderHistorySource, TrustStore};
use super::service::{TrustOverrideManager, TrustServiceError};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub(crate) struct OverrideRequest {
    pub(crate) tier: TrustTier,
    pub(crate) reason: String,
}

/// Router builder exposing trust profile reads, evaluation and overrides.
pub fn trust_router<S, H>(manager: Arc<TrustOverrideManager<S, H>>) -> Router
where
    S: TrustStore + 'static,
    H: OrderHistorySource + 'static,
{
    Router::new()
        .route(
            "/api/v1/customers/:customer_id/trust",
            get(profile_handler::<S, H>),
        )
        .route(
            "/api/v1/customers/:customer_id/trust/evaluate",
            post(evaluate_handler::<S, H>),
        )
        .route(
            "/api/v1/customers/:customer_id/trust/override",
            axum::routing::put(set_override_handler::<S, H>)
                .delete(clear_override_handler::<S, H>),
        )
        .route(
            "/api/v1/customers/:customer_id/trust/history",
            get(history_handler::<S, H>),
        )
        .with_state(manager)
}

pub(crate) async fn profile_handler<S, H>(
    State(manager): State<Arc<TrustOverrideManager<S, H>>>,
    Path(customer_id): Path<String>,
) -> Response
where
    S: TrustStore + 'static,
    H: OrderHistorySource + 'static,
{
    let id = CustomerId(customer_id);
    match manager.profile(&id) {
        Ok(Some(profile)) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Ok(None) => AppError::from(TrustServiceError::ProfileNotFound(id)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn evaluate_handler<S, H>(
    State(manager): State<Arc<TrustOverrideManager<S, H>>>,
    Path(customer_id): Path<String>,
) -> Response
where
    S: TrustStore + 'static,
    H: OrderHistorySource + 'static,
{
    match manager.evaluate(&CustomerId(customer_id)) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn set_override_handler<S, H>(
    State(manager): State<Arc<TrustOverrideManager<S, H>>>,
    Path(customer_id): Path<String>,
    axum::Json(request): axum::Json<OverrideRequest>,
) -> Response
where
    S: TrustStore + 'static,
    H: OrderHistorySource + 'static,
{
    match manager.set_override(&CustomerId(customer_id), request.tier, &request.reason) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn clear_override_handler<S, H>(
    State(manager): State<Arc<TrustOverrideManager<S, H>>>,
    Path(customer_id): Path<String>,
) -> Response
where
    S: TrustStore + 'static,
    H: OrderHistorySource + 'static,
{
    match manager.clear_override(&CustomerId(customer_id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn history_handler<S, H>(
    State(manager): State<Arc<TrustOverrideManager<S, H>>>,
    Path(customer_id): Path<String>,
) -> Response
where
    S: TrustStore + 'static,
    H: OrderHistorySource + 'static,
{
    match manager.history(&CustomerId(customer_id)) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}
