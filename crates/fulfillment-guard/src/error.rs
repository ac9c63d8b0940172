use crate::config::ConfigError;
use crate::orders::{FulfillmentError, OrderRepositoryError, SnapshotError, UserNotice};
use crate::telemetry::TelemetryError;
use crate::trust::TrustServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Serialization(serde_json::Error),
    InvalidOrder(SnapshotError),
    Fulfillment(FulfillmentError),
    Trust(TrustServiceError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Serialization(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidOrder(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Fulfillment(FulfillmentError::Repository(error)) => match error {
                OrderRepositoryError::StatusConflict { .. } => StatusCode::CONFLICT,
                OrderRepositoryError::NotFound => StatusCode::NOT_FOUND,
                OrderRepositoryError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
                OrderRepositoryError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            AppError::Trust(error) => match error {
                TrustServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                TrustServiceError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
                TrustServiceError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Guidance for staff, present only for domain failures.
    pub fn notice(&self) -> Option<UserNotice> {
        match self {
            AppError::Fulfillment(error) => Some(error.notice()),
            AppError::Trust(error) => Some(error.notice()),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Serialization(err) => write!(f, "serialization error: {}", err),
            AppError::InvalidOrder(err) => write!(f, "invalid order: {}", err),
            AppError::Fulfillment(err) => write!(f, "{}", err),
            AppError::Trust(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Serialization(err) => Some(err),
            AppError::InvalidOrder(err) => Some(err),
            AppError::Fulfillment(err) => Some(err),
            AppError::Trust(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.notice() {
            Some(notice) => json!({ "error": self.to_string(), "notice": notice }),
            None => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<SnapshotError> for AppError {
    fn from(value: SnapshotError) -> Self {
        Self::InvalidOrder(value)
    }
}

impl From<FulfillmentError> for AppError {
    fn from(value: FulfillmentError) -> Self {
        Self::Fulfillment(value)
    }
}

impl From<OrderRepositoryError> for AppError {
    fn from(value: OrderRepositoryError) -> Self {
        Self::Fulfillment(value.into())
    }
}

impl From<TrustServiceError> for AppError {
    fn from(value: TrustServiceError) -> Self {
        Self::Trust(value)
    }
}
