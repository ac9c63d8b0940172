use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Amount, OrderId, OrderSnapshot, OrderStatus};
use super::translator::BackendFailure;
use crate::trust::domain::CustomerId;

/// Stored order together with the snapshot the guard reasons about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub snapshot: OrderSnapshot,
    pub total_amount: Amount,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage abstraction over the hosted order table.
///
/// Orders are never deleted; cancellation is a status.
pub trait OrderRepository: Send + Sync {
    fn fetch(&self, id: &OrderId) -> Result<Option<OrderRecord>, OrderRepositoryError>;

    /// Write `target` only if the stored status still equals `expected`.
    ///
    /// Implementations must return [`OrderRepositoryError::StatusConflict`] rather than
    /// overwrite a status another actor changed first.
    fn update_status(
        &self,
        id: &OrderId,
        expected: OrderStatus,
        target: OrderStatus,
    ) -> Result<OrderRecord, OrderRepositoryError>;

    fn for_customer(&self, customer: &CustomerId)
        -> Result<Vec<OrderRecord>, OrderRepositoryError>;
}

/// Error enumeration for order storage failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderRepositoryError {
    #[error("order status changed concurrently (expected {expected}, found {found})")]
    StatusConflict {
        expected: OrderStatus,
        found: OrderStatus,
    },
    #[error("order not found")]
    NotFound,
    #[error("write rejected by order store: {0}")]
    Rejected(BackendFailure),
    #[error("order store unavailable: {0}")]
    Unavailable(String),
}
