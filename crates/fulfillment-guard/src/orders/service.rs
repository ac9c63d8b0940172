use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::blockers::{resolve_blocker, OrderBlocker};
use super::domain::{OrderId, OrderStatus};
use super::guard::{available_transitions, check_transition, TransitionCheck};
use super::notice::UserNotice;
use super::repository::{OrderRecord, OrderRepository, OrderRepositoryError};
use super::translator::{translate_failure, BackendFailure};
use crate::config::FulfillmentConfig;

/// Service composing the transition guard with optimistic status writes.
pub struct OrderFulfillmentService<R> {
    repository: Arc<R>,
    default_currency: String,
}

/// What happened to a requested status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
    Applied { order: OrderRecord },
    Blocked { check: TransitionCheck, notice: Option<UserNotice> },
}

impl<R> OrderFulfillmentService<R>
where
    R: OrderRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: &FulfillmentConfig) -> Self {
        Self {
            repository,
            default_currency: config.default_currency.clone(),
        }
    }

    /// Fetch an order with its currency filled in from configuration when absent.
    pub fn get(&self, order_id: &OrderId) -> Result<OrderRecord, FulfillmentError> {
        let mut record = self
            .repository
            .fetch(order_id)?
            .ok_or(OrderRepositoryError::NotFound)?;
        record.snapshot = record.snapshot.with_default_currency(&self.default_currency);
        Ok(record)
    }

    pub fn blocker(&self, order_id: &OrderId) -> Result<Option<OrderBlocker>, FulfillmentError> {
        let record = self.get(order_id)?;
        Ok(resolve_blocker(&record.snapshot))
    }

    pub fn check(
        &self,
        order_id: &OrderId,
        target: OrderStatus,
    ) -> Result<TransitionCheck, FulfillmentError> {
        let record = self.get(order_id)?;
        Ok(check_transition(&record.snapshot, target))
    }

    pub fn available_transitions(
        &self,
        order_id: &OrderId,
    ) -> Result<Vec<TransitionCheck>, FulfillmentError> {
        let record = self.get(order_id)?;
        Ok(available_transitions(&record.snapshot))
    }

    /// Pre-validate with the guard, then write with the observed status as the expected one.
    ///
    /// Conflicts are returned to the caller, who must re-fetch and re-check before retrying.
    pub fn transition(
        &self,
        order_id: &OrderId,
        target: OrderStatus,
    ) -> Result<TransitionOutcome, FulfillmentError> {
        let record = self.get(order_id)?;
        let check = check_transition(&record.snapshot, target);

        if !check.allowed {
            debug!(
                order_id = %order_id.0,
                from = %record.snapshot.status,
                to = %target,
                reasons = ?check.reasons,
                "status change blocked by guard"
            );
            let notice = check.notice(&record.snapshot);
            return Ok(TransitionOutcome::Blocked { check, notice });
        }

        let expected = record.snapshot.status;
        match self.repository.update_status(order_id, expected, target) {
            Ok(mut order) => {
                order.snapshot = order.snapshot.with_default_currency(&self.default_currency);
                info!(order_id = %order_id.0, from = %expected, to = %target, "order status updated");
                Ok(TransitionOutcome::Applied { order })
            }
            Err(error) => {
                warn!(order_id = %order_id.0, from = %expected, to = %target, %error, "order status write failed");
                Err(error.into())
            }
        }
    }
}

/// Error raised by the fulfillment service.
#[derive(Debug, thiserror::Error)]
pub enum FulfillmentError {
    #[error(transparent)]
    Repository(#[from] OrderRepositoryError),
}

impl FulfillmentError {
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            FulfillmentError::Repository(OrderRepositoryError::StatusConflict { .. })
        )
    }

    /// Guidance for a person; opaque backend text always goes through the translator.
    pub fn notice(&self) -> UserNotice {
        match self {
            FulfillmentError::Repository(OrderRepositoryError::StatusConflict { .. }) => {
                UserNotice::order_changed()
            }
            FulfillmentError::Repository(OrderRepositoryError::NotFound) => {
                UserNotice::update_failed(Some("Order not found."))
            }
            FulfillmentError::Repository(OrderRepositoryError::Rejected(failure)) => {
                translate_failure(Some(failure))
            }
            FulfillmentError::Repository(OrderRepositoryError::Unavailable(message)) => {
                translate_failure(Some(&BackendFailure::new(message.clone())))
            }
        }
    }
}
