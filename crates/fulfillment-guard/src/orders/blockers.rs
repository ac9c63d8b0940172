use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{Amount, OrderSnapshot, OrderStatus, PaymentStatus};

/// The single dominant reason an order is stuck, for list and summary views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderBlocker {
    AwaitingBalance { currency: String, balance: Amount },
    AwaitingDeliveryAddress,
    AwaitingFullPayment,
    AwaitingPaymentProof,
}

impl OrderBlocker {
    pub fn summary(&self) -> String {
        match self {
            OrderBlocker::AwaitingBalance { currency, balance } => {
                format!("Waiting for balance payment of {currency} {balance}")
            }
            OrderBlocker::AwaitingDeliveryAddress => {
                "Waiting for customer to provide delivery address".to_string()
            }
            OrderBlocker::AwaitingFullPayment => {
                "Order cannot proceed until fully paid".to_string()
            }
            OrderBlocker::AwaitingPaymentProof => {
                "Waiting for customer to submit payment proof".to_string()
            }
        }
    }
}

impl fmt::Display for OrderBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Derive the dominant blocker from current state, independent of any target status.
///
/// Checks run in a fixed order and the first match wins, so payment blockers take
/// precedence over address blockers. Terminal orders never report a blocker.
pub fn resolve_blocker(order: &OrderSnapshot) -> Option<OrderBlocker> {
    let status = order.status;

    if status == OrderStatus::Processing
        && order.payment_status == Some(PaymentStatus::PartiallyPaid)
    {
        return Some(OrderBlocker::AwaitingBalance {
            currency: order.currency().to_string(),
            balance: order.balance_remaining,
        });
    }

    if matches!(status, OrderStatus::Processing | OrderStatus::ReadyToShip)
        && !order.has_delivery_address()
    {
        return Some(OrderBlocker::AwaitingDeliveryAddress);
    }

    if status == OrderStatus::PaymentReceived && !order.is_settled() {
        return Some(OrderBlocker::AwaitingFullPayment);
    }

    if status == OrderStatus::PendingPayment
        && matches!(order.payment_status, None | Some(PaymentStatus::Unpaid))
    {
        return Some(OrderBlocker::AwaitingPaymentProof);
    }

    None
}

/// Human-readable form of [`resolve_blocker`].
pub fn blocker_reason(order: &OrderSnapshot) -> Option<String> {
    resolve_blocker(order).map(|blocker| blocker.summary())
}
