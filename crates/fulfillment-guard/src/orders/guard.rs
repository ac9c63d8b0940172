use serde::{Deserialize, Serialize};

use super::domain::{OrderSnapshot, OrderStatus};
use super::notice::UserNotice;

/// A precondition that does not hold for a requested transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnmetCondition {
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    VerifiedDeposit,
    FullPayment,
    DeliveryAddress,
    TrackingDetails,
}

impl UnmetCondition {
    pub fn reason(&self) -> String {
        match self {
            UnmetCondition::InvalidTransition { from, to } => {
                format!("Invalid Status Change: cannot move from {from} to {to}")
            }
            UnmetCondition::VerifiedDeposit => "Requires verified deposit".to_string(),
            UnmetCondition::FullPayment => "Requires full payment".to_string(),
            UnmetCondition::DeliveryAddress => "Requires delivery address".to_string(),
            UnmetCondition::TrackingDetails => "Requires carrier and tracking number".to_string(),
        }
    }

    pub fn notice(&self, order: &OrderSnapshot) -> UserNotice {
        match self {
            UnmetCondition::InvalidTransition { .. } => UserNotice::invalid_status_change(),
            UnmetCondition::VerifiedDeposit => UserNotice::payment_required(),
            UnmetCondition::FullPayment => UserNotice::balance_required(&order.balance_label()),
            UnmetCondition::DeliveryAddress => UserNotice::address_required(),
            UnmetCondition::TrackingDetails => UserNotice::tracking_required(),
        }
    }
}

/// Result of checking one target status against an order.
///
/// A blocked transition is an ordinary outcome the caller branches on, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCheck {
    pub target: OrderStatus,
    pub allowed: bool,
    pub reasons: Vec<String>,
    pub unmet: Vec<UnmetCondition>,
}

impl TransitionCheck {
    fn from_unmet(target: OrderStatus, unmet: Vec<UnmetCondition>) -> Self {
        Self {
            target,
            allowed: unmet.is_empty(),
            reasons: unmet.iter().map(UnmetCondition::reason).collect(),
            unmet,
        }
    }

    /// Notice for the first unmet condition, in the same vocabulary as translated failures.
    pub fn notice(&self, order: &OrderSnapshot) -> Option<UserNotice> {
        self.unmet.first().map(|condition| condition.notice(order))
    }
}

/// Enumerate every unmet precondition for moving `order` to `target`.
///
/// Edges outside the transition table are rejected outright, whatever the payment or
/// address state. Otherwise all failing conditions are listed so a UI can render a full
/// checklist.
pub fn check_transition(order: &OrderSnapshot, target: OrderStatus) -> TransitionCheck {
    if !order.status.can_transition_to(target) {
        return TransitionCheck::from_unmet(
            target,
            vec![UnmetCondition::InvalidTransition {
                from: order.status,
                to: target,
            }],
        );
    }

    let mut unmet = Vec::new();

    if target == OrderStatus::Processing && !order.has_verified_deposit() {
        unmet.push(UnmetCondition::VerifiedDeposit);
    }

    if matches!(target, OrderStatus::ReadyToShip | OrderStatus::Shipped) {
        unmet.extend(shipping_conditions(order));
    }

    if target == OrderStatus::Shipped && !order.has_tracking_details() {
        unmet.push(UnmetCondition::TrackingDetails);
    }

    TransitionCheck::from_unmet(target, unmet)
}

/// Payment and address readiness for shipment, independent of the current status.
pub fn can_proceed_to_shipping(order: &OrderSnapshot) -> TransitionCheck {
    TransitionCheck::from_unmet(OrderStatus::ReadyToShip, shipping_conditions(order))
}

/// Guard result for every edge leaving the order's current status.
pub fn available_transitions(order: &OrderSnapshot) -> Vec<TransitionCheck> {
    order
        .status
        .allowed_targets()
        .iter()
        .map(|target| check_transition(order, *target))
        .collect()
}

fn shipping_conditions(order: &OrderSnapshot) -> Vec<UnmetCondition> {
    let mut unmet = Vec::new();
    if !order.is_settled() {
        unmet.push(UnmetCondition::FullPayment);
    }
    if !order.has_delivery_address() {
        unmet.push(UnmetCondition::DeliveryAddress);
    }
    unmet
}
