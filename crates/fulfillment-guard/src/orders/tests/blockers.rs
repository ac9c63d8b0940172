use super::common::*;
use crate::orders::blockers::{blocker_reason, resolve_blocker, OrderBlocker};
use crate::orders::domain::{Amount, OrderStatus, PaymentStatus};

#[test]
fn partial_payment_reports_currency_and_balance() {
    for minor in [1, 50_000, 123_456] {
        let order = partially_paid(OrderStatus::Processing, Amount::from_minor(minor));
        let reason = blocker_reason(&order).expect("partially paid order is blocked");
        assert!(reason.contains("GHS"), "missing currency in {reason}");
        assert!(
            reason.contains(&Amount::from_minor(minor).to_string()),
            "missing balance in {reason}"
        );
    }
}

#[test]
fn partial_payment_uses_order_currency() {
    let mut order = partially_paid(OrderStatus::Processing, Amount::from_major(75));
    order.currency = Some("USD".to_string());
    assert_eq!(
        blocker_reason(&order).as_deref(),
        Some("Waiting for balance payment of USD 75.00")
    );

    order.currency = None;
    assert_eq!(
        blocker_reason(&order).as_deref(),
        Some("Waiting for balance payment of GHS 75.00")
    );
}

#[test]
fn missing_address_blocks_processing_and_ready_to_ship() {
    for status in [OrderStatus::Processing, OrderStatus::ReadyToShip] {
        let mut order = ready_order(status);
        order.delivery_address_ref = None;
        let reason = blocker_reason(&order).expect("missing address is a blocker");
        assert!(reason.contains("delivery address"), "{status}: {reason}");
    }
}

#[test]
fn payment_blocker_takes_precedence_over_address() {
    let mut order = partially_paid(OrderStatus::Processing, Amount::from_major(20));
    order.delivery_address_ref = None;

    assert!(matches!(
        resolve_blocker(&order),
        Some(OrderBlocker::AwaitingBalance { .. })
    ));
}

#[test]
fn payment_received_requires_settlement() {
    let mut order = ready_order(OrderStatus::PaymentReceived);
    order.payment_status = Some(PaymentStatus::PartiallyPaid);
    assert_eq!(
        blocker_reason(&order).as_deref(),
        Some("Order cannot proceed until fully paid")
    );

    order.payment_status = Some(PaymentStatus::Overpaid);
    assert_eq!(blocker_reason(&order), None);
}

#[test]
fn pending_payment_waits_for_proof_when_unpaid_or_unset() {
    let unset = order(OrderStatus::PendingPayment);
    assert_eq!(
        resolve_blocker(&unset),
        Some(OrderBlocker::AwaitingPaymentProof)
    );

    let mut unpaid = order(OrderStatus::PendingPayment);
    unpaid.payment_status = Some(PaymentStatus::Unpaid);
    assert_eq!(
        blocker_reason(&unpaid).as_deref(),
        Some("Waiting for customer to submit payment proof")
    );

    let mut submitted = order(OrderStatus::PendingPayment);
    submitted.payment_status = Some(PaymentStatus::PartiallyPaid);
    assert_eq!(resolve_blocker(&submitted), None);
}

#[test]
fn terminal_orders_never_report_blockers() {
    for status in [OrderStatus::Delivered, OrderStatus::Cancelled] {
        let mut worst = order(status);
        worst.payment_status = Some(PaymentStatus::Unpaid);
        worst.balance_remaining = Amount::from_major(900);
        assert_eq!(resolve_blocker(&worst), None, "{status}");

        assert_eq!(resolve_blocker(&ready_order(status)), None, "{status}");
    }
}

#[test]
fn shipped_orders_have_no_blocker() {
    let mut order = ready_order(OrderStatus::Shipped);
    order.delivery_address_ref = None;
    assert_eq!(resolve_blocker(&order), None);
}
