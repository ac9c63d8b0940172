use std::fmt;

use serde::{Deserialize, Serialize};

/// Currency assumed when an order does not carry one.
pub const DEFAULT_CURRENCY: &str = "GHS";

/// Identifier wrapper for orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

/// Fulfillment progress of an order.
///
/// Status only moves forward along [`OrderStatus::allowed_targets`], or sideways into
/// `Cancelled` from a non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PendingPayment,
    Processing,
    PaymentReceived,
    ReadyToShip,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::PendingPayment,
        OrderStatus::Processing,
        OrderStatus::PaymentReceived,
        OrderStatus::ReadyToShip,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::Processing => "processing",
            OrderStatus::PaymentReceived => "payment_received",
            OrderStatus::ReadyToShip => "ready_to_ship",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// The transition table. Adding a status means adding a row here and nowhere else.
    pub const fn allowed_targets(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::PendingPayment => &[OrderStatus::Processing, OrderStatus::Cancelled],
            OrderStatus::Processing => &[
                OrderStatus::PaymentReceived,
                OrderStatus::ReadyToShip,
                OrderStatus::Cancelled,
            ],
            OrderStatus::PaymentReceived => &[OrderStatus::ReadyToShip, OrderStatus::Cancelled],
            OrderStatus::ReadyToShip => &[OrderStatus::Shipped, OrderStatus::Cancelled],
            OrderStatus::Shipped => &[OrderStatus::Delivered],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.allowed_targets().contains(&target)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Settlement state of the order's payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    PartiallyPaid,
    FullyPaid,
    Overpaid,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::PartiallyPaid => "partially_paid",
            PaymentStatus::FullyPaid => "fully_paid",
            PaymentStatus::Overpaid => "overpaid",
        }
    }

    /// True once nothing is left to collect.
    pub const fn is_settled(self) -> bool {
        matches!(self, PaymentStatus::FullyPaid | PaymentStatus::Overpaid)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Money held in minor units (pesewas, cents) so balances never pick up float drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(pub u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_minor(minor_units: u64) -> Self {
        Self(minor_units)
    }

    pub const fn from_major(major_units: u64) -> Self {
        Self(major_units * 100)
    }

    pub const fn minor_units(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Carrier hand-off details captured when the parcel leaves the warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingInfo {
    pub carrier: String,
    pub tracking_number: String,
}

impl TrackingInfo {
    pub fn is_complete(&self) -> bool {
        !self.carrier.trim().is_empty() && !self.tracking_number.trim().is_empty()
    }
}

/// Snapshot whose balance contradicts its payment status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("{payment_status} order cannot carry an outstanding balance of {balance}")]
    BalanceOnSettledOrder {
        payment_status: PaymentStatus,
        balance: Amount,
    },
    #[error("{payment_status} order must carry an outstanding balance")]
    MissingBalance { payment_status: PaymentStatus },
}

/// Read-only view of an order as seen by the guard and blocker resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    /// Set once staff have checked the deposit proof against the bank or mobile money record.
    #[serde(default)]
    pub payment_verified: bool,
    #[serde(default)]
    pub balance_remaining: Amount,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub delivery_address_ref: Option<String>,
    #[serde(default)]
    pub tracking_info: Option<TrackingInfo>,
}

impl OrderSnapshot {
    /// A freshly placed order with nothing paid and no logistics data.
    pub fn new(status: OrderStatus) -> Self {
        Self {
            status,
            payment_status: None,
            payment_verified: false,
            balance_remaining: Amount::ZERO,
            currency: None,
            delivery_address_ref: None,
            tracking_info: None,
        }
    }

    pub fn currency(&self) -> &str {
        self.currency
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
    }

    /// Fill in the currency when the record carries none.
    pub fn with_default_currency(mut self, currency: &str) -> Self {
        let missing = self
            .currency
            .as_deref()
            .map(|code| code.trim().is_empty())
            .unwrap_or(true);
        if missing {
            self.currency = Some(currency.to_string());
        }
        self
    }

    pub fn is_settled(&self) -> bool {
        self.payment_status
            .map(PaymentStatus::is_settled)
            .unwrap_or(false)
    }

    pub fn has_verified_deposit(&self) -> bool {
        self.payment_verified
            && matches!(
                self.payment_status,
                Some(status) if status != PaymentStatus::Unpaid
            )
    }

    pub fn has_delivery_address(&self) -> bool {
        self.delivery_address_ref
            .as_deref()
            .map(|reference| !reference.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn has_tracking_details(&self) -> bool {
        self.tracking_info
            .as_ref()
            .map(TrackingInfo::is_complete)
            .unwrap_or(false)
    }

    /// Check that the balance agrees with the payment status: nothing owed once settled,
    /// something owed while unpaid or partially paid. An unset payment status carries no
    /// constraint.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let Some(payment_status) = self.payment_status else {
            return Ok(());
        };
        let owes = !self.balance_remaining.is_zero();
        if payment_status.is_settled() && owes {
            return Err(SnapshotError::BalanceOnSettledOrder {
                payment_status,
                balance: self.balance_remaining,
            });
        }
        if !payment_status.is_settled() && !owes {
            return Err(SnapshotError::MissingBalance { payment_status });
        }
        Ok(())
    }

    /// Balance formatted with its currency, e.g. `GHS 500.00`.
    pub fn balance_label(&self) -> String {
        format!("{} {}", self.currency(), self.balance_remaining)
    }
}
