use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::orders::domain::{Amount, OrderStatus};

/// Score given to a profile created before any evaluation has run.
pub const DEFAULT_TRUST_SCORE: u8 = 50;

/// Identifier wrapper for customers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub String);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discrete trust level driving credit terms and loyalty benefits downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustTier {
    New,
    Verified,
    Trusted,
    Preferred,
    Restricted,
}

impl TrustTier {
    pub const fn label(self) -> &'static str {
        match self {
            TrustTier::New => "new",
            TrustTier::Verified => "verified",
            TrustTier::Trusted => "trusted",
            TrustTier::Preferred => "preferred",
            TrustTier::Restricted => "restricted",
        }
    }

    /// Restricted customers may only place orders paid in full upfront.
    pub const fn requires_upfront_payment(self) -> bool {
        matches!(self, TrustTier::Restricted)
    }
}

impl fmt::Display for TrustTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current trust standing of one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustProfile {
    pub customer_id: CustomerId,
    pub score: u8,
    pub tier: TrustTier,
    /// While set, automatic evaluation leaves `tier` and `score` alone.
    pub manual_override: bool,
    pub override_reason: Option<String>,
    pub last_evaluated_at: DateTime<Utc>,
}

impl TrustProfile {
    /// The lazily created starting point for a customer never evaluated before.
    pub fn initial(customer_id: CustomerId, now: DateTime<Utc>) -> Self {
        Self {
            customer_id,
            score: DEFAULT_TRUST_SCORE,
            tier: TrustTier::New,
            manual_override: false,
            override_reason: None,
            last_evaluated_at: now,
        }
    }
}

/// Append-only audit record of one tier or score change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustHistoryEntry {
    pub customer_id: CustomerId,
    pub previous_tier: TrustTier,
    pub new_tier: TrustTier,
    pub previous_score: u8,
    pub new_score: u8,
    pub change_reason: String,
    pub is_manual_override: bool,
    pub created_at: DateTime<Utc>,
}

/// Read-only view of one past order, as the scoring engine consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerOrder {
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub total_amount: Amount,
    pub had_pending_or_unverified_payment: bool,
    pub had_delivery_failure_or_cancellation: bool,
}

impl CustomerOrder {
    /// Cancelled orders count as issues even when the flag was not recorded.
    pub fn had_issue(&self) -> bool {
        self.had_delivery_failure_or_cancellation || self.status == OrderStatus::Cancelled
    }
}
