use serde::{Deserialize, Serialize};

use super::domain::{CustomerId, CustomerOrder, TrustHistoryEntry, TrustProfile};

/// Profile write plus the history entry that must land with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileChange {
    pub profile: TrustProfile,
    pub entry: Option<TrustHistoryEntry>,
}

/// Storage for trust profiles and their append-only history.
pub trait TrustStore: Send + Sync {
    fn profile(&self, customer: &CustomerId) -> Result<Option<TrustProfile>, TrustStoreError>;

    /// Persist the profile and, when present, append its history entry as one unit: both
    /// succeed or neither is visible.
    fn commit(&self, change: ProfileChange) -> Result<(), TrustStoreError>;

    /// History for one customer, oldest first.
    fn history(&self, customer: &CustomerId) -> Result<Vec<TrustHistoryEntry>, TrustStoreError>;
}

/// Read access to a customer's past orders.
pub trait OrderHistorySource: Send + Sync {
    fn orders_for(&self, customer: &CustomerId) -> Result<Vec<CustomerOrder>, TrustStoreError>;
}

/// Error enumeration for trust storage failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrustStoreError {
    #[error("history entry does not match profile for customer {0}")]
    MismatchedEntry(CustomerId),
    #[error("trust store unavailable: {0}")]
    Unavailable(String),
}
