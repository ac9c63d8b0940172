use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::orders::domain::{Amount, OrderStatus};
use crate::trust::clock::FixedClock;
use crate::trust::domain::{CustomerId, CustomerOrder, TrustHistoryEntry, TrustProfile};
use crate::trust::repository::{OrderHistorySource, ProfileChange, TrustStore, TrustStoreError};
use crate::trust::scoring::{ScoringConfig, TrustScoringEngine};
use crate::trust::store::InMemoryTrustStore;
use crate::trust::TrustOverrideManager;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn customer(id: &str) -> CustomerId {
    CustomerId(id.to_string())
}

/// A clean, delivered order placed `days_ago` days before [`now`].
pub(super) fn delivered(days_ago: i64) -> CustomerOrder {
    CustomerOrder {
        status: OrderStatus::Delivered,
        created_at: now() - Duration::days(days_ago),
        total_amount: Amount::from_major(250),
        had_pending_or_unverified_payment: false,
        had_delivery_failure_or_cancellation: false,
    }
}

pub(super) fn stuck_payment(days_ago: i64) -> CustomerOrder {
    CustomerOrder {
        status: OrderStatus::PendingPayment,
        had_pending_or_unverified_payment: true,
        ..delivered(days_ago)
    }
}

pub(super) fn cancelled(days_ago: i64) -> CustomerOrder {
    CustomerOrder {
        status: OrderStatus::Cancelled,
        had_delivery_failure_or_cancellation: true,
        ..delivered(days_ago)
    }
}

pub(super) fn engine() -> TrustScoringEngine {
    TrustScoringEngine::new(ScoringConfig::default())
}

pub(super) type MemoryManager = TrustOverrideManager<InMemoryTrustStore, MemoryOrderHistory>;

pub(super) fn build_manager() -> (
    MemoryManager,
    Arc<InMemoryTrustStore>,
    Arc<MemoryOrderHistory>,
    Arc<FixedClock>,
) {
    let store = Arc::new(InMemoryTrustStore::default());
    let history = Arc::new(MemoryOrderHistory::default());
    let clock = Arc::new(FixedClock::new(now()));
    let manager = TrustOverrideManager::new(
        store.clone(),
        history.clone(),
        clock.clone(),
        ScoringConfig::default(),
    );
    (manager, store, history, clock)
}

#[derive(Default, Clone)]
pub(super) struct MemoryOrderHistory {
    orders: Arc<Mutex<HashMap<CustomerId, Vec<CustomerOrder>>>>,
}

impl MemoryOrderHistory {
    pub(super) fn set(&self, customer: &CustomerId, orders: Vec<CustomerOrder>) {
        self.orders
            .lock()
            .expect("history mutex poisoned")
            .insert(customer.clone(), orders);
    }
}

impl OrderHistorySource for MemoryOrderHistory {
    fn orders_for(&self, customer: &CustomerId) -> Result<Vec<CustomerOrder>, TrustStoreError> {
        let guard = self.orders.lock().expect("history mutex poisoned");
        Ok(guard.get(customer).cloned().unwrap_or_default())
    }
}

/// Store that reads fine but refuses every commit.
#[derive(Default)]
pub(super) struct ReadOnlyStore {
    pub(super) inner: InMemoryTrustStore,
}

impl TrustStore for ReadOnlyStore {
    fn profile(&self, customer: &CustomerId) -> Result<Option<TrustProfile>, TrustStoreError> {
        self.inner.profile(customer)
    }

    fn commit(&self, _change: ProfileChange) -> Result<(), TrustStoreError> {
        Err(TrustStoreError::Unavailable("read only replica".to_string()))
    }

    fn history(&self, customer: &CustomerId) -> Result<Vec<TrustHistoryEntry>, TrustStoreError> {
        self.inner.history(customer)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
