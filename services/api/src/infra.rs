use chrono::Utc;
use fulfillment_guard::orders::{
    OrderId, OrderRecord, OrderRepository, OrderRepositoryError, OrderStatus,
};
use fulfillment_guard::trust::{CustomerId, CustomerOrder, OrderHistorySource, TrustStoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) orders: Arc<InMemoryOrderRepository>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryOrderRepository {
    records: Arc<Mutex<HashMap<OrderId, OrderRecord>>>,
}

impl InMemoryOrderRepository {
    /// Add an order as the upstream order store would hold it.
    ///
    /// Registering a known order again may refresh its payment and logistics data but never its
    /// status; status moves only through guarded writes.
    pub(crate) fn register(&self, record: OrderRecord) -> Result<OrderRecord, OrderRepositoryError> {
        let mut guard = self.lock()?;
        let record = match guard.get(&record.id) {
            Some(stored) if stored.snapshot.status != record.snapshot.status => {
                return Err(OrderRepositoryError::StatusConflict {
                    expected: record.snapshot.status,
                    found: stored.snapshot.status,
                });
            }
            Some(stored) => OrderRecord {
                created_at: stored.created_at,
                ..record
            },
            None => record,
        };
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<OrderId, OrderRecord>>, OrderRepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| OrderRepositoryError::Unavailable("order table lock poisoned".to_string()))
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn fetch(&self, id: &OrderId) -> Result<Option<OrderRecord>, OrderRepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn update_status(
        &self,
        id: &OrderId,
        expected: OrderStatus,
        target: OrderStatus,
    ) -> Result<OrderRecord, OrderRepositoryError> {
        let mut guard = self.lock()?;
        let record = guard.get_mut(id).ok_or(OrderRepositoryError::NotFound)?;
        if record.snapshot.status != expected {
            return Err(OrderRepositoryError::StatusConflict {
                expected,
                found: record.snapshot.status,
            });
        }
        record.snapshot.status = target;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    fn for_customer(
        &self,
        customer: &CustomerId,
    ) -> Result<Vec<OrderRecord>, OrderRepositoryError> {
        let guard = self.lock()?;
        let mut records: Vec<OrderRecord> = guard
            .values()
            .filter(|record| &record.customer_id == customer)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }
}

/// Feeds the trust engine from the same order table the guard writes to.
#[derive(Clone)]
pub(crate) struct OrderTableHistory {
    orders: Arc<InMemoryOrderRepository>,
}

impl OrderTableHistory {
    pub(crate) fn new(orders: Arc<InMemoryOrderRepository>) -> Self {
        Self { orders }
    }
}

impl OrderHistorySource for OrderTableHistory {
    fn orders_for(&self, customer: &CustomerId) -> Result<Vec<CustomerOrder>, TrustStoreError> {
        let records = self
            .orders
            .for_customer(customer)
            .map_err(|error| TrustStoreError::Unavailable(error.to_string()))?;
        Ok(records.iter().map(customer_order).collect())
    }
}

fn customer_order(record: &OrderRecord) -> CustomerOrder {
    let snapshot = &record.snapshot;
    CustomerOrder {
        status: snapshot.status,
        created_at: record.created_at,
        total_amount: record.total_amount,
        // Only open orders can be stuck in payment.
        had_pending_or_unverified_payment: !snapshot.status.is_terminal()
            && (snapshot.status == OrderStatus::PendingPayment || !snapshot.payment_verified),
        had_delivery_failure_or_cancellation: snapshot.status == OrderStatus::Cancelled,
    }
}
