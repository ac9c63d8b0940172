use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::FulfillmentConfig;
use crate::orders::domain::{
    Amount, OrderId, OrderSnapshot, OrderStatus, PaymentStatus, TrackingInfo,
};
use crate::orders::repository::{OrderRecord, OrderRepository, OrderRepositoryError};
use crate::orders::translator::BackendFailure;
use crate::orders::{order_router, OrderFulfillmentService};
use crate::trust::domain::CustomerId;

pub(super) fn placed_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn order(status: OrderStatus) -> OrderSnapshot {
    OrderSnapshot::new(status)
}

pub(super) fn partially_paid(status: OrderStatus, balance: Amount) -> OrderSnapshot {
    OrderSnapshot {
        payment_status: Some(PaymentStatus::PartiallyPaid),
        payment_verified: true,
        balance_remaining: balance,
        currency: Some("GHS".to_string()),
        delivery_address_ref: Some("addr-123".to_string()),
        ..OrderSnapshot::new(status)
    }
}

/// Fully paid, verified, addressed and tracked: every precondition holds.
pub(super) fn ready_order(status: OrderStatus) -> OrderSnapshot {
    OrderSnapshot {
        payment_status: Some(PaymentStatus::FullyPaid),
        payment_verified: true,
        balance_remaining: Amount::ZERO,
        currency: Some("GHS".to_string()),
        delivery_address_ref: Some("addr-123".to_string()),
        tracking_info: Some(TrackingInfo {
            carrier: "DHL".to_string(),
            tracking_number: "GH-4471-XQ".to_string(),
        }),
        ..OrderSnapshot::new(status)
    }
}

pub(super) fn record(id: &str, snapshot: OrderSnapshot) -> OrderRecord {
    OrderRecord {
        id: OrderId(id.to_string()),
        customer_id: CustomerId("cust-001".to_string()),
        snapshot,
        total_amount: Amount::from_major(1_200),
        created_at: placed_at(),
        updated_at: placed_at(),
    }
}

pub(super) fn fulfillment_config() -> FulfillmentConfig {
    FulfillmentConfig::default()
}

pub(super) fn build_service(
    records: Vec<OrderRecord>,
) -> (
    OrderFulfillmentService<MemoryOrderRepository>,
    Arc<MemoryOrderRepository>,
) {
    let repository = Arc::new(MemoryOrderRepository::with_records(records));
    let service = OrderFulfillmentService::new(repository.clone(), &fulfillment_config());
    (service, repository)
}

pub(super) fn router_with_records(records: Vec<OrderRecord>) -> axum::Router {
    let (service, _) = build_service(records);
    order_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryOrderRepository {
    pub(super) records: Arc<Mutex<HashMap<OrderId, OrderRecord>>>,
}

impl MemoryOrderRepository {
    pub(super) fn with_records(records: Vec<OrderRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            records: Arc::new(Mutex::new(map)),
        }
    }

    /// Simulate another actor changing the status behind the service's back.
    pub(super) fn force_status(&self, id: &str, status: OrderStatus) {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if let Some(record) = guard.get_mut(&OrderId(id.to_string())) {
            record.snapshot.status = status;
        }
    }

    pub(super) fn status_of(&self, id: &str) -> Option<OrderStatus> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .get(&OrderId(id.to_string()))
            .map(|record| record.snapshot.status)
    }
}

impl OrderRepository for MemoryOrderRepository {
    fn fetch(&self, id: &OrderId) -> Result<Option<OrderRecord>, OrderRepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update_status(
        &self,
        id: &OrderId,
        expected: OrderStatus,
        target: OrderStatus,
    ) -> Result<OrderRecord, OrderRepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(OrderRepositoryError::NotFound)?;
        if record.snapshot.status != expected {
            return Err(OrderRepositoryError::StatusConflict {
                expected,
                found: record.snapshot.status,
            });
        }
        record.snapshot.status = target;
        Ok(record.clone())
    }

    fn for_customer(
        &self,
        customer: &CustomerId,
    ) -> Result<Vec<OrderRecord>, OrderRepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.customer_id == customer)
            .cloned()
            .collect())
    }
}

/// Store whose invariant trigger rejects every write with a fixed message.
pub(super) struct RejectingRepository {
    pub(super) record: OrderRecord,
    pub(super) message: &'static str,
}

impl OrderRepository for RejectingRepository {
    fn fetch(&self, _id: &OrderId) -> Result<Option<OrderRecord>, OrderRepositoryError> {
        Ok(Some(self.record.clone()))
    }

    fn update_status(
        &self,
        _id: &OrderId,
        _expected: OrderStatus,
        _target: OrderStatus,
    ) -> Result<OrderRecord, OrderRepositoryError> {
        Err(OrderRepositoryError::Rejected(BackendFailure::new(
            self.message,
        )))
    }

    fn for_customer(
        &self,
        _customer: &CustomerId,
    ) -> Result<Vec<OrderRecord>, OrderRepositoryError> {
        Ok(vec![self.record.clone()])
    }
}

pub(super) struct UnavailableRepository;

impl OrderRepository for UnavailableRepository {
    fn fetch(&self, _id: &OrderId) -> Result<Option<OrderRecord>, OrderRepositoryError> {
        Err(OrderRepositoryError::Unavailable(
            "database offline".to_string(),
        ))
    }

    fn update_status(
        &self,
        _id: &OrderId,
        _expected: OrderStatus,
        _target: OrderStatus,
    ) -> Result<OrderRecord, OrderRepositoryError> {
        Err(OrderRepositoryError::Unavailable(
            "database offline".to_string(),
        ))
    }

    fn for_customer(
        &self,
        _customer: &CustomerId,
    ) -> Result<Vec<OrderRecord>, OrderRepositoryError> {
        Err(OrderRepositoryError::Unavailable(
            "database offline".to_string(),
        ))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
