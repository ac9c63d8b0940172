//! Order lifecycle guard: transition table, blocker summaries, and failure translation.
//!
//! Everything except [`service`] and [`router`] is pure and safe to call repeatedly.

pub mod blockers;
pub mod domain;
pub mod guard;
pub mod notice;
pub mod repository;
pub mod router;
pub mod service;
pub mod translator;

#[cfg(test)]
mod tests;

pub use blockers::{blocker_reason, resolve_blocker, OrderBlocker};
pub use domain::{
    Amount, OrderId, OrderSnapshot, OrderStatus, PaymentStatus, SnapshotError, TrackingInfo,
    DEFAULT_CURRENCY,
};
pub use guard::{
    available_transitions, can_proceed_to_shipping, check_transition, TransitionCheck,
    UnmetCondition,
};
pub use notice::{NoticeAction, UserNotice};
pub use repository::{OrderRecord, OrderRepository, OrderRepositoryError};
pub use router::order_router;
pub use service::{FulfillmentError, OrderFulfillmentService, TransitionOutcome};
pub use translator::{translate_failure, translate_message, BackendFailure};
