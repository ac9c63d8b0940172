//! Customer trust-tier scoring with audited manual overrides.
//!
//! [`TrustOverrideManager`] is the only component that writes profiles. Both the automatic
//! path and the manual path go through it, so each tier or score change lands together with
//! exactly one [`TrustHistoryEntry`].

pub mod clock;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

/// Shortest accepted manual override reason, in characters.
pub const MIN_OVERRIDE_REASON_LEN: usize = 10;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    CustomerId, CustomerOrder, TrustHistoryEntry, TrustProfile, TrustTier, DEFAULT_TRUST_SCORE,
};
pub use repository::{OrderHistorySource, ProfileChange, TrustStore, TrustStoreError};
pub use router::trust_router;
pub use scoring::{
    FactorKind, ScoreFactor, ScoringConfig, TierCutoffs, TrustEvaluation, TrustScoringEngine,
};
pub use service::{
    EvaluationOutcome, OverrideReceipt, TrustOverrideManager, TrustServiceError, ValidationError,
};
pub use store::InMemoryTrustStore;
