use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::domain::{CustomerId, TrustHistoryEntry, TrustProfile, TrustTier};
use super::repository::{OrderHistorySource, ProfileChange, TrustStore, TrustStoreError};
use super::scoring::{change_reason, ScoringConfig, TrustEvaluation, TrustScoringEngine};
use super::MIN_OVERRIDE_REASON_LEN;
use crate::orders::notice::UserNotice;
use crate::orders::translator::translate_message;

/// Single write path for trust profiles.
///
/// Manual overrides and automatic evaluations for the same customer are serialized through
/// a per-customer lock, so the history log holds exactly one entry per tier or score change.
pub struct TrustOverrideManager<S, H> {
    store: Arc<S>,
    orders: Arc<H>,
    engine: TrustScoringEngine,
    clock: Arc<dyn Clock>,
    locks: CustomerLocks,
    min_reason_len: usize,
}

/// Result of an automatic evaluation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    /// A manual override is active; nothing was computed or written.
    SkippedManualOverride { profile: TrustProfile },
    /// Score and tier matched the stored profile; nothing was written.
    Unchanged {
        profile: TrustProfile,
        evaluation: TrustEvaluation,
    },
    Updated {
        profile: TrustProfile,
        evaluation: TrustEvaluation,
        entry: TrustHistoryEntry,
    },
}

impl EvaluationOutcome {
    pub fn profile(&self) -> &TrustProfile {
        match self {
            EvaluationOutcome::SkippedManualOverride { profile }
            | EvaluationOutcome::Unchanged { profile, .. }
            | EvaluationOutcome::Updated { profile, .. } => profile,
        }
    }
}

/// Result of a successful manual override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideReceipt {
    pub profile: TrustProfile,
    pub entry: TrustHistoryEntry,
    /// Set when the override newly restricts the customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<S, H> TrustOverrideManager<S, H>
where
    S: TrustStore + 'static,
    H: OrderHistorySource + 'static,
{
    pub fn new(
        store: Arc<S>,
        orders: Arc<H>,
        clock: Arc<dyn Clock>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            store,
            orders,
            engine: TrustScoringEngine::new(config),
            clock,
            locks: CustomerLocks::default(),
            min_reason_len: MIN_OVERRIDE_REASON_LEN,
        }
    }

    /// Raise the minimum override reason length. Values below the floor are ignored.
    pub fn with_min_reason_len(mut self, min_reason_len: usize) -> Self {
        self.min_reason_len = min_reason_len.max(MIN_OVERRIDE_REASON_LEN);
        self
    }

    #[cfg(test)]
    pub(crate) fn tracked_customers(&self) -> usize {
        self.locks.len()
    }

    pub fn profile(&self, customer: &CustomerId) -> Result<Option<TrustProfile>, TrustServiceError> {
        Ok(self.store.profile(customer)?)
    }

    pub fn history(
        &self,
        customer: &CustomerId,
    ) -> Result<Vec<TrustHistoryEntry>, TrustServiceError> {
        Ok(self.store.history(customer)?)
    }

    /// Pin a customer's tier by hand. Nothing is written when validation fails.
    pub fn set_override(
        &self,
        customer: &CustomerId,
        tier: TrustTier,
        reason: &str,
    ) -> Result<OverrideReceipt, TrustServiceError> {
        let reason = reason.trim();
        let found = reason.chars().count();
        if found < self.min_reason_len {
            return Err(ValidationError::ReasonTooShort {
                min: self.min_reason_len,
                found,
            }
            .into());
        }

        let lease = self.locks.lease(customer);
        let _serialized = lease.lock();

        let now = self.clock.now();
        let previous = self
            .store
            .profile(customer)?
            .unwrap_or_else(|| TrustProfile::initial(customer.clone(), now));

        let profile = TrustProfile {
            tier,
            manual_override: true,
            override_reason: Some(reason.to_string()),
            last_evaluated_at: now,
            ..previous.clone()
        };
        let entry = TrustHistoryEntry {
            customer_id: customer.clone(),
            previous_tier: previous.tier,
            new_tier: tier,
            previous_score: previous.score,
            new_score: profile.score,
            change_reason: format!("Manual override: {reason}"),
            is_manual_override: true,
            created_at: now,
        };

        self.store.commit(ProfileChange {
            profile: profile.clone(),
            entry: Some(entry.clone()),
        })?;

        let warning = (tier == TrustTier::Restricted && previous.tier != TrustTier::Restricted)
            .then(|| {
                format!(
                    "Customer {customer} is now restricted and limited to upfront-payment-only orders"
                )
            });
        if warning.is_some() {
            warn!(customer = %customer, previous = %previous.tier, "customer manually restricted");
        }
        info!(customer = %customer, from = %previous.tier, to = %tier, "trust override set");

        Ok(OverrideReceipt {
            profile,
            entry,
            warning,
        })
    }

    /// Resume automatic scoring. Tier and score stay put until the next evaluation.
    pub fn clear_override(&self, customer: &CustomerId) -> Result<TrustProfile, TrustServiceError> {
        let lease = self.locks.lease(customer);
        let _serialized = lease.lock();

        let profile = self
            .store
            .profile(customer)?
            .ok_or_else(|| TrustServiceError::ProfileNotFound(customer.clone()))?;

        if !profile.manual_override {
            debug!(customer = %customer, "no override to clear");
            return Ok(profile);
        }

        let profile = TrustProfile {
            manual_override: false,
            override_reason: None,
            ..profile
        };
        self.store.commit(ProfileChange {
            profile: profile.clone(),
            entry: None,
        })?;

        info!(customer = %customer, tier = %profile.tier, "trust override cleared");
        Ok(profile)
    }

    /// Automatic evaluation. Writes only when the score or tier moved, or no profile existed.
    pub fn evaluate(&self, customer: &CustomerId) -> Result<EvaluationOutcome, TrustServiceError> {
        let lease = self.locks.lease(customer);
        let _serialized = lease.lock();

        let existing = self.store.profile(customer)?;
        if let Some(profile) = existing.as_ref().filter(|profile| profile.manual_override) {
            debug!(customer = %customer, tier = %profile.tier, "evaluation skipped under manual override");
            return Ok(EvaluationOutcome::SkippedManualOverride {
                profile: profile.clone(),
            });
        }

        let orders = self.orders.orders_for(customer)?;
        let now = self.clock.now();
        let evaluation = self.engine.evaluate(&orders, now);

        if let Some(profile) = existing.as_ref() {
            if profile.score == evaluation.score && profile.tier == evaluation.tier {
                debug!(customer = %customer, score = evaluation.score, "trust score unchanged");
                return Ok(EvaluationOutcome::Unchanged {
                    profile: profile.clone(),
                    evaluation,
                });
            }
        }

        let previous = existing.unwrap_or_else(|| TrustProfile::initial(customer.clone(), now));
        let profile = TrustProfile {
            score: evaluation.score,
            tier: evaluation.tier,
            manual_override: false,
            override_reason: None,
            last_evaluated_at: now,
            ..previous.clone()
        };
        let entry = TrustHistoryEntry {
            customer_id: customer.clone(),
            previous_tier: previous.tier,
            new_tier: evaluation.tier,
            previous_score: previous.score,
            new_score: evaluation.score,
            change_reason: change_reason(&evaluation.factors, previous.score, evaluation.score),
            is_manual_override: false,
            created_at: now,
        };

        self.store.commit(ProfileChange {
            profile: profile.clone(),
            entry: Some(entry.clone()),
        })?;

        info!(
            customer = %customer,
            from = %previous.tier,
            to = %evaluation.tier,
            score = evaluation.score,
            "trust profile re-evaluated"
        );
        Ok(EvaluationOutcome::Updated {
            profile,
            evaluation,
            entry,
        })
    }
}

/// One mutex per customer; different customers never contend. A slot lives only while some
/// caller holds or awaits it.
#[derive(Default)]
struct CustomerLocks {
    slots: Mutex<HashMap<CustomerId, Arc<Mutex<()>>>>,
}

impl CustomerLocks {
    fn lease<'a>(&'a self, customer: &'a CustomerId) -> SlotLease<'a> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(customer.clone()).or_default().clone();
        SlotLease {
            locks: self,
            customer,
            slot,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Claim on a customer's slot. Dropping the last claim removes the slot from the map.
struct SlotLease<'a> {
    locks: &'a CustomerLocks,
    customer: &'a CustomerId,
    slot: Arc<Mutex<()>>,
}

impl SlotLease<'_> {
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SlotLease<'_> {
    fn drop(&mut self) {
        let mut slots = self
            .locks
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Clones are only taken under the map lock, so the count cannot grow underneath us.
        if Arc::strong_count(&self.slot) == 2 {
            slots.remove(self.customer);
        }
    }
}

/// Malformed input to a mutating trust operation. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("override reason must be at least {min} characters (found {found})")]
    ReasonTooShort { min: usize, found: usize },
}

/// Error raised by the trust override manager.
#[derive(Debug, thiserror::Error)]
pub enum TrustServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no trust profile for customer {0}")]
    ProfileNotFound(CustomerId),
    #[error(transparent)]
    Store(#[from] TrustStoreError),
}

impl TrustServiceError {
    pub fn notice(&self) -> UserNotice {
        match self {
            TrustServiceError::Validation(error) => UserNotice {
                title: "Override Reason Required".to_string(),
                description: error.to_string(),
                action: None,
                action_label: None,
            },
            TrustServiceError::ProfileNotFound(customer) => UserNotice {
                title: "Trust Profile Not Found".to_string(),
                description: format!(
                    "Customer {customer} has not been evaluated yet. Run an evaluation first."
                ),
                action: None,
                action_label: None,
            },
            TrustServiceError::Store(error) => translate_message(&error.to_string()),
        }
    }
}
