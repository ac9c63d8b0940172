use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::domain::{CustomerId, TrustHistoryEntry, TrustProfile};
use super::repository::{ProfileChange, TrustStore, TrustStoreError};

#[derive(Debug, Default, Clone)]
struct CustomerLedger {
    profile: Option<TrustProfile>,
    history: Vec<TrustHistoryEntry>,
}

/// In-process trust store. A single lock covers profile and history, so a commit is atomic.
#[derive(Debug, Default)]
pub struct InMemoryTrustStore {
    ledgers: Mutex<HashMap<CustomerId, CustomerLedger>>,
}

impl InMemoryTrustStore {
    fn ledgers(&self) -> Result<MutexGuard<'_, HashMap<CustomerId, CustomerLedger>>, TrustStoreError> {
        self.ledgers
            .lock()
            .map_err(|_| TrustStoreError::Unavailable("trust store lock poisoned".to_string()))
    }
}

impl TrustStore for InMemoryTrustStore {
    fn profile(&self, customer: &CustomerId) -> Result<Option<TrustProfile>, TrustStoreError> {
        let ledgers = self.ledgers()?;
        Ok(ledgers
            .get(customer)
            .and_then(|ledger| ledger.profile.clone()))
    }

    fn commit(&self, change: ProfileChange) -> Result<(), TrustStoreError> {
        let ProfileChange { profile, entry } = change;
        if let Some(entry) = &entry {
            let consistent = entry.customer_id == profile.customer_id
                && entry.new_tier == profile.tier
                && entry.new_score == profile.score;
            if !consistent {
                return Err(TrustStoreError::MismatchedEntry(profile.customer_id));
            }
        }

        let mut ledgers = self.ledgers()?;
        let ledger = ledgers.entry(profile.customer_id.clone()).or_default();
        ledger.profile = Some(profile);
        ledger.history.extend(entry);
        Ok(())
    }

    fn history(&self, customer: &CustomerId) -> Result<Vec<TrustHistoryEntry>, TrustStoreError> {
        let ledgers = self.ledgers()?;
        Ok(ledgers
            .get(customer)
            .map(|ledger| ledger.history.clone())
            .unwrap_or_default())
    }
}
