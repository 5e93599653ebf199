use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use rentmatch_core::{MatchDecision, Transaction, TransactionId};
use rentmatch_store::{StoreError, TransactionStore, TransitionResult};

/// In-memory [`TransactionStore`] backed by a [`DashMap`].
///
/// `apply_decision` mutates under the map's per-entry guard, so the
/// status precondition check and the field writes form one atomic step.
/// The async trait methods return immediately.
#[derive(Debug, Default)]
pub struct MemoryTransactionStore {
    data: DashMap<TransactionId, Transaction>,
}

impl MemoryTransactionStore {
    /// Create a new, empty in-memory transaction store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored transactions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the store holds no transactions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn insert(&self, txn: Transaction) -> Result<(), StoreError> {
        self.data.insert(txn.id.clone(), txn);
        Ok(())
    }

    async fn get(&self, id: &TransactionId) -> Result<Option<Transaction>, StoreError> {
        Ok(self.data.get(id).map(|entry| entry.value().clone()))
    }

    async fn apply_decision(
        &self,
        id: &TransactionId,
        decision: &MatchDecision,
        matched_by: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<TransitionResult, StoreError> {
        let Some(mut entry) = self.data.get_mut(id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };

        if !entry.status.is_unmatched() {
            return Ok(TransitionResult::Conflict {
                current: entry.status,
            });
        }

        entry.status = decision.status;
        entry.matched_tenant = decision.tenant.clone();
        entry.matched_lease = decision.lease.clone();
        entry.category = decision.category.clone();
        entry.confidence = decision.confidence;
        entry.matched_at = Some(at);
        entry.matched_by = matched_by.map(str::to_owned);

        Ok(TransitionResult::Applied(entry.value().clone()))
    }
}
