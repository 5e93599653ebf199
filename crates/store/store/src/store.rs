use async_trait::async_trait;
use chrono::{DateTime, Utc};

use rentmatch_core::{MatchDecision, MatchStatus, OrgId, Rule, RuleId, Transaction, TransactionId};

use crate::error::StoreError;

/// Result of a guarded status transition on a transaction.
#[derive(Debug, Clone)]
pub enum TransitionResult {
    /// The transition was applied; carries the updated record.
    Applied(Transaction),
    /// The transaction had already left `Unmatched`; nothing was written.
    Conflict { current: MatchStatus },
}

/// Trait for persisting bank transactions.
///
/// Implementations must be `Send + Sync` and safe for concurrent access.
/// `apply_decision` is the only mutation this engine performs on a
/// transaction, and it must be atomic per record.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Insert a transaction as delivered by the ingestion feed.
    async fn insert(&self, txn: Transaction) -> Result<(), StoreError>;

    /// Fetch a transaction by id. Returns `None` if absent.
    async fn get(&self, id: &TransactionId) -> Result<Option<Transaction>, StoreError>;

    /// Apply a match decision, guarded by the precondition
    /// `status == Unmatched`.
    ///
    /// On success the decision's status, tenant, lease, category and
    /// confidence are written together with `matched_at` and
    /// `matched_by` in one atomic update. If the transaction already
    /// left `Unmatched` the call returns [`TransitionResult::Conflict`]
    /// and writes nothing: the first writer wins.
    async fn apply_decision(
        &self,
        id: &TransactionId,
        decision: &MatchDecision,
        matched_by: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<TransitionResult, StoreError>;
}

/// Trait for the per-organization rule corpus.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Persist a new rule, assigning its insertion position.
    ///
    /// Rules with an empty condition list are rejected with
    /// [`StoreError::Integrity`]; they would otherwise be skipped by
    /// every evaluation pass.
    async fn create(&self, rule: Rule) -> Result<Rule, StoreError>;

    /// Fetch a rule by id. Returns `None` if absent.
    async fn get(&self, id: &RuleId) -> Result<Option<Rule>, StoreError>;

    /// List the organization's active rules in evaluation order:
    /// explicit priority, then insertion position, then rule id.
    async fn list_active(&self, org: &OrgId) -> Result<Vec<Rule>, StoreError>;

    /// Atomically increment a rule's usage counter and set its
    /// last-triggered timestamp.
    ///
    /// Increments are commutative; concurrent callers must never lose
    /// updates, so implementations perform the add-and-set inside the
    /// store rather than expecting a caller-side read-modify-write.
    async fn record_trigger(&self, id: &RuleId, at: DateTime<Utc>) -> Result<(), StoreError>;
}
