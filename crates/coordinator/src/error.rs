use thiserror::Error;

use rentmatch_core::{MatchStatus, OrgId, TransactionId};
use rentmatch_store::StoreError;

/// Errors surfaced by reconciliation and manual-match operations.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The transaction does not exist.
    #[error("transaction not found: {0}")]
    NotFound(TransactionId),

    /// The transaction belongs to a different organization.
    #[error("transaction {transaction} does not belong to organization {org}")]
    Unauthorized {
        transaction: TransactionId,
        org: OrgId,
    },

    /// The transaction left `Unmatched` before this attempt could write;
    /// the first writer won and nothing was changed.
    #[error("transaction {transaction} was already resolved (current status: {current})")]
    Conflict {
        transaction: TransactionId,
        current: MatchStatus,
    },

    /// The caller supplied an unusable request.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An error occurred in a backing store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
