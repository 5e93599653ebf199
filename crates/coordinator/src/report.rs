use rentmatch_core::{Transaction, TransactionId};
use rentmatch_rules::IntegrityWarning;

use crate::error::CoordinatorError;

/// A per-transaction failure inside a batch run.
///
/// Batch runs isolate failures: one bad entry never aborts the rest of
/// the batch, it lands here instead.
#[derive(Debug)]
pub struct BatchError {
    pub transaction: TransactionId,
    pub error: CoordinatorError,
}

/// The outcome of one batch reconciliation run.
#[derive(Debug, Default)]
pub struct ReconciliationReport {
    /// Transactions resolved by an applied auto-match, in their
    /// post-transition state.
    pub resolved: Vec<Transaction>,
    /// Transactions evaluated but left unmatched.
    pub unresolved: Vec<TransactionId>,
    /// Transactions skipped because they were already resolved.
    pub skipped: Vec<TransactionId>,
    /// Per-transaction failures.
    pub errors: Vec<BatchError>,
    /// Rule-integrity defects observed during evaluation.
    pub warnings: Vec<IntegrityWarning>,
}

impl ReconciliationReport {
    /// Number of transactions resolved by this run.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    /// Returns `true` if the run saw no errors and no warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}
