use std::sync::Arc;

use rentmatch_store::{RuleStore, TransactionStore};

use crate::coordinator::ReconciliationCoordinator;
use crate::error::CoordinatorError;
use crate::metrics::CoordinatorMetrics;

/// Builder for [`ReconciliationCoordinator`].
///
/// Both stores are required; [`build`](Self::build) fails without them.
#[derive(Default)]
pub struct CoordinatorBuilder {
    transactions: Option<Arc<dyn TransactionStore>>,
    rules: Option<Arc<dyn RuleStore>>,
    metrics: Option<Arc<CoordinatorMetrics>>,
}

impl CoordinatorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transaction store.
    #[must_use]
    pub fn with_transaction_store(mut self, store: Arc<dyn TransactionStore>) -> Self {
        self.transactions = Some(store);
        self
    }

    /// Set the rule store.
    #[must_use]
    pub fn with_rule_store(mut self, store: Arc<dyn RuleStore>) -> Self {
        self.rules = Some(store);
        self
    }

    /// Share an existing metrics handle instead of creating a fresh one.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<CoordinatorMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the coordinator.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::InvalidInput`] if either store is
    /// missing.
    pub fn build(self) -> Result<ReconciliationCoordinator, CoordinatorError> {
        let transactions = self.transactions.ok_or_else(|| {
            CoordinatorError::InvalidInput("transaction store is required".into())
        })?;
        let rules = self
            .rules
            .ok_or_else(|| CoordinatorError::InvalidInput("rule store is required".into()))?;
        let metrics = self.metrics.unwrap_or_default();
        Ok(ReconciliationCoordinator::from_parts(
            transactions,
            rules,
            metrics,
        ))
    }
}

#[cfg(test)]
mod tests {
    use rentmatch_store_memory::{MemoryRuleStore, MemoryTransactionStore};

    use super::*;

    #[test]
    fn build_with_both_stores() {
        let built = CoordinatorBuilder::new()
            .with_transaction_store(Arc::new(MemoryTransactionStore::new()))
            .with_rule_store(Arc::new(MemoryRuleStore::new()))
            .build();
        assert!(built.is_ok());
    }

    #[test]
    fn build_without_transaction_store_fails() {
        let built = CoordinatorBuilder::new()
            .with_rule_store(Arc::new(MemoryRuleStore::new()))
            .build();
        assert!(matches!(built, Err(CoordinatorError::InvalidInput(_))));
    }

    #[test]
    fn build_without_rule_store_fails() {
        let built = CoordinatorBuilder::new()
            .with_transaction_store(Arc::new(MemoryTransactionStore::new()))
            .build();
        assert!(matches!(built, Err(CoordinatorError::InvalidInput(_))));
    }
}
