use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use rentmatch_core::{
    Condition, LeaseId, MatchDecision, OrgId, Rule, TenantId, Transaction, TransactionId,
};
use rentmatch_rules::MatchEngine;
use rentmatch_store::{RuleStore, TransactionStore, TransitionResult};

use crate::builder::CoordinatorBuilder;
use crate::error::CoordinatorError;
use crate::metrics::CoordinatorMetrics;
use crate::report::{BatchError, ReconciliationReport};
use crate::synthesize::synthesize;

/// What a manual correction assigns to a transaction.
///
/// At least one of `tenant` or `category` must be set. A lease is only
/// meaningful together with a tenant.
#[derive(Debug, Clone, Default)]
pub struct ManualTarget {
    pub tenant: Option<TenantId>,
    pub lease: Option<LeaseId>,
    pub category: Option<String>,
}

impl ManualTarget {
    /// Assign the transaction to a tenant and, optionally, a lease.
    #[must_use]
    pub fn tenant(tenant: TenantId, lease: Option<LeaseId>) -> Self {
        Self {
            tenant: Some(tenant),
            lease,
            category: None,
        }
    }

    /// Book the transaction under a category.
    #[must_use]
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            tenant: None,
            lease: None,
            category: Some(category.into()),
        }
    }

    fn is_empty(&self) -> bool {
        self.tenant.is_none() && self.category.is_none()
    }
}

/// Whether and how a manual match should produce a learned rule.
#[derive(Debug, Clone, Default)]
pub struct RuleLearning {
    /// Learn a rule from this correction.
    pub create_rule: bool,
    /// Conditions for the learned rule, chosen by the caller.
    pub conditions: Vec<Condition>,
}

impl RuleLearning {
    /// Do not learn a rule from this correction.
    #[must_use]
    pub fn off() -> Self {
        Self::default()
    }

    /// Learn a rule with the given conditions.
    #[must_use]
    pub fn with_conditions(conditions: Vec<Condition>) -> Self {
        Self {
            create_rule: true,
            conditions,
        }
    }
}

/// The result of an applied manual match.
#[derive(Debug)]
pub struct ManualMatchOutcome {
    /// The transaction in its post-transition state.
    pub transaction: Transaction,
    /// The learned rule, when synthesis was requested and succeeded.
    pub learned_rule: Option<Rule>,
}

/// Drives reconciliation over the transaction and rule stores.
///
/// The coordinator owns the workflow glue: it loads rule snapshots,
/// runs the match engine, applies status transitions, and records rule
/// usage. Stores race freely underneath it; every transition goes
/// through the store's compare-and-set, so a transaction resolves at
/// most once no matter how many batches or operators touch it.
pub struct ReconciliationCoordinator {
    transactions: Arc<dyn TransactionStore>,
    rules: Arc<dyn RuleStore>,
    metrics: Arc<CoordinatorMetrics>,
}

impl fmt::Debug for ReconciliationCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconciliationCoordinator")
            .finish_non_exhaustive()
    }
}

impl ReconciliationCoordinator {
    /// Start building a coordinator.
    #[must_use]
    pub fn builder() -> CoordinatorBuilder {
        CoordinatorBuilder::new()
    }

    pub(crate) fn from_parts(
        transactions: Arc<dyn TransactionStore>,
        rules: Arc<dyn RuleStore>,
        metrics: Arc<CoordinatorMetrics>,
    ) -> Self {
        Self {
            transactions,
            rules,
            metrics,
        }
    }

    /// Metrics handle for this coordinator.
    #[must_use]
    pub fn metrics(&self) -> &CoordinatorMetrics {
        &self.metrics
    }

    /// Reconcile a batch of transactions against the organization's rules.
    ///
    /// The rule snapshot is loaded once, so every transaction in the
    /// batch sees the same rules. Failures are isolated per transaction
    /// and collected in the report; the only hard error is failing to
    /// load the snapshot itself.
    #[instrument(skip_all, fields(org = %org, batch = ids.len()))]
    pub async fn reconcile_batch(
        &self,
        org: &OrgId,
        ids: &[TransactionId],
    ) -> Result<ReconciliationReport, CoordinatorError> {
        let snapshot = self.rules.list_active(org).await?;
        let engine = MatchEngine::new(snapshot);
        debug!(rules = engine.rule_count(), "loaded rule snapshot");

        let mut report = ReconciliationReport::default();
        for id in ids {
            self.reconcile_one(org, id, &engine, &mut report).await;
        }

        info!(
            resolved = report.resolved.len(),
            unresolved = report.unresolved.len(),
            skipped = report.skipped.len(),
            errors = report.errors.len(),
            "batch reconciliation finished"
        );
        Ok(report)
    }

    async fn reconcile_one(
        &self,
        org: &OrgId,
        id: &TransactionId,
        engine: &MatchEngine,
        report: &mut ReconciliationReport,
    ) {
        let txn = match self.load_owned(org, id).await {
            Ok(txn) => txn,
            Err(error) => {
                self.metrics.record_batch_error();
                report.errors.push(BatchError {
                    transaction: id.clone(),
                    error,
                });
                return;
            }
        };

        if !txn.status.is_unmatched() {
            debug!(txn = %id, status = %txn.status, "already resolved, skipping");
            self.metrics.record_skipped();
            report.skipped.push(id.clone());
            return;
        }

        self.metrics.record_evaluated();
        let outcome = engine.evaluate(&txn);
        report.warnings.extend(outcome.warnings);

        if !outcome.decision.is_resolved() {
            self.metrics.record_unresolved();
            report.unresolved.push(id.clone());
            return;
        }

        match self
            .transactions
            .apply_decision(id, &outcome.decision, None, Utc::now())
            .await
        {
            Ok(TransitionResult::Applied(updated)) => {
                self.metrics.record_auto_matched();
                if let Some(rule) = &outcome.decision.rule {
                    // Usage is recorded only for applied decisions. A
                    // failed recording leaves the match in place.
                    if let Err(error) = self.rules.record_trigger(rule, Utc::now()).await {
                        warn!(rule = %rule, %error, "failed to record rule trigger");
                    }
                }
                report.resolved.push(updated);
            }
            Ok(TransitionResult::Conflict { current }) => {
                // A concurrent writer resolved this transaction between
                // our read and the transition. Their match stands.
                self.metrics.record_conflict();
                self.metrics.record_batch_error();
                report.errors.push(BatchError {
                    transaction: id.clone(),
                    error: CoordinatorError::Conflict {
                        transaction: id.clone(),
                        current,
                    },
                });
            }
            Err(error) => {
                self.metrics.record_batch_error();
                report.errors.push(BatchError {
                    transaction: id.clone(),
                    error: error.into(),
                });
            }
        }
    }

    /// Apply a manual match and, optionally, learn a rule from it.
    ///
    /// The transition itself is mandatory; rule synthesis is best-effort
    /// and never rolls back or fails an applied match.
    #[instrument(skip_all, fields(org = %org, txn = %id, actor = %actor))]
    pub async fn apply_manual_match(
        &self,
        org: &OrgId,
        id: &TransactionId,
        target: ManualTarget,
        learning: RuleLearning,
        actor: &str,
    ) -> Result<ManualMatchOutcome, CoordinatorError> {
        if target.is_empty() {
            return Err(CoordinatorError::InvalidInput(
                "manual target assigns neither a tenant nor a category".into(),
            ));
        }

        let txn = self.load_owned(org, id).await?;
        if !txn.status.is_unmatched() {
            return Err(CoordinatorError::Conflict {
                transaction: id.clone(),
                current: txn.status,
            });
        }

        let decision = MatchDecision::manual(
            target.tenant.clone(),
            target.lease.clone(),
            target.category.clone(),
        );
        let updated = match self
            .transactions
            .apply_decision(id, &decision, Some(actor), Utc::now())
            .await?
        {
            TransitionResult::Applied(updated) => updated,
            TransitionResult::Conflict { current } => {
                self.metrics.record_conflict();
                return Err(CoordinatorError::Conflict {
                    transaction: id.clone(),
                    current,
                });
            }
        };
        self.metrics.record_manual_match();
        info!(txn = %id, "manual match applied");

        let learned_rule = if learning.create_rule && !learning.conditions.is_empty() {
            self.learn_rule(org, &updated, learning.conditions, &target)
                .await
        } else {
            None
        };

        Ok(ManualMatchOutcome {
            transaction: updated,
            learned_rule,
        })
    }

    async fn learn_rule(
        &self,
        org: &OrgId,
        txn: &Transaction,
        conditions: Vec<Condition>,
        target: &ManualTarget,
    ) -> Option<Rule> {
        let rule = match synthesize(org, txn, conditions, target, Utc::now()) {
            Ok(rule) => rule,
            Err(error) => {
                warn!(txn = %txn.id, %error, "rule synthesis failed");
                return None;
            }
        };
        match self.rules.create(rule).await {
            Ok(created) => {
                self.metrics.record_rule_learned();
                info!(rule = %created.id, txn = %txn.id, "learned rule from manual match");
                Some(created)
            }
            Err(error) => {
                warn!(txn = %txn.id, %error, "failed to store learned rule");
                None
            }
        }
    }

    async fn load_owned(
        &self,
        org: &OrgId,
        id: &TransactionId,
    ) -> Result<Transaction, CoordinatorError> {
        let Some(txn) = self.transactions.get(id).await? else {
            return Err(CoordinatorError::NotFound(id.clone()));
        };
        if &txn.org != org {
            return Err(CoordinatorError::Unauthorized {
                transaction: id.clone(),
                org: org.clone(),
            });
        }
        Ok(txn)
    }
}
