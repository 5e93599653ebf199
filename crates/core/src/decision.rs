use serde::{Deserialize, Serialize};

use crate::rule::{Rule, RuleAction};
use crate::transaction::MatchStatus;
use crate::types::{LeaseId, RuleId, TenantId};

/// The outcome of evaluating one transaction against a rule snapshot.
///
/// A decision is ephemeral: it is never persisted and only feeds the
/// status transition on the transaction record. Confidence is binary —
/// 1.0 for any full or manual match, 0.0 otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDecision {
    /// The rule that produced the match, if any.
    pub rule: Option<RuleId>,

    /// Resulting transaction status.
    pub status: MatchStatus,

    /// Tenant assigned by the match.
    pub tenant: Option<TenantId>,

    /// Lease assigned by the match.
    pub lease: Option<LeaseId>,

    /// Booking category for category matches.
    pub category: Option<String>,

    /// Match confidence, 0.0 or 1.0.
    pub confidence: f64,
}

impl MatchDecision {
    /// The decision when no rule matched: stay unmatched, nothing assigned.
    #[must_use]
    pub fn unmatched() -> Self {
        Self {
            rule: None,
            status: MatchStatus::Unmatched,
            tenant: None,
            lease: None,
            category: None,
            confidence: 0.0,
        }
    }

    /// The decision produced by a full rule match.
    #[must_use]
    pub fn from_rule(rule: &Rule) -> Self {
        let (tenant, lease, category) = match &rule.action {
            RuleAction::AssignTenant { tenant, lease } => {
                (Some(tenant.clone()), lease.clone(), None)
            }
            RuleAction::BookAsCategory { category } => (None, None, Some(category.clone())),
        };
        Self {
            rule: Some(rule.id.clone()),
            status: MatchStatus::AutoMatched,
            tenant,
            lease,
            category,
            confidence: 1.0,
        }
    }

    /// A decision supplied directly by a human, bypassing rule evaluation.
    #[must_use]
    pub fn manual(
        tenant: Option<TenantId>,
        lease: Option<LeaseId>,
        category: Option<String>,
    ) -> Self {
        Self {
            rule: None,
            status: MatchStatus::Manual,
            tenant,
            lease,
            category,
            confidence: 1.0,
        }
    }

    /// Returns `true` if this decision resolves the transaction.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self.status, MatchStatus::Unmatched)
    }
}
