use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::types::{LeaseId, OrgId, RuleId, TenantId};

/// What happens when a rule fully matches a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    /// Assign the transaction to a tenant and, optionally, a lease.
    AssignTenant {
        tenant: TenantId,
        lease: Option<LeaseId>,
    },
    /// Book the transaction under a category without a tenant.
    BookAsCategory { category: String },
}

/// An ordered matcher owned by one organization.
///
/// Rules are evaluated in a stable total order: explicit `priority`
/// first (lower number = evaluated earlier, unset priorities after all
/// set ones), then insertion `position`, then `id` as a final tie-break.
///
/// A rule with an empty condition list must never be evaluated; it is a
/// data-integrity violation, not a wildcard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule identifier.
    pub id: RuleId,

    /// Organization that owns this rule.
    pub org: OrgId,

    /// A human-readable name for the rule.
    pub name: String,

    /// Conditions that must all hold for the rule to fire.
    pub conditions: Vec<Condition>,

    /// The action applied on a full match.
    pub action: RuleAction,

    /// Explicit priority. Lower values are evaluated first; `None` sorts
    /// after every explicit priority.
    pub priority: Option<i32>,

    /// Insertion order, assigned by the rule store on creation.
    #[serde(default)]
    pub position: u64,

    /// Number of times this rule has produced an applied match.
    #[serde(default)]
    pub usage_count: u64,

    /// When this rule last produced an applied match.
    pub last_triggered: Option<DateTime<Utc>>,
}

impl Rule {
    /// Create a new rule with the given conditions and action.
    ///
    /// Defaults to no explicit priority, position 0, and zero usage.
    #[must_use]
    pub fn new(
        id: impl Into<RuleId>,
        org: impl Into<OrgId>,
        name: impl Into<String>,
        conditions: Vec<Condition>,
        action: RuleAction,
    ) -> Self {
        Self {
            id: id.into(),
            org: org.into(),
            name: name.into(),
            conditions,
            action,
            priority: None,
            position: 0,
            usage_count: 0,
            last_triggered: None,
        }
    }

    /// Set the explicit priority of this rule.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the insertion position of this rule.
    #[must_use]
    pub fn with_position(mut self, position: u64) -> Self {
        self.position = position;
        self
    }

    /// The stable total-order key used for evaluation ordering.
    #[must_use]
    pub fn sort_key(&self) -> (i32, u64, RuleId) {
        (
            self.priority.unwrap_or(i32::MAX),
            self.position,
            self.id.clone(),
        )
    }
}
