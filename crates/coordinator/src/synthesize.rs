use chrono::{DateTime, Utc};
use uuid::Uuid;

use rentmatch_core::{Condition, OrgId, Rule, RuleAction, Transaction};

use crate::coordinator::ManualTarget;
use crate::error::CoordinatorError;

/// Build a rule from a manual correction.
///
/// The caller picks the conditions (typically pre-filled from the
/// transaction's counterpart and reference). The synthesized rule gets
/// no explicit priority, so it evaluates after every operator-tuned rule
/// and cannot shadow one. Its usage count starts at 1: the manual match
/// it was learned from counts as its first application.
pub fn synthesize(
    org: &OrgId,
    txn: &Transaction,
    conditions: Vec<Condition>,
    target: &ManualTarget,
    now: DateTime<Utc>,
) -> Result<Rule, CoordinatorError> {
    if conditions.is_empty() {
        return Err(CoordinatorError::InvalidInput(
            "cannot synthesize a rule without conditions".into(),
        ));
    }

    let action = match (&target.tenant, &target.category) {
        (Some(tenant), _) => RuleAction::AssignTenant {
            tenant: tenant.clone(),
            lease: target.lease.clone(),
        },
        (None, Some(category)) => RuleAction::BookAsCategory {
            category: category.clone(),
        },
        (None, None) => {
            return Err(CoordinatorError::InvalidInput(
                "manual target assigns neither a tenant nor a category".into(),
            ));
        }
    };

    let name = match txn.counterpart_name.as_deref() {
        Some(counterpart) => format!("Learned: {counterpart}"),
        None => match &target.category {
            Some(category) => format!("Learned: {category}"),
            None => format!("Learned from {}", txn.id),
        },
    };

    let mut rule = Rule::new(
        Uuid::new_v4().to_string(),
        org.clone(),
        name,
        conditions,
        action,
    );
    rule.usage_count = 1;
    rule.last_triggered = Some(now);
    Ok(rule)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use rentmatch_core::{ConditionField, ConditionOperator, LeaseId, TenantId};

    use super::*;

    fn txn() -> Transaction {
        Transaction::new(
            "txn-1",
            "org-1",
            "acct-1",
            -85_000,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        )
        .with_counterpart_name("Max Mustermann")
    }

    fn contains_name() -> Condition {
        Condition::new(
            ConditionField::CounterpartName,
            ConditionOperator::Contains,
            "Max Mustermann",
        )
    }

    #[test]
    fn synthesizes_tenant_rule() {
        let target = ManualTarget {
            tenant: Some(TenantId::new("t-1")),
            lease: Some(LeaseId::new("l-1")),
            category: None,
        };
        let now = Utc::now();
        let rule = synthesize(
            &OrgId::new("org-1"),
            &txn(),
            vec![contains_name()],
            &target,
            now,
        )
        .unwrap();

        assert_eq!(rule.org.as_str(), "org-1");
        assert_eq!(rule.name, "Learned: Max Mustermann");
        assert!(rule.priority.is_none());
        assert_eq!(rule.usage_count, 1);
        assert_eq!(rule.last_triggered, Some(now));
        assert!(matches!(rule.action, RuleAction::AssignTenant { .. }));
    }

    #[test]
    fn tenant_takes_precedence_over_category() {
        let target = ManualTarget {
            tenant: Some(TenantId::new("t-1")),
            lease: None,
            category: Some("rent".into()),
        };
        let rule = synthesize(
            &OrgId::new("org-1"),
            &txn(),
            vec![contains_name()],
            &target,
            Utc::now(),
        )
        .unwrap();
        assert!(matches!(rule.action, RuleAction::AssignTenant { .. }));
    }

    #[test]
    fn synthesizes_category_rule() {
        let target = ManualTarget {
            tenant: None,
            lease: None,
            category: Some("bank_fees".into()),
        };
        let rule = synthesize(
            &OrgId::new("org-1"),
            &txn(),
            vec![contains_name()],
            &target,
            Utc::now(),
        )
        .unwrap();
        assert!(
            matches!(rule.action, RuleAction::BookAsCategory { ref category } if category == "bank_fees")
        );
    }

    #[test]
    fn rejects_empty_conditions() {
        let target = ManualTarget {
            tenant: Some(TenantId::new("t-1")),
            lease: None,
            category: None,
        };
        let result = synthesize(&OrgId::new("org-1"), &txn(), vec![], &target, Utc::now());
        assert!(matches!(result, Err(CoordinatorError::InvalidInput(_))));
    }

    #[test]
    fn rejects_empty_target() {
        let target = ManualTarget {
            tenant: None,
            lease: None,
            category: None,
        };
        let result = synthesize(
            &OrgId::new("org-1"),
            &txn(),
            vec![contains_name()],
            &target,
            Utc::now(),
        );
        assert!(matches!(result, Err(CoordinatorError::InvalidInput(_))));
    }

    #[test]
    fn generated_ids_are_unique() {
        let target = ManualTarget {
            tenant: Some(TenantId::new("t-1")),
            lease: None,
            category: None,
        };
        let a = synthesize(
            &OrgId::new("org-1"),
            &txn(),
            vec![contains_name()],
            &target,
            Utc::now(),
        )
        .unwrap();
        let b = synthesize(
            &OrgId::new("org-1"),
            &txn(),
            vec![contains_name()],
            &target,
            Utc::now(),
        )
        .unwrap();
        assert_ne!(a.id, b.id);
    }
}
