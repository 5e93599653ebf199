use tracing::{debug, warn};

use rentmatch_core::{MatchDecision, Rule, RuleId, Transaction};

use crate::evaluate::evaluate;
use crate::warning::IntegrityWarning;

/// A non-matching rule that satisfied some of its conditions.
///
/// Diagnostic only: near-misses are reported for operator visibility and
/// never influence the decision.
#[derive(Debug, Clone, PartialEq)]
pub struct NearMiss {
    pub rule: RuleId,
    pub score: f64,
}

/// The full result of one matching pass over a transaction.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// The decision for the transaction.
    pub decision: MatchDecision,
    /// Integrity defects found in stored rules during the pass.
    pub warnings: Vec<IntegrityWarning>,
    /// Partially-satisfied rules, ordered by descending score.
    pub near_misses: Vec<NearMiss>,
}

/// Evaluates rules against transactions in a stable total order.
///
/// Rules are sorted on construction by explicit priority (lower number
/// first, unset priorities last), then insertion position, then rule id.
/// The first rule whose conditions all hold wins; the engine never
/// searches for a "better" match further down the order.
///
/// The engine holds an immutable snapshot and performs no writes; usage
/// statistics are recorded by the coordinator once a decision is applied.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    rules: Vec<Rule>,
}

impl MatchEngine {
    /// Create an engine over the given rule snapshot.
    #[must_use]
    pub fn new(mut rules: Vec<Rule>) -> Self {
        rules.sort_by_key(Rule::sort_key);
        Self { rules }
    }

    /// Return the rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules in the snapshot.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Evaluate the snapshot against one transaction.
    ///
    /// Re-running with an unchanged snapshot always yields an identical
    /// decision: there is no randomness and no wall-clock input.
    #[must_use]
    pub fn evaluate(&self, txn: &Transaction) -> MatchOutcome {
        let mut warnings = Vec::new();
        let mut near_misses = Vec::new();

        for rule in &self.rules {
            if rule.conditions.is_empty() {
                // Integrity violation, never a wildcard: skip the rule.
                warn!(rule = %rule.id, "skipping rule with empty condition list");
                warnings.push(
                    IntegrityWarning::new("empty condition list").for_rule(rule.id.clone()),
                );
                continue;
            }

            let eval = evaluate(txn, &rule.conditions);
            warnings.extend(
                eval.warnings
                    .into_iter()
                    .map(|w| w.for_rule(rule.id.clone())),
            );

            if eval.matched {
                debug!(rule = %rule.id, txn = %txn.id, "rule matched");
                return MatchOutcome {
                    decision: MatchDecision::from_rule(rule),
                    warnings,
                    near_misses: finish_near_misses(near_misses),
                };
            }

            if eval.score > 0.0 {
                near_misses.push(NearMiss {
                    rule: rule.id.clone(),
                    score: eval.score,
                });
            }
        }

        debug!(txn = %txn.id, "no rule matched");
        MatchOutcome {
            decision: MatchDecision::unmatched(),
            warnings,
            near_misses: finish_near_misses(near_misses),
        }
    }
}

fn finish_near_misses(mut near_misses: Vec<NearMiss>) -> Vec<NearMiss> {
    near_misses.sort_by(|a, b| b.score.total_cmp(&a.score));
    near_misses
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use rentmatch_core::{
        Condition, ConditionField, ConditionOperator, LeaseId, MatchStatus, RuleAction, TenantId,
    };

    use super::*;

    fn rent_txn() -> Transaction {
        Transaction::new(
            "txn-1",
            "org-1",
            "acct-1",
            -85_000,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        )
        .with_counterpart_name("Max Mustermann")
        .with_reference("Miete Juni WE3")
    }

    fn contains_name(value: &str) -> Condition {
        Condition::new(
            ConditionField::CounterpartName,
            ConditionOperator::Contains,
            value,
        )
    }

    fn assign(tenant: &str, lease: &str) -> RuleAction {
        RuleAction::AssignTenant {
            tenant: TenantId::new(tenant),
            lease: Some(LeaseId::new(lease)),
        }
    }

    #[test]
    fn mustermann_example_matches() {
        let rule = Rule::new(
            "rule-1",
            "org-1",
            "Mustermann rent",
            vec![contains_name("Mustermann")],
            assign("T1", "L1"),
        );
        let engine = MatchEngine::new(vec![rule]);

        let outcome = engine.evaluate(&rent_txn());
        assert_eq!(outcome.decision.status, MatchStatus::AutoMatched);
        assert_eq!(outcome.decision.tenant.as_ref().unwrap().as_str(), "T1");
        assert_eq!(outcome.decision.lease.as_ref().unwrap().as_str(), "L1");
        assert_eq!(outcome.decision.confidence, 1.0);
    }

    #[test]
    fn empty_rule_set_leaves_unmatched() {
        let engine = MatchEngine::new(vec![]);
        let outcome = engine.evaluate(&rent_txn());
        assert_eq!(outcome.decision.status, MatchStatus::Unmatched);
        assert_eq!(outcome.decision.confidence, 0.0);
        assert!(outcome.decision.tenant.is_none());
        assert!(outcome.decision.lease.is_none());
    }

    #[test]
    fn lower_priority_number_wins() {
        let r1 = Rule::new(
            "rule-1",
            "org-1",
            "first",
            vec![contains_name("Mustermann")],
            assign("T1", "L1"),
        )
        .with_priority(1);
        let r2 = Rule::new(
            "rule-2",
            "org-1",
            "second",
            vec![contains_name("Mustermann")],
            assign("T2", "L2"),
        )
        .with_priority(2);

        // Insertion order must not matter.
        let engine = MatchEngine::new(vec![r2, r1]);
        let outcome = engine.evaluate(&rent_txn());
        assert_eq!(outcome.decision.rule.as_ref().unwrap().as_str(), "rule-1");
        assert_eq!(outcome.decision.tenant.as_ref().unwrap().as_str(), "T1");
    }

    #[test]
    fn first_full_match_short_circuits() {
        let broad = Rule::new(
            "rule-broad",
            "org-1",
            "broad",
            vec![contains_name("Muster")],
            assign("T1", "L1"),
        )
        .with_priority(1);
        let specific = Rule::new(
            "rule-specific",
            "org-1",
            "specific",
            vec![
                contains_name("Mustermann"),
                Condition::new(ConditionField::Amount, ConditionOperator::Equals, "-85000"),
            ],
            assign("T2", "L2"),
        )
        .with_priority(2);

        // The broad rule comes first in order, so it wins even though the
        // specific rule would also match.
        let engine = MatchEngine::new(vec![specific, broad]);
        let outcome = engine.evaluate(&rent_txn());
        assert_eq!(
            outcome.decision.rule.as_ref().unwrap().as_str(),
            "rule-broad"
        );
    }

    #[test]
    fn unprioritized_rules_evaluate_after_prioritized() {
        let learned = Rule::new(
            "rule-learned",
            "org-1",
            "learned",
            vec![contains_name("Mustermann")],
            assign("T-learned", "L-learned"),
        )
        .with_position(1);
        let tuned = Rule::new(
            "rule-tuned",
            "org-1",
            "tuned",
            vec![contains_name("Mustermann")],
            assign("T-tuned", "L-tuned"),
        )
        .with_priority(100)
        .with_position(2);

        let engine = MatchEngine::new(vec![learned, tuned]);
        let outcome = engine.evaluate(&rent_txn());
        assert_eq!(
            outcome.decision.rule.as_ref().unwrap().as_str(),
            "rule-tuned"
        );
    }

    #[test]
    fn empty_condition_rule_is_skipped_with_warning() {
        let broken = Rule::new(
            "rule-broken",
            "org-1",
            "broken",
            vec![],
            assign("T9", "L9"),
        )
        .with_priority(1);
        let good = Rule::new(
            "rule-good",
            "org-1",
            "good",
            vec![contains_name("Mustermann")],
            assign("T1", "L1"),
        )
        .with_priority(2);

        let engine = MatchEngine::new(vec![broken, good]);
        let outcome = engine.evaluate(&rent_txn());
        assert_eq!(outcome.decision.rule.as_ref().unwrap().as_str(), "rule-good");
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(
            outcome.warnings[0].rule.as_ref().unwrap().as_str(),
            "rule-broken"
        );
    }

    #[test]
    fn malformed_condition_does_not_abort_the_pass() {
        let bad_regex = Rule::new(
            "rule-bad",
            "org-1",
            "bad regex",
            vec![Condition::new(
                ConditionField::ReferenceText,
                ConditionOperator::Regex,
                "[unclosed",
            )],
            assign("T9", "L9"),
        )
        .with_priority(1);
        let good = Rule::new(
            "rule-good",
            "org-1",
            "good",
            vec![contains_name("Mustermann")],
            assign("T1", "L1"),
        )
        .with_priority(2);

        let engine = MatchEngine::new(vec![bad_regex, good]);
        let outcome = engine.evaluate(&rent_txn());
        assert_eq!(outcome.decision.status, MatchStatus::AutoMatched);
        assert_eq!(outcome.decision.rule.as_ref().unwrap().as_str(), "rule-good");
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].detail.contains("invalid regex"));
    }

    #[test]
    fn near_misses_are_ranked_by_score() {
        let half = Rule::new(
            "rule-half",
            "org-1",
            "half",
            vec![
                contains_name("Mustermann"),
                Condition::new(ConditionField::Amount, ConditionOperator::Equals, "1"),
            ],
            assign("T1", "L1"),
        )
        .with_priority(1);
        let third = Rule::new(
            "rule-third",
            "org-1",
            "third",
            vec![
                contains_name("Mustermann"),
                Condition::new(ConditionField::Amount, ConditionOperator::Equals, "1"),
                Condition::new(
                    ConditionField::ReferenceText,
                    ConditionOperator::Contains,
                    "Kaution",
                ),
            ],
            assign("T2", "L2"),
        )
        .with_priority(2);

        let engine = MatchEngine::new(vec![third, half]);
        let outcome = engine.evaluate(&rent_txn());
        assert_eq!(outcome.decision.status, MatchStatus::Unmatched);
        assert_eq!(outcome.near_misses.len(), 2);
        assert_eq!(outcome.near_misses[0].rule.as_str(), "rule-half");
        assert!(outcome.near_misses[0].score > outcome.near_misses[1].score);
    }

    #[test]
    fn evaluation_is_deterministic_across_runs() {
        let rules = vec![
            Rule::new(
                "rule-a",
                "org-1",
                "a",
                vec![contains_name("Mustermann")],
                assign("T1", "L1"),
            )
            .with_position(1),
            Rule::new(
                "rule-b",
                "org-1",
                "b",
                vec![contains_name("Mustermann")],
                assign("T2", "L2"),
            )
            .with_position(2),
        ];
        let engine = MatchEngine::new(rules.clone());
        let txn = rent_txn();

        let first = engine.evaluate(&txn).decision;
        for _ in 0..10 {
            let again = MatchEngine::new(rules.clone()).evaluate(&txn).decision;
            assert_eq!(again, first);
        }
    }
}
