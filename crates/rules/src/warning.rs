use serde::{Deserialize, Serialize};

use rentmatch_core::RuleId;

/// A non-fatal defect found in stored rule data during evaluation.
///
/// Malformed conditions (uncompilable regex, unparsable amounts, empty
/// condition lists) make the affected condition or rule evaluate false
/// instead of failing the pass; the detail is surfaced to the caller
/// through these warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityWarning {
    /// The rule the defect was found in, when known.
    pub rule: Option<RuleId>,

    /// Index of the offending condition within the rule, when known.
    pub condition_index: Option<usize>,

    /// Human-readable description of the defect.
    pub detail: String,
}

impl IntegrityWarning {
    /// Create a warning not yet attributed to a rule.
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            rule: None,
            condition_index: None,
            detail: detail.into(),
        }
    }

    /// Attribute this warning to a condition index.
    #[must_use]
    pub fn at_condition(mut self, index: usize) -> Self {
        self.condition_index = Some(index);
        self
    }

    /// Attribute this warning to a rule.
    #[must_use]
    pub fn for_rule(mut self, rule: RuleId) -> Self {
        self.rule = Some(rule);
        self
    }
}

impl std::fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.rule, self.condition_index) {
            (Some(rule), Some(idx)) => {
                write!(f, "rule {rule}, condition {idx}: {}", self.detail)
            }
            (Some(rule), None) => write!(f, "rule {rule}: {}", self.detail),
            _ => f.write_str(&self.detail),
        }
    }
}
