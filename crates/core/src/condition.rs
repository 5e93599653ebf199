use serde::{Deserialize, Serialize};

/// The transaction field a condition reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionField {
    CounterpartName,
    CounterpartIban,
    ReferenceText,
    Amount,
    AmountRange,
}

impl ConditionField {
    /// Return a string representation of the field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CounterpartName => "counterpart_name",
            Self::CounterpartIban => "counterpart_iban",
            Self::ReferenceText => "reference_text",
            Self::Amount => "amount",
            Self::AmountRange => "amount_range",
        }
    }

    /// Returns `true` if the field carries text rather than an amount.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Self::CounterpartName | Self::CounterpartIban | Self::ReferenceText
        )
    }
}

/// How the condition value is compared against the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    Contains,
    StartsWith,
    Regex,
    GreaterThan,
    LessThan,
    Between,
}

impl ConditionOperator {
    /// Return a string representation of the operator.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::Regex => "regex",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::Between => "between",
        }
    }
}

/// A single `(field, operator, value)` matching condition.
///
/// Conditions are immutable once attached to a persisted rule. The value
/// is always carried as text; numeric operators parse it as signed minor
/// currency units, and `between` uses the inclusive range form
/// `"<lo>..<hi>"` (e.g. `"-90000..-80000"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub field: ConditionField,
    pub operator: ConditionOperator,
    pub value: String,
}

impl Condition {
    /// Create a new condition.
    #[must_use]
    pub fn new(
        field: ConditionField,
        operator: ConditionOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
        }
    }
}
