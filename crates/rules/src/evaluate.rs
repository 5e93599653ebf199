use regex::Regex;

use rentmatch_core::{Condition, ConditionField, ConditionOperator, Transaction};

use crate::warning::IntegrityWarning;

/// The result of evaluating a condition list against one transaction.
///
/// `matched` requires every condition to hold (logical AND). `score` is
/// the fraction of conditions that individually held; it is diagnostic
/// only and never declares a match on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub matched: bool,
    pub score: f64,
    pub warnings: Vec<IntegrityWarning>,
}

/// Evaluate a condition list against a transaction.
///
/// Pure and side-effect free; safe to run concurrently for different
/// transactions against the same rule snapshot. An empty condition list
/// never matches and is reported as an integrity violation, not treated
/// as a wildcard.
#[must_use]
pub fn evaluate(txn: &Transaction, conditions: &[Condition]) -> Evaluation {
    if conditions.is_empty() {
        return Evaluation {
            matched: false,
            score: 0.0,
            warnings: vec![IntegrityWarning::new("empty condition list")],
        };
    }

    let mut warnings = Vec::new();
    let mut held = 0usize;

    for (index, condition) in conditions.iter().enumerate() {
        match condition_holds(txn, condition) {
            Ok(true) => held += 1,
            Ok(false) => {}
            Err(detail) => {
                warnings.push(IntegrityWarning::new(detail).at_condition(index));
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let score = held as f64 / conditions.len() as f64;

    Evaluation {
        matched: held == conditions.len(),
        score,
        warnings,
    }
}

/// Check one condition. `Err` carries an integrity defect (malformed
/// stored data); the condition then counts as not held.
fn condition_holds(txn: &Transaction, condition: &Condition) -> Result<bool, String> {
    if condition.field.is_text() {
        text_condition_holds(txn, condition)
    } else {
        amount_condition_holds(txn, condition)
    }
}

fn text_condition_holds(txn: &Transaction, condition: &Condition) -> Result<bool, String> {
    let raw = match condition.field {
        ConditionField::CounterpartName => txn.counterpart_name.as_deref(),
        ConditionField::CounterpartIban => txn.counterpart_iban.as_deref(),
        ConditionField::ReferenceText => txn.reference.as_deref(),
        ConditionField::Amount | ConditionField::AmountRange => unreachable!(),
    };

    // A missing field fails the condition; that is data, not a defect.
    let Some(raw) = raw else { return Ok(false) };
    let haystack = normalize(raw);
    let needle = normalize(&condition.value);

    match condition.operator {
        ConditionOperator::Equals => Ok(haystack == needle),
        ConditionOperator::Contains => {
            Ok(haystack.to_lowercase().contains(&needle.to_lowercase()))
        }
        ConditionOperator::StartsWith => {
            Ok(haystack.to_lowercase().starts_with(&needle.to_lowercase()))
        }
        ConditionOperator::Regex => match Regex::new(&condition.value) {
            Ok(re) => Ok(re.is_match(&haystack)),
            Err(e) => Err(format!("invalid regex {:?}: {e}", condition.value)),
        },
        ConditionOperator::GreaterThan
        | ConditionOperator::LessThan
        | ConditionOperator::Between => Err(format!(
            "operator {} is not applicable to text field {}",
            condition.operator.as_str(),
            condition.field.as_str()
        )),
    }
}

fn amount_condition_holds(txn: &Transaction, condition: &Condition) -> Result<bool, String> {
    let amount = txn.amount_minor;

    match condition.operator {
        ConditionOperator::Equals => Ok(amount == parse_minor(&condition.value)?),
        ConditionOperator::GreaterThan => Ok(amount > parse_minor(&condition.value)?),
        ConditionOperator::LessThan => Ok(amount < parse_minor(&condition.value)?),
        ConditionOperator::Between => {
            let (lo, hi) = parse_range(&condition.value)?;
            Ok(amount >= lo && amount <= hi)
        }
        ConditionOperator::Contains
        | ConditionOperator::StartsWith
        | ConditionOperator::Regex => Err(format!(
            "operator {} is not applicable to amount field {}",
            condition.operator.as_str(),
            condition.field.as_str()
        )),
    }
}

/// Trim and collapse internal whitespace runs to a single space.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_minor(value: &str) -> Result<i64, String> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("amount value {value:?} is not an integer: {e}"))
}

/// Parse the inclusive range form `"<lo>..<hi>"` in minor units.
fn parse_range(value: &str) -> Result<(i64, i64), String> {
    let Some((lo, hi)) = value.split_once("..") else {
        return Err(format!("range value {value:?} is not of the form \"lo..hi\""));
    };
    let lo = parse_minor(lo)?;
    let hi = parse_minor(hi)?;
    if lo > hi {
        return Err(format!("range value {value:?} has lo > hi"));
    }
    Ok((lo, hi))
}
