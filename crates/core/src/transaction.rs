use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AccountId, LeaseId, OrgId, TenantId, TransactionId};

/// The reconciliation state of a bank transaction.
///
/// Transactions start `Unmatched` and move to `AutoMatched` or `Manual`
/// exactly once. Neither resolved state transitions further inside this
/// engine; re-opening a transaction is an external concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Unmatched,
    AutoMatched,
    Manual,
}

impl MatchStatus {
    /// Return a string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unmatched => "unmatched",
            Self::AutoMatched => "auto_matched",
            Self::Manual => "manual",
        }
    }

    /// Returns `true` if the transaction still awaits reconciliation.
    #[must_use]
    pub fn is_unmatched(&self) -> bool {
        matches!(self, Self::Unmatched)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One bank ledger entry as delivered by the ingestion feed.
///
/// Amounts are signed integers in minor currency units (cents). The
/// `matched_*` fields are written only by the reconciliation coordinator;
/// `matched_by` stays `None` for automatic matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier.
    pub id: TransactionId,

    /// Organization that owns the bank account.
    pub org: OrgId,

    /// Bank account this entry was booked on.
    pub account: AccountId,

    /// Signed amount in minor currency units.
    pub amount_minor: i64,

    /// Counterpart name as reported by the bank, if any.
    pub counterpart_name: Option<String>,

    /// Counterpart IBAN, if any.
    pub counterpart_iban: Option<String>,

    /// Booking date.
    pub booked_on: NaiveDate,

    /// Free-text payment reference.
    pub reference: Option<String>,

    /// Current reconciliation state.
    pub status: MatchStatus,

    /// Tenant the transaction was matched to, once resolved.
    pub matched_tenant: Option<TenantId>,

    /// Lease the transaction was matched to, once resolved.
    pub matched_lease: Option<LeaseId>,

    /// Booking category for category-only matches.
    pub category: Option<String>,

    /// Match confidence, 0.0 or 1.0.
    pub confidence: f64,

    /// When the match was applied.
    pub matched_at: Option<DateTime<Utc>>,

    /// Actor that applied the match. `None` for automatic matches.
    pub matched_by: Option<String>,
}

impl Transaction {
    /// Create a new unmatched transaction with the required fields.
    #[must_use]
    pub fn new(
        id: impl Into<TransactionId>,
        org: impl Into<OrgId>,
        account: impl Into<AccountId>,
        amount_minor: i64,
        booked_on: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            org: org.into(),
            account: account.into(),
            amount_minor,
            counterpart_name: None,
            counterpart_iban: None,
            booked_on,
            reference: None,
            status: MatchStatus::Unmatched,
            matched_tenant: None,
            matched_lease: None,
            category: None,
            confidence: 0.0,
            matched_at: None,
            matched_by: None,
        }
    }

    /// Set the counterpart name.
    #[must_use]
    pub fn with_counterpart_name(mut self, name: impl Into<String>) -> Self {
        self.counterpart_name = Some(name.into());
        self
    }

    /// Set the counterpart IBAN.
    #[must_use]
    pub fn with_counterpart_iban(mut self, iban: impl Into<String>) -> Self {
        self.counterpart_iban = Some(iban.into());
        self
    }

    /// Set the free-text payment reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}
