pub mod condition;
pub mod decision;
pub mod rule;
pub mod transaction;
pub mod types;

pub use condition::{Condition, ConditionField, ConditionOperator};
pub use decision::MatchDecision;
pub use rule::{Rule, RuleAction};
pub use transaction::{MatchStatus, Transaction};
pub use types::{AccountId, LeaseId, OrgId, RuleId, TenantId, TransactionId};
