pub mod rules;
pub mod transactions;

pub use rules::MemoryRuleStore;
pub use transactions::MemoryTransactionStore;
