use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use rentmatch_core::{OrgId, Rule, RuleId};
use rentmatch_store::{RuleStore, StoreError};

/// In-memory [`RuleStore`] backed by a [`DashMap`].
///
/// Insertion positions come from a monotonic counter, giving rules
/// without an explicit priority a stable evaluation order. Usage
/// statistics are incremented under the map's per-entry guard, so
/// concurrent trigger recordings never lose updates.
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    data: DashMap<RuleId, Rule>,
    next_position: AtomicU64,
}

impl MemoryRuleStore {
    /// Create a new, empty in-memory rule store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rules across all organizations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the store holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl RuleStore for MemoryRuleStore {
    async fn create(&self, mut rule: Rule) -> Result<Rule, StoreError> {
        if rule.conditions.is_empty() {
            return Err(StoreError::Integrity(format!(
                "rule {} has an empty condition list",
                rule.id
            )));
        }

        rule.position = self.next_position.fetch_add(1, Ordering::Relaxed) + 1;

        match self.data.entry(rule.id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StoreError::Integrity(format!(
                "rule {} already exists",
                rule.id
            ))),
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                let stored = rule.clone();
                vacant.insert(rule);
                Ok(stored)
            }
        }
    }

    async fn get(&self, id: &RuleId) -> Result<Option<Rule>, StoreError> {
        Ok(self.data.get(id).map(|entry| entry.value().clone()))
    }

    async fn list_active(&self, org: &OrgId) -> Result<Vec<Rule>, StoreError> {
        let mut rules: Vec<Rule> = self
            .data
            .iter()
            .filter(|entry| &entry.value().org == org)
            .map(|entry| entry.value().clone())
            .collect();
        rules.sort_by_key(Rule::sort_key);
        Ok(rules)
    }

    async fn record_trigger(&self, id: &RuleId, at: DateTime<Utc>) -> Result<(), StoreError> {
        let Some(mut entry) = self.data.get_mut(id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        entry.usage_count += 1;
        entry.last_triggered = Some(at);
        Ok(())
    }
}
