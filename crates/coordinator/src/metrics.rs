use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for reconciliation activity.
///
/// All counters are monotonic and updated with relaxed atomics; a
/// snapshot is a consistent-enough view for logging and dashboards, not
/// a transactional read.
#[derive(Debug, Default)]
pub struct CoordinatorMetrics {
    evaluated: AtomicU64,
    auto_matched: AtomicU64,
    unresolved: AtomicU64,
    skipped: AtomicU64,
    conflicts: AtomicU64,
    manual_matches: AtomicU64,
    rules_learned: AtomicU64,
    batch_errors: AtomicU64,
}

impl CoordinatorMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_evaluated(&self) {
        self.evaluated.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_auto_matched(&self) {
        self.auto_matched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unresolved(&self) {
        self.unresolved.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_conflict(&self) {
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_manual_match(&self) {
        self.manual_matches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rule_learned(&self) {
        self.rules_learned.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_batch_error(&self) {
        self.batch_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// A point-in-time copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            evaluated: self.evaluated.load(Ordering::Relaxed),
            auto_matched: self.auto_matched.load(Ordering::Relaxed),
            unresolved: self.unresolved.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            manual_matches: self.manual_matches.load(Ordering::Relaxed),
            rules_learned: self.rules_learned.load(Ordering::Relaxed),
            batch_errors: self.batch_errors.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`CoordinatorMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Transactions run through rule evaluation.
    pub evaluated: u64,
    /// Evaluations that produced an applied auto-match.
    pub auto_matched: u64,
    /// Evaluations where no rule fully matched.
    pub unresolved: u64,
    /// Batch entries skipped because the transaction was already resolved.
    pub skipped: u64,
    /// Status transitions lost to a concurrent writer.
    pub conflicts: u64,
    /// Applied manual matches.
    pub manual_matches: u64,
    /// Rules synthesized from manual corrections.
    pub rules_learned: u64,
    /// Per-transaction batch failures.
    pub batch_errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recordings() {
        let metrics = CoordinatorMetrics::new();
        metrics.record_evaluated();
        metrics.record_evaluated();
        metrics.record_auto_matched();
        metrics.record_skipped();
        metrics.record_rule_learned();

        let snap = metrics.snapshot();
        assert_eq!(snap.evaluated, 2);
        assert_eq!(snap.auto_matched, 1);
        assert_eq!(snap.skipped, 1);
        assert_eq!(snap.rules_learned, 1);
        assert_eq!(snap.conflicts, 0);
        assert_eq!(snap.batch_errors, 0);
    }
}
