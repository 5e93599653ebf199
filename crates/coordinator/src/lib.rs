pub mod builder;
pub mod coordinator;
pub mod error;
pub mod metrics;
pub mod report;
pub mod synthesize;

pub use builder::CoordinatorBuilder;
pub use coordinator::{
    ManualMatchOutcome, ManualTarget, ReconciliationCoordinator, RuleLearning,
};
pub use error::CoordinatorError;
pub use metrics::{CoordinatorMetrics, MetricsSnapshot};
pub use report::{BatchError, ReconciliationReport};
pub use synthesize::synthesize;
