pub mod engine;
pub mod evaluate;
pub mod warning;

pub use engine::{MatchEngine, MatchOutcome, NearMiss};
pub use evaluate::{Evaluation, evaluate};
pub use warning::IntegrityWarning;
