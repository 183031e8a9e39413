//! Decision tree training.
//!
//! - [`TreeTrainer`]: iterative, explicit-stack tree induction
//! - [`SplitEvaluator`]: mean+sigma candidate thresholds scored by entropy
//! - [`ClassStats`]: per-class mean / population stddev over a node's slice
//! - [`ClassificationReport`]: evaluation of predicted vs. actual labels
//!
//! Training is deterministic: for a fixed record order and configuration the
//! same tree is produced, whether or not the split search runs in parallel.

mod metrics;
mod partition;
mod split;
mod stats;
mod trainer;

pub use metrics::{ClassificationReport, ReportError, ReportRow};
pub use partition::partition_rows;
pub use split::{split_entropy, SplitCandidate, SplitEvaluator};
pub use stats::{class_counts, majority_class, purity, ClassStat, ClassStats};
pub use trainer::{TrainError, TrainerParams, TrainingSummary, TreeTrainer};
