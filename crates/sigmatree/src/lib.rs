//! sigmatree: a binary decision tree classifier.
//!
//! Each split is chosen by proposing one threshold per class, the class
//! mean plus one standard deviation of a feature, and keeping the candidate
//! whose left-hand class distribution has the lowest Shannon entropy. A
//! feature is used at most once along any root-to-leaf path, and trees are
//! built iteratively with an explicit work stack.
//!
//! # Key Types
//!
//! - [`DecisionTreeClassifier`] - High-level model with train/predict/save/load
//! - [`TreeConfig`] - Configuration builder
//! - [`RecordSet`] / [`Record`] - Labeled training and evaluation data
//! - [`Tree`] - The trained tree (structure-of-arrays)
//! - [`ClassificationReport`] - Evaluation results
//!
//! # Training
//!
//! ```
//! use sigmatree::{DecisionTreeClassifier, Record, RecordSet, TreeConfig};
//!
//! let data = RecordSet::new(
//!     vec![
//!         Record::new(1, [1.0]),
//!         Record::new(1, [1.5]),
//!         Record::new(1, [2.0]),
//!         Record::new(2, [8.0]),
//!         Record::new(2, [9.0]),
//!         Record::new(2, [10.0]),
//!     ],
//!     2,
//! )?;
//! let config = TreeConfig::builder().n_classes(2).build()?;
//! let model = DecisionTreeClassifier::train(&data, config)?;
//!
//! assert_eq!(model.predict(&[1.8]), 1);
//! assert_eq!(model.predict(&[9.5]), 2);
//! # Ok::<(), sigmatree::Error>(())
//! ```
//!
//! # Persistence
//!
//! [`DecisionTreeClassifier::save`] writes the line-oriented text format
//! described in [`persist::text`]; [`persist::json`] offers a versioned JSON
//! alternative.

// Re-export approx traits for users who want to compare thresholds
pub use approx;

pub mod data;
pub mod inference;
pub mod model;
pub mod persist;
pub mod repr;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// High-level model types
pub use model::{ConfigError, DecisionTreeClassifier, TreeConfig};

// Data types
pub use data::{DatasetError, FeatureAccessor, FeatureValue, Record, RecordSet};

// Tree representation
pub use repr::{Tree, TreeValidationError, TreeView};

// Training and evaluation
pub use training::{ClassificationReport, ReportError, TrainError, TrainingSummary};

// Persistence
pub use persist::PersistError;

// Shared utilities
pub use utils::{run_with_threads, Parallelism};

// =============================================================================
// Error
// =============================================================================

/// Any error the crate can return.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Train(#[from] TrainError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Result alias using the crate [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
