//! Decision tree classifier.
//!
//! High-level wrapper around [`Tree`] with training, prediction, evaluation
//! and persistence. Access components via [`tree()`](DecisionTreeClassifier::tree)
//! and [`config()`](DecisionTreeClassifier::config).

use std::path::Path;

use ndarray::{Array1, ArrayView2};

use crate::data::{FeatureAccessor, RecordSet};
use crate::inference::Predictor;
use crate::persist::{self, PersistError};
use crate::repr::{Tree, TreeView};
use crate::training::{ClassificationReport, ReportError, TrainError, TrainingSummary, TreeTrainer};
use crate::utils::{run_with_threads, Parallelism};

use super::TreeConfig;

/// A trained single-tree classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTreeClassifier {
    tree: Tree,
    config: TreeConfig,
}

impl DecisionTreeClassifier {
    /// Wrap an existing tree.
    pub fn from_tree(tree: Tree, config: TreeConfig) -> Self {
        Self { tree, config }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    pub fn summary(&self) -> TrainingSummary {
        TrainingSummary::of(&self.tree)
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Train a classifier on `data`.
    ///
    /// Uses `config.n_threads` for the per-feature split search; the tree is
    /// the same for every thread count.
    ///
    /// # Errors
    ///
    /// [`TrainError::Config`] if `config` fails [`TreeConfig::validate`]. Its
    /// fields are public, so a hand-built config may skip the builder checks.
    pub fn train(data: &RecordSet, config: TreeConfig) -> Result<Self, TrainError> {
        config.validate()?;
        run_with_threads(config.n_threads, |parallelism| {
            Self::train_inner(data, config, parallelism)
        })
    }

    fn train_inner(
        data: &RecordSet,
        config: TreeConfig,
        parallelism: Parallelism,
    ) -> Result<Self, TrainError> {
        let trainer = TreeTrainer::new(config.to_trainer_params());
        let tree = trainer.train(data, parallelism)?;
        Ok(Self { tree, config })
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Predicted class of one sample.
    ///
    /// # Panics
    ///
    /// Panics if the sample is narrower than
    /// [`Tree::required_features`].
    pub fn predict<S: FeatureAccessor + ?Sized>(&self, sample: &S) -> u32 {
        self.tree.leaf_class(self.tree.traverse_to_leaf(sample))
    }

    /// Predicted classes of every record, in record order.
    pub fn predict_batch(&self, data: &RecordSet) -> Vec<u32> {
        run_with_threads(self.config.n_threads, |parallelism| {
            Predictor::new(&self.tree).predict_records(data, parallelism)
        })
    }

    /// Predicted classes for a `[n_samples, n_features]` matrix.
    pub fn predict_matrix(&self, features: ArrayView2<'_, f64>) -> Array1<u32> {
        if features.nrows() == 0 {
            return Array1::zeros(0);
        }
        run_with_threads(self.config.n_threads, |parallelism| {
            Predictor::new(&self.tree).predict(features, parallelism)
        })
    }

    /// Predict every record of `data` and compare with its class.
    ///
    /// Fails with [`ReportError::LabelOutOfRange`] if the tree predicts a
    /// class that `data` does not declare.
    pub fn evaluate(&self, data: &RecordSet) -> Result<ClassificationReport, ReportError> {
        let predicted = self.predict_batch(data);
        ClassificationReport::from_records(&predicted, data)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Save the tree to `path` in the text format.
    ///
    /// Only the tree is stored; see [`load`](Self::load) for how the
    /// configuration is restored.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        persist::save_text(&self.tree, path)
    }

    /// Load a tree saved with [`save`](Self::save).
    ///
    /// The text format does not record the class count, so `n_classes` is
    /// taken as the largest leaf class (at least 2); other parameters use
    /// their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let tree = persist::load_text(path)?;
        let config = Self::inferred_config(&tree, None);
        Ok(Self { tree, config })
    }

    /// Load a tree saved with [`save`](Self::save) for an `n_classes`
    /// problem.
    ///
    /// Fails with [`TreeValidationError::LeafClassOutOfRange`] (wrapped in
    /// [`PersistError::Invalid`]) if any leaf class lies outside
    /// `1..=n_classes`.
    ///
    /// [`TreeValidationError::LeafClassOutOfRange`]: crate::repr::TreeValidationError::LeafClassOutOfRange
    pub fn load_with_classes(path: impl AsRef<Path>, n_classes: u32) -> Result<Self, PersistError> {
        let tree = persist::load_text(path)?;
        tree.validate_classes(n_classes)?;
        let config = Self::inferred_config(&tree, Some(n_classes));
        Ok(Self { tree, config })
    }

    /// JSON document holding the tree and the class count.
    pub fn to_json(&self) -> Result<String, PersistError> {
        persist::to_json(&self.tree, Some(self.config.n_classes))
    }

    /// Decode a document produced by [`to_json`](Self::to_json).
    ///
    /// When the document records a class count, every leaf class must lie
    /// within it.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let (tree, n_classes) = persist::from_json(json)?;
        if let Some(n_classes) = n_classes {
            tree.validate_classes(n_classes)?;
        }
        let config = Self::inferred_config(&tree, n_classes);
        Ok(Self { tree, config })
    }

    fn inferred_config(tree: &Tree, n_classes: Option<u32>) -> TreeConfig {
        let max_leaf = (0..tree.n_nodes() as u32)
            .filter(|&n| tree.is_leaf(n))
            .map(|n| tree.leaf_class(n))
            .max()
            .unwrap_or(1);
        TreeConfig {
            n_classes: n_classes.unwrap_or(0).max(max_leaf).max(2),
            ..TreeConfig::default()
        }
    }
}
