//! Iterative tree induction.
//!
//! The trainer never recurses. Pending subtrees live on an explicit LIFO
//! stack of [`WorkItem`]s, each owning the row slice routed to that node and
//! the set of features already consumed on its path. After a split the
//! right child is pushed and the left child becomes current, giving a
//! depth-first, left-first construction order; after a leaf the next item
//! is popped. Construction ends when the stack is empty.
//!
//! Per node:
//! 1. **Purity**: if one class makes up at least `purity_threshold` of the
//!    slice, the node becomes a leaf with the majority class.
//! 2. **Split search**: class statistics + [`SplitEvaluator`] over the
//!    unused features. No usable feature means a majority leaf.
//! 3. **Degenerate guard**: if the best split sends every record to one
//!    side, the node becomes a majority leaf instead.
//! 4. Otherwise the node becomes a split; both children inherit
//!    `used ∪ {feature}`.
//!
//! Every split strictly grows the used set along its path, so depth is bounded
//! by the number of features.

use fixedbitset::FixedBitSet;
use tracing::{debug, info};

use crate::data::RecordSet;
use crate::model::ConfigError;
use crate::repr::{MutableTree, NodeId, Tree, TreeValidationError, TreeView};
use crate::utils::Parallelism;

use super::partition::partition_rows;
use super::split::{SplitCandidate, SplitEvaluator};
use super::stats::{class_counts, majority_class, purity, ClassStats};

// =============================================================================
// Params / Errors
// =============================================================================

/// Parameters for tree induction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainerParams {
    /// Number of class labels (`1..=n_classes`).
    pub n_classes: u32,
    /// Leaf when the dominant class fraction reaches this value.
    pub purity_threshold: f64,
    /// Entropy assigned to unusable features; must exceed `log2(n_classes)`.
    pub sentinel_entropy: f64,
}

impl Default for TrainerParams {
    fn default() -> Self {
        Self { n_classes: 2, purity_threshold: 0.84, sentinel_entropy: 1.0e9 }
    }
}

/// Errors that abort training.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot train on an empty record set")]
    EmptyDataset,

    #[error("trainer expects {expected} classes but the record set declares {got}")]
    ClassCountMismatch { expected: u32, got: u32 },

    /// A node received no records. The degenerate-split guard makes this
    /// unreachable; seeing it means an internal invariant was broken.
    #[error("internal error: node {node} received an empty slice")]
    EmptyNode { node: NodeId },

    #[error("trained tree is invalid: {0}")]
    InvalidTree(#[from] TreeValidationError),
}

/// Shape of a freshly trained tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingSummary {
    pub n_nodes: usize,
    pub n_leaves: usize,
    pub n_splits: usize,
    pub depth: usize,
}

impl TrainingSummary {
    pub fn of(tree: &Tree) -> Self {
        let n_leaves = tree.n_leaves();
        Self {
            n_nodes: tree.n_nodes(),
            n_leaves,
            n_splits: tree.n_nodes() - n_leaves,
            depth: tree.depth(),
        }
    }
}

// =============================================================================
// Work stack
// =============================================================================

/// A pending subtree and the data partition it owns.
#[derive(Debug)]
struct WorkItem {
    node: NodeId,
    rows: Vec<u32>,
    used: FixedBitSet,
    depth: usize,
}

/// Why a node became a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafReason {
    Pure,
    NoUsableFeature,
    Degenerate,
}

enum NodeDecision {
    Leaf { class: u32, reason: LeafReason },
    Split { candidate: SplitCandidate, left: Vec<u32>, right: Vec<u32> },
}

// =============================================================================
// TreeTrainer
// =============================================================================

/// Builds a [`Tree`] from a [`RecordSet`].
#[derive(Debug, Clone)]
pub struct TreeTrainer {
    params: TrainerParams,
}

impl TreeTrainer {
    pub fn new(params: TrainerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TrainerParams {
        &self.params
    }

    /// Train a tree.
    ///
    /// `parallelism` only affects the per-feature split search; the result is
    /// identical either way.
    pub fn train(&self, data: &RecordSet, parallelism: Parallelism) -> Result<Tree, TrainError> {
        if data.is_empty() {
            return Err(TrainError::EmptyDataset);
        }
        if data.n_classes() != self.params.n_classes {
            return Err(TrainError::ClassCountMismatch {
                expected: self.params.n_classes,
                got: data.n_classes(),
            });
        }

        let evaluator = SplitEvaluator::new(self.params.sentinel_entropy, parallelism);
        let n_features = data.n_features();

        let mut tree = MutableTree::with_capacity(2 * n_features + 1);
        let root = tree.init_root();

        let mut stack: Vec<WorkItem> = Vec::new();
        let mut current = Some(WorkItem {
            node: root,
            rows: (0..data.len() as u32).collect(),
            used: FixedBitSet::with_capacity(n_features),
            depth: 0,
        });

        while let Some(item) = current.take() {
            match self.decide(data, &evaluator, &item)? {
                NodeDecision::Leaf { class, reason } => {
                    debug!(
                        node = item.node,
                        depth = item.depth,
                        rows = item.rows.len(),
                        class,
                        ?reason,
                        "leaf"
                    );
                    tree.make_leaf(item.node, class);
                    current = stack.pop();
                }
                NodeDecision::Split { candidate, left, right } => {
                    debug!(
                        node = item.node,
                        depth = item.depth,
                        feature = candidate.feature,
                        threshold = candidate.threshold,
                        entropy = candidate.entropy,
                        left = left.len(),
                        right = right.len(),
                        "split"
                    );
                    let (left_id, right_id) =
                        tree.apply_split(item.node, candidate.feature, candidate.threshold);

                    let mut used = item.used;
                    used.insert(candidate.feature as usize);

                    stack.push(WorkItem {
                        node: right_id,
                        rows: right,
                        used: used.clone(),
                        depth: item.depth + 1,
                    });
                    current = Some(WorkItem {
                        node: left_id,
                        rows: left,
                        used,
                        depth: item.depth + 1,
                    });
                }
            }
        }

        let tree = tree.freeze()?;
        let summary = TrainingSummary::of(&tree);
        info!(
            records = data.len(),
            features = n_features,
            nodes = summary.n_nodes,
            leaves = summary.n_leaves,
            depth = summary.depth,
            "trained decision tree"
        );
        Ok(tree)
    }

    /// Resolve one node: leaf or split.
    fn decide(
        &self,
        data: &RecordSet,
        evaluator: &SplitEvaluator,
        item: &WorkItem,
    ) -> Result<NodeDecision, TrainError> {
        if item.rows.is_empty() {
            return Err(TrainError::EmptyNode { node: item.node });
        }

        let n_classes = self.params.n_classes as usize;
        let counts = class_counts(data, &item.rows, n_classes);
        let majority = majority_class(&counts);

        if purity(&counts) >= self.params.purity_threshold {
            return Ok(NodeDecision::Leaf { class: majority, reason: LeafReason::Pure });
        }

        if item.used.count_ones(..) >= data.n_features() {
            return Ok(NodeDecision::Leaf { class: majority, reason: LeafReason::NoUsableFeature });
        }

        let stats = ClassStats::compute(data, &item.rows, n_classes);
        let Some(candidate) = evaluator.best_split(data, &item.rows, &item.used, &stats) else {
            return Ok(NodeDecision::Leaf { class: majority, reason: LeafReason::NoUsableFeature });
        };

        let (left, right) = partition_rows(
            data,
            &item.rows,
            candidate.feature as usize,
            candidate.threshold,
        );
        if left.is_empty() || right.is_empty() {
            return Ok(NodeDecision::Leaf { class: majority, reason: LeafReason::Degenerate });
        }

        Ok(NodeDecision::Split { candidate, left, right })
    }
}
