//! Immutable tree storage and the read-only tree interface.
//!
//! This module provides:
//! - [`TreeView`]: traversal interface implemented by [`Tree`] and
//!   [`MutableTree`](super::MutableTree)
//! - [`Tree`]: frozen structure-of-arrays tree
//! - [`TreeValidationError`]: structural validation errors
//!
//! All walks over the tree use an explicit stack, never recursion, so
//! arbitrarily deep trees cannot overflow the call stack.

use crate::data::FeatureAccessor;

use super::node::{Node, NO_CHILD};
use super::NodeId;

// ============================================================================
// TreeView Trait
// ============================================================================

/// Read-only view of a tree for traversal.
///
/// Routing convention: a sample goes **left** when
/// `sample[split_index] <= split_threshold`, right otherwise. The same
/// inclusive comparison is used when partitioning training data.
pub trait TreeView {
    /// Number of nodes in the tree.
    fn n_nodes(&self) -> usize;

    /// Check if a node is a leaf.
    fn is_leaf(&self, node: NodeId) -> bool;

    /// Feature index tested by an interior node.
    fn split_index(&self, node: NodeId) -> u32;

    /// Threshold of an interior node.
    fn split_threshold(&self, node: NodeId) -> f64;

    fn left_child(&self, node: NodeId) -> NodeId;

    fn right_child(&self, node: NodeId) -> NodeId;

    /// Predicted class label of a leaf.
    fn leaf_class(&self, node: NodeId) -> u32;

    /// Child taken by `sample` at interior node `node`.
    ///
    /// # Panics
    ///
    /// Panics if the node's split feature is outside the sample. A correctly
    /// built or validated tree never splits on a feature the training records
    /// did not have, so this indicates mismatched inputs.
    #[inline]
    fn route<S: FeatureAccessor + ?Sized>(&self, node: NodeId, sample: &S) -> NodeId {
        let feature = self.split_index(node) as usize;
        assert!(
            feature < sample.n_features(),
            "node {node} splits on feature {feature} but the sample has {} features",
            sample.n_features()
        );
        if sample.feature(feature) <= self.split_threshold(node) {
            self.left_child(node)
        } else {
            self.right_child(node)
        }
    }

    /// Traverse from the root to the leaf reached by `sample`.
    #[inline]
    fn traverse_to_leaf<S: FeatureAccessor + ?Sized>(&self, sample: &S) -> NodeId {
        let mut node = 0;
        while !self.is_leaf(node) {
            node = self.route(node, sample);
        }
        node
    }

    /// Nodes visited by `sample`, root first, leaf last.
    fn decision_path<S: FeatureAccessor + ?Sized>(&self, sample: &S) -> Vec<NodeId> {
        let mut path = vec![0];
        let mut node = 0;
        while !self.is_leaf(node) {
            node = self.route(node, sample);
            path.push(node);
        }
        path
    }
}

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeValidationError {
    #[error("tree has no nodes")]
    EmptyTree,

    #[error("node {node} has {side} child {child} outside 0..{n_nodes}")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },

    #[error("node {node} references itself as a child")]
    SelfLoop { node: NodeId },

    #[error("node {node} is reachable by more than one path")]
    DuplicateVisit { node: NodeId },

    #[error("node {node} is not reachable from the root")]
    UnreachableNode { node: NodeId },

    #[error("node {node} was never resolved to a leaf or a split")]
    UnresolvedNode { node: NodeId },

    #[error("leaf {node} has class 0; class labels start at 1")]
    InvalidLeafClass { node: NodeId },

    #[error("leaf {node} has class {class}, outside 1..={n_classes}")]
    LeafClassOutOfRange {
        node: NodeId,
        class: u32,
        n_classes: u32,
    },

    #[error("split node {node} has non-finite threshold {threshold}")]
    NonFiniteThreshold { node: NodeId, threshold: f64 },

    #[error("node {node} splits again on feature {feature}, already used by an ancestor")]
    RepeatedFeature { node: NodeId, feature: u32 },
}

// ============================================================================
// Tree
// ============================================================================

/// Split features on the path to one leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafPath {
    pub leaf: NodeId,
    /// Features tested by the leaf's ancestors, root first.
    pub features: Vec<u32>,
}

/// Structure-of-Arrays tree storage.
///
/// Child indices are local to this tree (0 = root). Each non-root node has
/// exactly one parent: subtrees are exclusively owned through the arena.
#[derive(Debug, Clone)]
pub struct Tree {
    split_indices: Box<[u32]>,
    split_thresholds: Box<[f64]>,
    left_children: Box<[NodeId]>,
    right_children: Box<[NodeId]>,
    is_leaf: Box<[bool]>,
    classes: Box<[u32]>,
}

impl Tree {
    /// Create a tree from parallel arrays. All arrays must have the same length.
    pub(crate) fn from_parts(
        split_indices: Vec<u32>,
        split_thresholds: Vec<f64>,
        left_children: Vec<NodeId>,
        right_children: Vec<NodeId>,
        is_leaf: Vec<bool>,
        classes: Vec<u32>,
    ) -> Self {
        let n_nodes = split_indices.len();
        debug_assert_eq!(n_nodes, split_thresholds.len());
        debug_assert_eq!(n_nodes, left_children.len());
        debug_assert_eq!(n_nodes, right_children.len());
        debug_assert_eq!(n_nodes, is_leaf.len());
        debug_assert_eq!(n_nodes, classes.len());

        Self {
            split_indices: split_indices.into_boxed_slice(),
            split_thresholds: split_thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            classes: classes.into_boxed_slice(),
        }
    }

    /// Decision payload of `node`.
    #[inline]
    pub fn node(&self, node: NodeId) -> Node {
        let i = node as usize;
        if self.is_leaf[i] {
            Node::leaf(self.classes[i])
        } else {
            Node::split(self.split_indices[i], self.split_thresholds[i])
        }
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.is_leaf.iter().filter(|&&leaf| leaf).count()
    }

    /// Maximum number of edges from the root to a leaf (0 for a lone leaf).
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0 as NodeId, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            if self.is_leaf(node) {
                max_depth = max_depth.max(depth);
            } else {
                stack.push((self.right_child(node), depth + 1));
                stack.push((self.left_child(node), depth + 1));
            }
        }
        max_depth
    }

    /// Minimum feature-vector width a sample needs to be routed through this tree.
    pub fn required_features(&self) -> usize {
        self.preorder()
            .into_iter()
            .filter(|&n| !self.is_leaf(n))
            .map(|n| self.split_index(n) as usize + 1)
            .max()
            .unwrap_or(0)
    }

    /// Node ids in pre-order (node, left subtree, right subtree).
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.n_nodes());
        let mut stack = vec![0 as NodeId];
        while let Some(node) = stack.pop() {
            order.push(node);
            if !self.is_leaf(node) {
                stack.push(self.right_child(node));
                stack.push(self.left_child(node));
            }
        }
        order
    }

    /// For every leaf, the features consumed on its root-to-leaf path.
    ///
    /// Leaves are listed in pre-order.
    pub fn leaf_paths(&self) -> Vec<LeafPath> {
        let mut paths = Vec::with_capacity(self.n_leaves());
        let mut stack: Vec<(NodeId, Vec<u32>)> = vec![(0, Vec::new())];
        while let Some((node, features)) = stack.pop() {
            if self.is_leaf(node) {
                paths.push(LeafPath { leaf: node, features });
                continue;
            }
            let mut child_features = features;
            child_features.push(self.split_index(node));
            stack.push((self.right_child(node), child_features.clone()));
            stack.push((self.left_child(node), child_features));
        }
        paths
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate basic structural invariants.
    ///
    /// Checks that every node is reachable exactly once from the root, child
    /// indices are in range, interior nodes do not point at themselves and
    /// have a finite threshold, and every leaf carries a class label `>= 1`.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        let mut visited = vec![false; n_nodes];
        let mut stack: Vec<NodeId> = vec![0];

        while let Some(node) = stack.pop() {
            let i = node as usize;
            if visited[i] {
                return Err(TreeValidationError::DuplicateVisit { node });
            }
            visited[i] = true;

            if self.is_leaf[i] {
                if self.classes[i] == 0 {
                    return Err(TreeValidationError::InvalidLeafClass { node });
                }
                continue;
            }

            let threshold = self.split_thresholds[i];
            if !threshold.is_finite() {
                return Err(TreeValidationError::NonFiniteThreshold { node, threshold });
            }

            for (side, child) in [("left", self.left_children[i]), ("right", self.right_children[i])] {
                if child == node {
                    return Err(TreeValidationError::SelfLoop { node });
                }
                if child as usize >= n_nodes {
                    return Err(TreeValidationError::ChildOutOfBounds {
                        node,
                        side,
                        child,
                        n_nodes,
                    });
                }
                stack.push(child);
            }
        }

        if let Some(node) = visited.iter().position(|&v| !v) {
            return Err(TreeValidationError::UnreachableNode { node: node as NodeId });
        }

        Ok(())
    }

    /// Check that every leaf class lies in `1..=n_classes`.
    pub fn validate_classes(&self, n_classes: u32) -> Result<(), TreeValidationError> {
        for node in 0..self.n_nodes() as NodeId {
            if !self.is_leaf(node) {
                continue;
            }
            let class = self.leaf_class(node);
            if class == 0 || class > n_classes {
                return Err(TreeValidationError::LeafClassOutOfRange { node, class, n_classes });
            }
        }
        Ok(())
    }

    /// [`validate`](Self::validate) plus the no-feature-reuse invariant:
    /// no feature is split on twice along any root-to-leaf path.
    pub fn validate_paths(&self) -> Result<(), TreeValidationError> {
        self.validate()?;

        let mut stack: Vec<(NodeId, Vec<u32>)> = vec![(0, Vec::new())];
        while let Some((node, used)) = stack.pop() {
            if self.is_leaf(node) {
                continue;
            }
            let feature = self.split_index(node);
            if used.contains(&feature) {
                return Err(TreeValidationError::RepeatedFeature { node, feature });
            }
            let mut child_used = used;
            child_used.push(feature);
            stack.push((self.right_child(node), child_used.clone()));
            stack.push((self.left_child(node), child_used));
        }
        Ok(())
    }
}

impl TreeView for Tree {
    #[inline]
    fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    #[inline]
    fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    #[inline]
    fn split_index(&self, node: NodeId) -> u32 {
        self.split_indices[node as usize]
    }

    #[inline]
    fn split_threshold(&self, node: NodeId) -> f64 {
        self.split_thresholds[node as usize]
    }

    #[inline]
    fn left_child(&self, node: NodeId) -> NodeId {
        self.left_children[node as usize]
    }

    #[inline]
    fn right_child(&self, node: NodeId) -> NodeId {
        self.right_children[node as usize]
    }

    #[inline]
    fn leaf_class(&self, node: NodeId) -> u32 {
        self.classes[node as usize]
    }
}

/// Structural equality: same shape in pre-order, same split decisions
/// (thresholds bit-for-bit) and same leaf classes. Arena numbering is
/// irrelevant.
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        if self.n_nodes() != other.n_nodes() {
            return false;
        }
        let mut stack: Vec<(NodeId, NodeId)> = vec![(0, 0)];
        while let Some((a, b)) = stack.pop() {
            if !self.node(a).same_decision(&other.node(b)) {
                return false;
            }
            if !self.is_leaf(a) {
                stack.push((self.right_child(a), other.right_child(b)));
                stack.push((self.left_child(a), other.left_child(b)));
            }
        }
        true
    }
}

impl Default for Tree {
    /// A single leaf predicting class 1.
    fn default() -> Self {
        Self::from_parts(vec![0], vec![0.0], vec![NO_CHILD], vec![NO_CHILD], vec![true], vec![1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::MutableTree;

    /// x0 <= 0.5 ? (x1 <= 2.0 ? 1 : 2) : 3
    fn two_level() -> Tree {
        let mut t = MutableTree::new();
        let root = t.init_root();
        let (l, r) = t.apply_split(root, 0, 0.5);
        let (ll, lr) = t.apply_split(l, 1, 2.0);
        t.make_leaf(ll, 1);
        t.make_leaf(lr, 2);
        t.make_leaf(r, 3);
        t.freeze().unwrap()
    }

    #[test]
    fn traversal_is_inclusive_on_the_left() {
        let tree = two_level();
        assert_eq!(tree.leaf_class(tree.traverse_to_leaf(&[0.5, 2.0])), 1);
        assert_eq!(tree.leaf_class(tree.traverse_to_leaf(&[0.5, 2.0001])), 2);
        assert_eq!(tree.leaf_class(tree.traverse_to_leaf(&[0.5000001, 0.0])), 3);
    }

    #[test]
    fn decision_path_ends_at_leaf() {
        let tree = two_level();
        let path = tree.decision_path(&[0.0, 5.0]);
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], 0);
        assert!(tree.is_leaf(*path.last().unwrap()));
    }

    #[test]
    #[should_panic(expected = "splits on feature 1")]
    fn routing_a_too_narrow_sample_panics() {
        let tree = two_level();
        tree.traverse_to_leaf(&[0.0]);
    }

    #[test]
    fn summary_statistics() {
        let tree = two_level();
        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.required_features(), 2);
        assert_eq!(Tree::default().depth(), 0);
        assert_eq!(Tree::default().required_features(), 0);
    }

    #[test]
    fn preorder_visits_left_subtree_first() {
        let tree = two_level();
        let classes: Vec<_> = tree
            .preorder()
            .into_iter()
            .filter(|&n| tree.is_leaf(n))
            .map(|n| tree.leaf_class(n))
            .collect();
        assert_eq!(classes, vec![1, 2, 3]);
    }

    #[test]
    fn leaf_paths_report_features() {
        let tree = two_level();
        let paths = tree.leaf_paths();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0].features, vec![0, 1]);
        assert_eq!(paths[2].features, vec![0]);
        tree.validate_paths().unwrap();
    }

    #[test]
    fn validate_paths_rejects_repeated_feature() {
        let mut t = MutableTree::new();
        let root = t.init_root();
        let (l, r) = t.apply_split(root, 0, 1.0);
        let (ll, lr) = t.apply_split(l, 0, 0.0);
        t.make_leaf(ll, 1);
        t.make_leaf(lr, 2);
        t.make_leaf(r, 2);
        let tree = t.freeze().unwrap();
        tree.validate().unwrap();
        assert_eq!(
            tree.validate_paths(),
            Err(TreeValidationError::RepeatedFeature { node: l, feature: 0 })
        );
    }

    #[test]
    fn validate_catches_broken_arrays() {
        let dangling = Tree::from_parts(
            vec![0, 0],
            vec![1.0, 0.0],
            vec![1, NO_CHILD],
            vec![7, NO_CHILD],
            vec![false, true],
            vec![0, 1],
        );
        assert!(matches!(
            dangling.validate(),
            Err(TreeValidationError::ChildOutOfBounds { side: "right", child: 7, .. })
        ));

        let shared = Tree::from_parts(
            vec![0, 0],
            vec![1.0, 0.0],
            vec![1, NO_CHILD],
            vec![1, NO_CHILD],
            vec![false, true],
            vec![0, 1],
        );
        assert_eq!(shared.validate(), Err(TreeValidationError::DuplicateVisit { node: 1 }));

        let orphan = Tree::from_parts(
            vec![0, 0],
            vec![0.0, 0.0],
            vec![NO_CHILD, NO_CHILD],
            vec![NO_CHILD, NO_CHILD],
            vec![true, true],
            vec![1, 1],
        );
        assert_eq!(orphan.validate(), Err(TreeValidationError::UnreachableNode { node: 1 }));

        let nan_split = Tree::from_parts(
            vec![0, 0, 0],
            vec![f64::NAN, 0.0, 0.0],
            vec![1, NO_CHILD, NO_CHILD],
            vec![2, NO_CHILD, NO_CHILD],
            vec![false, true, true],
            vec![0, 1, 2],
        );
        assert!(matches!(
            nan_split.validate(),
            Err(TreeValidationError::NonFiniteThreshold { node: 0, .. })
        ));
    }

    #[test]
    fn validate_classes_bounds_leaf_labels() {
        let tree = two_level();
        tree.validate_classes(3).unwrap();
        assert_eq!(
            tree.validate_classes(2),
            Err(TreeValidationError::LeafClassOutOfRange { node: 2, class: 3, n_classes: 2 })
        );
    }

    #[test]
    fn equality_ignores_arena_numbering() {
        // Same shape as two_level, nodes stored in a different order.
        let other = Tree::from_parts(
            vec![0, 0, 1, 0, 0],
            vec![0.5, 0.0, 2.0, 0.0, 0.0],
            vec![2, NO_CHILD, 4, NO_CHILD, NO_CHILD],
            vec![1, NO_CHILD, 3, NO_CHILD, NO_CHILD],
            vec![false, true, false, true, true],
            vec![0, 3, 0, 2, 1],
        );
        other.validate().unwrap();

        assert_eq!(two_level(), other);
        assert_ne!(two_level(), Tree::default());
    }
}
