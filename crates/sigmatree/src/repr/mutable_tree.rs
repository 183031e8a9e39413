//! Mutable tree used during construction.

use super::node::NO_CHILD;
use super::tree::{Tree, TreeValidationError, TreeView};
use super::NodeId;

/// Mutable tree arena for incremental construction.
///
/// Nodes start unresolved; the trainer (or a loader) turns each one into
/// either a split via [`apply_split`](Self::apply_split), which allocates
/// two fresh children, or a leaf via [`make_leaf`](Self::make_leaf).
/// [`freeze`](Self::freeze) checks that nothing was left unresolved.
#[derive(Clone, Debug)]
pub struct MutableTree {
    split_indices: Vec<u32>,
    split_thresholds: Vec<f64>,
    left_children: Vec<NodeId>,
    right_children: Vec<NodeId>,
    is_leaf: Vec<bool>,
    classes: Vec<u32>,
    resolved: Vec<bool>,
}

impl MutableTree {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create a tree with capacity for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            split_indices: Vec::with_capacity(capacity),
            split_thresholds: Vec::with_capacity(capacity),
            left_children: Vec::with_capacity(capacity),
            right_children: Vec::with_capacity(capacity),
            is_leaf: Vec::with_capacity(capacity),
            classes: Vec::with_capacity(capacity),
            resolved: Vec::with_capacity(capacity),
        }
    }

    /// Reset and allocate the (unresolved) root node. Returns its id (always 0).
    pub fn init_root(&mut self) -> NodeId {
        self.split_indices.clear();
        self.split_thresholds.clear();
        self.left_children.clear();
        self.right_children.clear();
        self.is_leaf.clear();
        self.classes.clear();
        self.resolved.clear();
        self.alloc()
    }

    fn alloc(&mut self) -> NodeId {
        let id = self.is_leaf.len() as NodeId;
        self.split_indices.push(0);
        self.split_thresholds.push(0.0);
        self.left_children.push(NO_CHILD);
        self.right_children.push(NO_CHILD);
        // Placeholder; an unresolved node never routes anywhere.
        self.is_leaf.push(true);
        self.classes.push(0);
        self.resolved.push(false);
        id
    }

    /// Turn `node` into a split on `feature` at `threshold`.
    ///
    /// Returns `(left_id, right_id)` of the two freshly allocated children.
    pub fn apply_split(&mut self, node: NodeId, feature: u32, threshold: f64) -> (NodeId, NodeId) {
        let left = self.alloc();
        let right = self.alloc();

        let i = node as usize;
        self.is_leaf[i] = false;
        self.split_indices[i] = feature;
        self.split_thresholds[i] = threshold;
        self.classes[i] = 0;
        self.left_children[i] = left;
        self.right_children[i] = right;
        self.resolved[i] = true;

        (left, right)
    }

    /// Turn `node` into a leaf predicting `class`.
    pub fn make_leaf(&mut self, node: NodeId, class: u32) {
        let i = node as usize;
        self.is_leaf[i] = true;
        self.classes[i] = class;
        self.split_indices[i] = 0;
        self.split_thresholds[i] = 0.0;
        self.left_children[i] = NO_CHILD;
        self.right_children[i] = NO_CHILD;
        self.resolved[i] = true;
    }

    /// Number of resolved leaves so far.
    pub fn n_leaves(&self) -> usize {
        self.is_leaf
            .iter()
            .zip(&self.resolved)
            .filter(|&(&leaf, &done)| leaf && done)
            .count()
    }

    /// Ids of nodes not yet resolved.
    pub fn unresolved(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.resolved
            .iter()
            .enumerate()
            .filter(|&(_, &done)| !done)
            .map(|(i, _)| i as NodeId)
    }

    /// Finalize into an immutable [`Tree`].
    ///
    /// Fails if any node is unresolved or the result is structurally invalid.
    pub fn freeze(self) -> Result<Tree, TreeValidationError> {
        if let Some(node) = self.unresolved().next() {
            return Err(TreeValidationError::UnresolvedNode { node });
        }
        let tree = Tree::from_parts(
            self.split_indices,
            self.split_thresholds,
            self.left_children,
            self.right_children,
            self.is_leaf,
            self.classes,
        );
        tree.validate()?;
        Ok(tree)
    }
}

impl Default for MutableTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeView for MutableTree {
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
