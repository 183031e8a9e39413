//! Conversion between [`Tree`] and [`TreeSchema`].

use crate::repr::{NodeId, Tree, TreeView, NO_CHILD};

use super::error::PersistError;
use super::schema::TreeSchema;

/// Child id as stored in the schema (0 = no child).
#[inline]
fn child_to_schema(child: NodeId) -> u32 {
    if child == NO_CHILD {
        0
    } else {
        child
    }
}

impl From<&Tree> for TreeSchema {
    fn from(tree: &Tree) -> Self {
        let n = tree.n_nodes();
        let ids = 0..n as NodeId;
        Self {
            num_nodes: n as u32,
            split_indices: ids.clone().map(|i| tree.split_index(i)).collect(),
            thresholds: ids.clone().map(|i| tree.split_threshold(i)).collect(),
            children_left: ids.clone().map(|i| child_to_schema(tree.left_child(i))).collect(),
            children_right: ids.clone().map(|i| child_to_schema(tree.right_child(i))).collect(),
            is_leaf: ids.clone().map(|i| tree.is_leaf(i)).collect(),
            classes: ids.map(|i| tree.leaf_class(i)).collect(),
        }
    }
}

impl TryFrom<TreeSchema> for Tree {
    type Error = PersistError;

    fn try_from(schema: TreeSchema) -> Result<Self, Self::Error> {
        let n = schema.num_nodes as usize;
        for (field, got) in [
            ("split_indices", schema.split_indices.len()),
            ("thresholds", schema.thresholds.len()),
            ("children_left", schema.children_left.len()),
            ("children_right", schema.children_right.len()),
            ("is_leaf", schema.is_leaf.len()),
            ("classes", schema.classes.len()),
        ] {
            if got != n {
                return Err(PersistError::SchemaLength { field, expected: n, got });
            }
        }

        let mut left = schema.children_left;
        let mut right = schema.children_right;
        for (i, &leaf) in schema.is_leaf.iter().enumerate() {
            if leaf {
                left[i] = NO_CHILD;
                right[i] = NO_CHILD;
            }
        }

        let tree = Tree::from_parts(
            schema.split_indices,
            schema.thresholds,
            left,
            right,
            schema.is_leaf,
            schema.classes,
        );
        tree.validate()?;
        Ok(tree)
    }
}
