//! Schema types for JSON serialization.
//!
//! Schema types are kept separate from the runtime [`Tree`](crate::repr::Tree)
//! so the on-disk layout can evolve independently and every document is
//! validated on the way in.

use serde::{Deserialize, Serialize};

/// Current document version.
pub const SCHEMA_VERSION: u32 = 1;

/// Tree schema (SoA layout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSchema {
    /// Number of nodes (interior + leaves).
    pub num_nodes: u32,
    /// Split feature index per node (0 for leaves).
    pub split_indices: Vec<u32>,
    /// Split threshold per node (0.0 for leaves).
    pub thresholds: Vec<f64>,
    /// Left child per node (0 = no child; the root is never a child).
    pub children_left: Vec<u32>,
    /// Right child per node (0 = no child).
    pub children_right: Vec<u32>,
    /// Leaf flag per node.
    pub is_leaf: Vec<bool>,
    /// Predicted class per node (0 for interior nodes).
    pub classes: Vec<u32>,
}

/// Versioned JSON document wrapping a single tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDocument {
    pub version: u32,
    /// Number of class labels, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_classes: Option<u32>,
    pub tree: TreeSchema,
}
