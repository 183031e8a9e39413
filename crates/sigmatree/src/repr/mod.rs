//! Canonical decision tree representation.
//!
//! - [`Tree`]: immutable structure-of-arrays storage used for inference and
//!   persistence
//! - [`MutableTree`]: construction-time arena used by the trainer and loaders
//! - [`TreeView`]: read-only traversal interface shared by both
//! - [`Node`]: per-node decision payload

/// Node identifier: an index into the tree's arrays. The root is always 0.
pub type NodeId = u32;

mod mutable_tree;
mod node;
mod tree;

pub use mutable_tree::MutableTree;
pub use node::{Node, NO_CHILD};
pub use tree::{LeafPath, Tree, TreeValidationError, TreeView};
