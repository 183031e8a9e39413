//! Node payload type.

use super::NodeId;

/// Sentinel child index for leaves.
pub const NO_CHILD: NodeId = NodeId::MAX;

/// Decision payload of a single tree node.
///
/// This is exactly the record written per line by the text persistence
/// format. `split_index`/`split_threshold` are meaningful only for interior
/// nodes, `class` only for leaves; the unused fields are zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Node {
    pub is_leaf: bool,
    pub split_index: u32,
    pub split_threshold: f64,
    pub class: u32,
}

impl Node {
    /// A leaf predicting `class`.
    #[inline]
    pub fn leaf(class: u32) -> Self {
        Self { is_leaf: true, split_index: 0, split_threshold: 0.0, class }
    }

    /// An interior node routing `x[split_index] <= split_threshold` to the left.
    #[inline]
    pub fn split(split_index: u32, split_threshold: f64) -> Self {
        Self { is_leaf: false, split_index, split_threshold, class: 0 }
    }

    /// Payload equality with thresholds compared bit-for-bit.
    #[inline]
    pub(crate) fn same_decision(&self, other: &Node) -> bool {
        if self.is_leaf != other.is_leaf {
            return false;
        }
        if self.is_leaf {
            self.class == other.class
        } else {
            self.split_index == other.split_index
                && self.split_threshold.to_bits() == other.split_threshold.to_bits()
        }
    }
}
