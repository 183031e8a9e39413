//! Inference for trained decision trees.
//!
//! Prediction is a root-to-leaf walk: at every split the sample's value on
//! the split feature is compared with the threshold, `<=` going left. The
//! walk itself lives on [`TreeView`](crate::repr::TreeView); [`Predictor`]
//! adds batch entry points over record sets and dense matrices.

mod predictor;

pub use predictor::{Predictor, DEFAULT_BLOCK_SIZE};
