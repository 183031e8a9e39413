//! Batch predictor.

use ndarray::{Array1, ArrayView2, ArrayViewMut1, Axis};

use crate::data::{FeatureAccessor, RecordSet};
use crate::repr::{Tree, TreeView};
use crate::utils::Parallelism;

/// Rows per work unit when predicting a matrix.
pub const DEFAULT_BLOCK_SIZE: usize = 64;

/// Class predictor over a borrowed tree.
///
/// ```ignore
/// let predictor = Predictor::new(&tree);
/// let class = predictor.predict_row(&[1.8]);
/// let classes = predictor.predict(features.view(), Parallelism::Parallel);
/// ```
#[derive(Debug, Clone)]
pub struct Predictor<'t, T: TreeView = Tree> {
    tree: &'t T,
    block_size: usize,
}

impl<'t, T: TreeView + Sync> Predictor<'t, T> {
    pub fn new(tree: &'t T) -> Self {
        Self { tree, block_size: DEFAULT_BLOCK_SIZE }
    }

    /// Set the number of rows handled per work unit (minimum 1).
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn tree(&self) -> &'t T {
        self.tree
    }

    /// Class of a single sample.
    ///
    /// # Panics
    ///
    /// Panics if a split on the path refers to a feature the sample lacks.
    #[inline]
    pub fn predict_row<S: FeatureAccessor + ?Sized>(&self, sample: &S) -> u32 {
        self.tree.leaf_class(self.tree.traverse_to_leaf(sample))
    }

    /// Classes of every record in `data`, in record order.
    pub fn predict_records(&self, data: &RecordSet, parallelism: Parallelism) -> Vec<u32> {
        parallelism.maybe_par_map(data.records(), |record| self.predict_row(record))
    }

    /// Classes of every row of a `[n_rows, n_features]` matrix.
    pub fn predict(&self, features: ArrayView2<'_, f64>, parallelism: Parallelism) -> Array1<u32> {
        let mut output = Array1::zeros(features.nrows());
        self.predict_into(features, output.view_mut(), parallelism);
        output
    }

    /// Write row classes into `output`.
    ///
    /// # Panics
    ///
    /// Panics if `output.len() != features.nrows()`.
    pub fn predict_into(
        &self,
        features: ArrayView2<'_, f64>,
        mut output: ArrayViewMut1<'_, u32>,
        parallelism: Parallelism,
    ) {
        assert_eq!(
            output.len(),
            features.nrows(),
            "output length must match the number of feature rows"
        );

        let chunks = features
            .axis_chunks_iter(Axis(0), self.block_size)
            .zip(output.axis_chunks_iter_mut(Axis(0), self.block_size));

        parallelism.maybe_par_bridge_for_each(chunks, |(rows, mut out)| {
            for (row, slot) in rows.rows().into_iter().zip(out.iter_mut()) {
                *slot = self.predict_row(&row);
            }
        });
    }
}
