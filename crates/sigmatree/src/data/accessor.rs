//! Feature accessor trait for tree traversal.
//!
//! [`FeatureAccessor`] gives read-only, numeric access to one sample's
//! features. It is implemented for plain slices, so `&[f64]` can be routed
//! through a tree without wrapper types, as well as for [`Record`] and
//! `ndarray` rows.
//!
//! ```
//! use sigmatree::data::FeatureAccessor;
//!
//! let features: &[f64] = &[0.5, 1.2, 3.4];
//! assert_eq!(features.feature(1), 1.2);
//! assert_eq!(features.n_features(), 3);
//! ```

use super::record::Record;

/// Access features for a single sample.
pub trait FeatureAccessor {
    /// Get the numeric feature value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.n_features()`.
    fn feature(&self, index: usize) -> f64;

    /// Number of features in this sample.
    fn n_features(&self) -> usize;
}

impl FeatureAccessor for [f64] {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self[index]
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.len()
    }
}

impl<const N: usize> FeatureAccessor for [f64; N] {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self[index]
    }

    #[inline]
    fn n_features(&self) -> usize {
        N
    }
}

impl FeatureAccessor for Vec<f64> {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self[index]
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.len()
    }
}

impl FeatureAccessor for Record {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self.features()[index]
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.features().len()
    }
}

// May be contiguous or strided.
impl FeatureAccessor for ndarray::ArrayView1<'_, f64> {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self[index]
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.len()
    }
}

impl<T: FeatureAccessor + ?Sized> FeatureAccessor for &T {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        (**self).feature(index)
    }

    #[inline]
    fn n_features(&self) -> usize {
        (**self).n_features()
    }
}
