//! Validated record collections.
//!
//! [`RecordSet`] is the in-memory training/test set. All ingestion checks
//! happen here, once, so the statistics and split code can index
//! per-class arrays by label without re-validating.

use ndarray::ArrayView2;

use super::record::Record;

/// Errors raised while building a [`RecordSet`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    #[error("n_classes must be at least 2, got {0}")]
    TooFewClasses(u32),

    #[error("record {row} has no features")]
    NoFeatures { row: usize },

    #[error("record {row} has {got} features, expected {expected}")]
    WidthMismatch {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("record {row} has class {class}, expected a label in [1, {n_classes}]")]
    UnknownClass {
        row: usize,
        class: u32,
        n_classes: u32,
    },

    #[error("record {row} feature {feature} is not finite")]
    NonFiniteFeature { row: usize, feature: usize },

    #[error("label count {labels} does not match row count {rows}")]
    LabelCountMismatch { rows: usize, labels: usize },
}

/// An ordered, validated set of records sharing one feature width.
///
/// Invariants:
/// - every record has exactly [`n_features`](Self::n_features) finite values
/// - every class label lies in `[1, n_classes]`
///
/// An empty set is allowed (e.g. an empty test split); training rejects it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
    n_features: usize,
    n_classes: u32,
}

impl RecordSet {
    /// Validate and wrap `records`.
    pub fn new(records: Vec<Record>, n_classes: u32) -> Result<Self, DatasetError> {
        if n_classes < 2 {
            return Err(DatasetError::TooFewClasses(n_classes));
        }

        let n_features = records.first().map_or(0, |r| r.features().len());
        for (row, record) in records.iter().enumerate() {
            let width = record.features().len();
            if width == 0 {
                return Err(DatasetError::NoFeatures { row });
            }
            if width != n_features {
                return Err(DatasetError::WidthMismatch {
                    row,
                    expected: n_features,
                    got: width,
                });
            }
            if record.class() == 0 || record.class() > n_classes {
                return Err(DatasetError::UnknownClass {
                    row,
                    class: record.class(),
                    n_classes,
                });
            }
            if let Some(feature) = record.features().iter().position(|v| !v.is_finite()) {
                return Err(DatasetError::NonFiniteFeature { row, feature });
            }
        }

        Ok(Self { records, n_features, n_classes })
    }

    /// Build a set from a sample-major matrix `[n_samples, n_features]` and labels.
    pub fn from_rows(
        features: ArrayView2<f64>,
        labels: &[u32],
        n_classes: u32,
    ) -> Result<Self, DatasetError> {
        if features.nrows() != labels.len() {
            return Err(DatasetError::LabelCountMismatch {
                rows: features.nrows(),
                labels: labels.len(),
            });
        }
        let records = features
            .rows()
            .into_iter()
            .zip(labels)
            .map(|(row, &class)| Record::from_numeric(class, row.to_vec()))
            .collect();
        Self::new(records, n_classes)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of features per record (0 for an empty set).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[inline]
    pub fn n_classes(&self) -> u32 {
        self.n_classes
    }

    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[inline]
    pub fn record(&self, row: usize) -> &Record {
        &self.records[row]
    }

    /// Feature `feature` of record `row`.
    #[inline]
    pub fn value(&self, row: usize, feature: usize) -> f64 {
        self.records[row].features()[feature]
    }

    /// Zero-based class index of record `row` (label - 1).
    #[inline]
    pub(crate) fn class_index(&self, row: usize) -> usize {
        (self.records[row].class() - 1) as usize
    }

    /// Class labels in record order.
    pub fn labels(&self) -> Vec<u32> {
        self.records.iter().map(Record::class).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
