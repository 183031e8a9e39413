//! Classification report.
//!
//! Compares predicted and actual labels for an evaluation set: misclassified
//! count, misclassification rate, accuracy and a confusion matrix. The
//! `Display` impl renders the per-record comparison table followed by a
//! two-line summary.

use std::fmt;

use ndarray::{Array2, ArrayView2};

use crate::data::RecordSet;

// =============================================================================
// ReportError
// =============================================================================

/// Errors building a report from predictions for a [`RecordSet`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("{predicted} predictions for {records} records")]
    LengthMismatch { predicted: usize, records: usize },

    #[error("prediction {row} has class {class}, outside 1..={n_classes}")]
    LabelOutOfRange { row: usize, class: u32, n_classes: u32 },
}

// =============================================================================
// Rows
// =============================================================================

/// One evaluated record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub predicted: u32,
    pub actual: u32,
    pub uid: Option<String>,
}

impl ReportRow {
    #[inline]
    pub fn is_correct(&self) -> bool {
        self.predicted == self.actual
    }
}

/// Marker appended to table rows with a specific (predicted, actual) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Flag {
    predicted: u32,
    actual: u32,
    marker: String,
}

// =============================================================================
// ClassificationReport
// =============================================================================

/// Predicted vs. actual labels for an evaluation set.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    rows: Vec<ReportRow>,
    /// `[actual - 1, predicted - 1]` counts.
    confusion: Array2<u64>,
    misclassified: usize,
    flag: Option<Flag>,
}

impl ClassificationReport {
    /// Build a report from parallel label slices.
    ///
    /// The confusion matrix is sized by the largest label seen.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length or contain label 0.
    pub fn new(predicted: &[u32], actual: &[u32]) -> Self {
        assert_eq!(
            predicted.len(),
            actual.len(),
            "predicted and actual label counts differ"
        );
        let rows = predicted
            .iter()
            .zip(actual)
            .map(|(&predicted, &actual)| ReportRow { predicted, actual, uid: None })
            .collect();
        let n_classes = predicted.iter().chain(actual).copied().max().unwrap_or(1);
        Self::from_rows(rows, n_classes)
    }

    /// Build a report for `data`, carrying each record's uid into the table.
    ///
    /// The confusion matrix is `data.n_classes()` square.
    ///
    /// # Errors
    ///
    /// [`ReportError::LengthMismatch`] unless there is one prediction per
    /// record, and [`ReportError::LabelOutOfRange`] for a prediction outside
    /// `1..=data.n_classes()`, e.g. from a tree trained with more classes.
    pub fn from_records(predicted: &[u32], data: &RecordSet) -> Result<Self, ReportError> {
        if predicted.len() != data.len() {
            return Err(ReportError::LengthMismatch {
                predicted: predicted.len(),
                records: data.len(),
            });
        }
        let n_classes = data.n_classes();
        if let Some((row, &class)) = predicted
            .iter()
            .enumerate()
            .find(|&(_, &class)| class == 0 || class > n_classes)
        {
            return Err(ReportError::LabelOutOfRange { row, class, n_classes });
        }

        let rows = predicted
            .iter()
            .zip(data.iter())
            .map(|(&predicted, record)| ReportRow {
                predicted,
                actual: record.class(),
                uid: record.uid().map(str::to_owned),
            })
            .collect();
        Ok(Self::from_rows(rows, n_classes))
    }

    fn from_rows(rows: Vec<ReportRow>, n_classes: u32) -> Self {
        let k = n_classes.max(1) as usize;
        let mut confusion = Array2::<u64>::zeros((k, k));
        let mut misclassified = 0;
        for row in &rows {
            assert!(
                row.predicted >= 1 && row.actual >= 1,
                "class labels start at 1 (got predicted {}, actual {})",
                row.predicted,
                row.actual
            );
            confusion[[row.actual as usize - 1, row.predicted as usize - 1]] += 1;
            if !row.is_correct() {
                misclassified += 1;
            }
        }
        Self { rows, confusion, misclassified, flag: None }
    }

    /// Attach uids to the table rows, in order. Extra uids are ignored.
    pub fn with_uids<I, S>(mut self, uids: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        for (row, uid) in self.rows.iter_mut().zip(uids) {
            row.uid = uid.map(Into::into);
        }
        self
    }

    /// Append `marker` to every table row predicted as `predicted` whose
    /// actual class is `actual`.
    ///
    /// Handy for spotting one costly kind of error, e.g. anomalous traffic
    /// classified as normal.
    pub fn with_flag(mut self, predicted: u32, actual: u32, marker: impl Into<String>) -> Self {
        self.flag = Some(Flag { predicted, actual, marker: marker.into() });
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Number of records whose prediction differs from the actual class.
    #[inline]
    pub fn misclassified(&self) -> usize {
        self.misclassified
    }

    /// `misclassified / len`, or 0.0 for an empty report.
    pub fn misclassification_rate(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        self.misclassified as f64 / self.rows.len() as f64
    }

    /// `1 - misclassification_rate`.
    pub fn accuracy(&self) -> f64 {
        1.0 - self.misclassification_rate()
    }

    /// Confusion matrix indexed `[actual - 1, predicted - 1]`.
    pub fn confusion_matrix(&self) -> ArrayView2<'_, u64> {
        self.confusion.view()
    }

    /// Rows carrying the flag marker, if one is configured.
    pub fn flagged(&self) -> impl Iterator<Item = &ReportRow> + '_ {
        self.rows
            .iter()
            .filter(move |row| self.is_flagged(row))
    }

    fn is_flagged(&self, row: &ReportRow) -> bool {
        self.flag
            .as_ref()
            .is_some_and(|f| f.predicted == row.predicted && f.actual == row.actual)
    }
}

const RULE: &str = "+-----------+----------+-------------------------+";

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "| Predicted |  Actual  |           UID           |")?;
        writeln!(f, "{RULE}")?;
        for row in &self.rows {
            write!(
                f,
                "|{:^11}|{:^10}|   {}   ",
                row.predicted,
                row.actual,
                row.uid.as_deref().unwrap_or("-")
            )?;
            if let Some(flag) = self.flag.as_ref().filter(|_| self.is_flagged(row)) {
                write!(f, " {}", flag.marker)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{RULE}")?;
        writeln!(f, "{} out of {} wrongly classified", self.misclassified, self.rows.len())?;
        write!(f, "Misclassified: {:.6}", self.misclassification_rate())
    }
}
