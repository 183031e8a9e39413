//! Per-class statistics over a node's slice.
//!
//! Statistics are recomputed from scratch for every node: nothing is carried
//! between nodes, so each split search only sees the records routed to it.

use crate::data::RecordSet;

// =============================================================================
// Class counts
// =============================================================================

/// Number of records of each class in `rows` (index = label - 1).
pub fn class_counts(data: &RecordSet, rows: &[u32], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &row in rows {
        counts[data.class_index(row as usize)] += 1;
    }
    counts
}

/// Majority class label. Ties go to the lowest label.
///
/// # Panics
///
/// Panics if `counts` is empty or all zero: a majority over no records is
/// undefined and the trainer never asks for one.
pub fn majority_class(counts: &[usize]) -> u32 {
    assert!(
        counts.iter().any(|&c| c > 0),
        "majority class requested for an empty slice"
    );
    let mut best = 0;
    for (i, &count) in counts.iter().enumerate().skip(1) {
        if count > counts[best] {
            best = i;
        }
    }
    best as u32 + 1
}

/// Fraction of the dominant class (0.0 for an empty slice).
pub fn purity(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let max = counts.iter().copied().max().unwrap_or(0);
    max as f64 / total as f64
}

// =============================================================================
// ClassStat / ClassStats
// =============================================================================

/// Mean and population standard deviation of every feature for one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassStat {
    count: usize,
    mean: Vec<f64>,
    stddev: Vec<f64>,
}

impl ClassStat {
    /// Number of records of this class in the slice.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    #[inline]
    pub fn stddev(&self) -> &[f64] {
        &self.stddev
    }

    /// Candidate split value for `feature`: `mean + stddev`.
    #[inline]
    pub fn candidate_threshold(&self, feature: usize) -> f64 {
        self.mean[feature] + self.stddev[feature]
    }
}

/// Statistics for every class label, `None` where the class is absent from
/// the slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassStats {
    per_class: Vec<Option<ClassStat>>,
}

impl ClassStats {
    /// Compute statistics for the records `rows` of `data`.
    ///
    /// Two passes per class, in record arrival order:
    /// 1. running mean, `mean(n+1) = (mean(n) * n + x) / (n + 1)`
    /// 2. population standard deviation against the final mean
    pub fn compute(data: &RecordSet, rows: &[u32], n_classes: usize) -> Self {
        let n_features = data.n_features();

        let mut members: Vec<Vec<u32>> = vec![Vec::new(); n_classes];
        for &row in rows {
            members[data.class_index(row as usize)].push(row);
        }

        let per_class = members
            .iter()
            .map(|rows| {
                if rows.is_empty() {
                    return None;
                }

                let mut mean = vec![0.0f64; n_features];
                for (n, &row) in rows.iter().enumerate() {
                    let n = n as f64;
                    for (f, m) in mean.iter_mut().enumerate() {
                        *m = (*m * n + data.value(row as usize, f)) / (n + 1.0);
                    }
                }

                let count = rows.len();
                let mut sq_dev = vec![0.0f64; n_features];
                for &row in rows {
                    for (f, acc) in sq_dev.iter_mut().enumerate() {
                        let d = data.value(row as usize, f) - mean[f];
                        *acc += d * d;
                    }
                }
                let stddev = sq_dev.into_iter().map(|s| (s / count as f64).sqrt()).collect();

                Some(ClassStat { count, mean, stddev })
            })
            .collect();

        Self { per_class }
    }

    /// Number of class slots (observed or not).
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.per_class.len()
    }

    /// Statistics of the class with zero-based index `class_index`.
    #[inline]
    pub fn get(&self, class_index: usize) -> Option<&ClassStat> {
        self.per_class.get(class_index).and_then(Option::as_ref)
    }

    /// All slots in label order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&ClassStat>> + '_ {
        self.per_class.iter().map(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;
    use approx::assert_abs_diff_eq;

    fn data() -> RecordSet {
        RecordSet::new(
            vec![
                Record::new(1, [1.0, 0.0]),
                Record::new(2, [8.0, 1.0]),
                Record::new(1, [1.5, 1.0]),
                Record::new(1, [2.0, 1.0]),
                Record::new(2, [10.0, 1.0]),
            ],
            3,
        )
        .unwrap()
    }

    #[test]
    fn mean_and_population_stddev() {
        let data = data();
        let rows: Vec<u32> = (0..data.len() as u32).collect();
        let stats = ClassStats::compute(&data, &rows, 3);

        let c1 = stats.get(0).unwrap();
        assert_eq!(c1.count(), 3);
        assert_abs_diff_eq!(c1.mean()[0], 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(c1.stddev()[0], (1.0f64 / 6.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(c1.mean()[1], 2.0 / 3.0, epsilon = 1e-12);

        let c2 = stats.get(1).unwrap();
        assert_abs_diff_eq!(c2.mean()[0], 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c2.stddev()[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c2.stddev()[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c2.candidate_threshold(0), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn absent_class_has_no_stats() {
        let data = data();
        let stats = ClassStats::compute(&data, &[0, 2], 3);
        assert!(stats.get(0).is_some());
        assert!(stats.get(1).is_none());
        assert!(stats.get(2).is_none());
        assert_eq!(stats.n_classes(), 3);
        assert_eq!(stats.iter().flatten().count(), 1);
    }

    #[test]
    fn only_slice_rows_contribute() {
        let data = data();
        let stats = ClassStats::compute(&data, &[1], 3);
        let c2 = stats.get(1).unwrap();
        assert_eq!(c2.mean(), &[8.0, 1.0]);
        assert_eq!(c2.stddev(), &[0.0, 0.0]);
    }

    #[test]
    fn counts_majority_and_purity() {
        let data = data();
        let rows: Vec<u32> = (0..5).collect();
        let counts = class_counts(&data, &rows, 3);
        assert_eq!(counts, vec![3, 2, 0]);
        assert_eq!(majority_class(&counts), 1);
        assert_abs_diff_eq!(purity(&counts), 0.6, epsilon = 1e-12);
        assert_eq!(purity(&[0, 0]), 0.0);
    }

    #[test]
    fn majority_ties_go_to_lowest_label() {
        assert_eq!(majority_class(&[2, 2, 0]), 1);
        assert_eq!(majority_class(&[0, 3, 3]), 2);
        assert_eq!(majority_class(&[0, 0, 1]), 3);
    }

    #[test]
    #[should_panic(expected = "empty slice")]
    fn majority_of_nothing_panics() {
        majority_class(&[0, 0]);
    }
}
