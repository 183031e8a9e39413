//! Split search: mean+sigma candidates scored by Shannon entropy.
//!
//! For every unused feature, each observed class proposes one threshold,
//! `mean + stddev` of that class on the feature. Each candidate is scored
//! with [`split_entropy`]; the lowest-entropy candidate represents the
//! feature, and the lowest-entropy feature wins. Ties keep the first
//! candidate encountered (lowest class, then lowest feature index).

use fixedbitset::FixedBitSet;

use crate::data::RecordSet;
use crate::utils::Parallelism;

use super::stats::ClassStats;

// =============================================================================
// SplitCandidate
// =============================================================================

/// A proposed split and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitCandidate {
    pub feature: u32,
    pub threshold: f64,
    pub entropy: f64,
}

impl SplitCandidate {
    /// Placeholder for a feature that cannot be split (already used, or no
    /// class statistics).
    #[inline]
    fn unusable(feature: u32, sentinel_entropy: f64) -> Self {
        Self { feature, threshold: 0.0, entropy: sentinel_entropy }
    }
}

// =============================================================================
// Entropy
// =============================================================================

/// Entropy of the class distribution sent left by `x[feature] <= threshold`.
///
/// `w_c = count_c / |rows|` where `count_c` is the number of class-`c` records
/// in `rows` falling on the left; the result is `-Σ w_c log2 w_c` over classes
/// with `count_c > 0`. Classes are summed in label order, so the value is
/// reproducible bit-for-bit for a fixed slice.
pub fn split_entropy(
    data: &RecordSet,
    rows: &[u32],
    feature: usize,
    threshold: f64,
    n_classes: usize,
) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }

    let mut left_counts = vec![0usize; n_classes];
    for &row in rows {
        let row = row as usize;
        if data.value(row, feature) <= threshold {
            left_counts[data.class_index(row)] += 1;
        }
    }

    let n = rows.len() as f64;
    let mut entropy = 0.0;
    for &count in &left_counts {
        if count > 0 {
            let w = count as f64 / n;
            entropy -= w * w.log2();
        }
    }
    entropy
}

// =============================================================================
// SplitEvaluator
// =============================================================================

/// Finds the best (feature, threshold) pair for a node's slice.
#[derive(Debug, Clone, Copy)]
pub struct SplitEvaluator {
    sentinel_entropy: f64,
    parallelism: Parallelism,
}

impl SplitEvaluator {
    /// `sentinel_entropy` must exceed any real entropy (`log2(n_classes)`);
    /// it marks features that may not be selected.
    pub fn new(sentinel_entropy: f64, parallelism: Parallelism) -> Self {
        Self { sentinel_entropy, parallelism }
    }

    #[inline]
    pub fn sentinel_entropy(&self) -> f64 {
        self.sentinel_entropy
    }

    /// Best candidate for a single feature.
    ///
    /// Classes absent from the slice contribute no candidate, nor do
    /// thresholds that overflowed to a non-finite value. If nothing is left
    /// the feature gets the sentinel entropy.
    pub fn feature_candidate(
        &self,
        data: &RecordSet,
        rows: &[u32],
        feature: usize,
        stats: &ClassStats,
    ) -> SplitCandidate {
        let mut best = SplitCandidate::unusable(feature as u32, self.sentinel_entropy);
        for stat in stats.iter().flatten() {
            let threshold = stat.candidate_threshold(feature);
            if !threshold.is_finite() {
                continue;
            }
            let entropy = split_entropy(data, rows, feature, threshold, stats.n_classes());
            if entropy < best.entropy {
                best = SplitCandidate { feature: feature as u32, threshold, entropy };
            }
        }
        best
    }

    /// One representative candidate per feature, in feature order.
    ///
    /// Features in `used` get the sentinel entropy.
    pub fn evaluate_features(
        &self,
        data: &RecordSet,
        rows: &[u32],
        used: &FixedBitSet,
        stats: &ClassStats,
    ) -> Vec<SplitCandidate> {
        self.parallelism.maybe_par_map(0..data.n_features(), |feature| {
            if used.contains(feature) {
                SplitCandidate::unusable(feature as u32, self.sentinel_entropy)
            } else {
                self.feature_candidate(data, rows, feature, stats)
            }
        })
    }

    /// Globally best split, or `None` when every feature is unusable.
    ///
    /// The reduction runs in feature order regardless of parallelism, so the
    /// first feature wins ties.
    pub fn best_split(
        &self,
        data: &RecordSet,
        rows: &[u32],
        used: &FixedBitSet,
        stats: &ClassStats,
    ) -> Option<SplitCandidate> {
        let candidates = self.evaluate_features(data, rows, used, stats);
        let mut best: Option<SplitCandidate> = None;
        for candidate in candidates {
            if candidate.entropy >= self.sentinel_entropy {
                continue;
            }
            match best {
                Some(b) if candidate.entropy >= b.entropy => {}
                _ => best = Some(candidate),
            }
        }
        best
    }
}
