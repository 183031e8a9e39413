//! Row partitioning for a chosen split.

use crate::data::RecordSet;

/// Split `rows` into `(left, right)` by `x[feature] <= threshold`.
///
/// Relative row order is preserved on both sides.
pub fn partition_rows(
    data: &RecordSet,
    rows: &[u32],
    feature: usize,
    threshold: f64,
) -> (Vec<u32>, Vec<u32>) {
    rows.iter()
        .partition(|&&row| data.value(row as usize, feature) <= threshold)
}
