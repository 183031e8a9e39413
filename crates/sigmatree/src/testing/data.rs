use rand::prelude::*;

use crate::data::{Record, RecordSet};

/// Standard normal sample (Box-Muller).
fn standard_normal(rng: &mut StdRng) -> f64 {
	// Keep u1 away from 0 so ln stays finite.
	let u1: f64 = 1.0 - rng.r#gen::<f64>();
	let u2: f64 = rng.r#gen::<f64>();
	(-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Isotropic Gaussian clusters, one per class.
///
/// Class centers are uniform in `[-10, 10]` per feature, each point adds unit
/// normal noise. Records are interleaved by class (`1, 2, .., k, 1, 2, ..`)
/// and carry uids `blob-<row>`.
pub fn gaussian_blobs(n_per_class: usize, n_classes: u32, n_features: usize, seed: u64) -> RecordSet {
	assert!(n_classes >= 2);
	assert!(n_features >= 1);
	let mut rng = StdRng::seed_from_u64(seed);

	let centers: Vec<Vec<f64>> = (0..n_classes)
		.map(|_| (0..n_features).map(|_| rng.r#gen::<f64>() * 20.0 - 10.0).collect())
		.collect();

	let mut records = Vec::with_capacity(n_per_class * n_classes as usize);
	for _ in 0..n_per_class {
		for (c, center) in centers.iter().enumerate() {
			let x: Vec<f64> = center.iter().map(|&m| m + standard_normal(&mut rng)).collect();
			let row = records.len();
			records.push(Record::from_numeric(c as u32 + 1, x).with_uid(format!("blob-{row}")));
		}
	}

	RecordSet::new(records, n_classes).expect("generated records are valid")
}

/// Two well separated one-feature clusters.
///
/// Class 1 at `{1.0, 1.5, 2.0}`, class 2 at `{8.0, 9.0, 10.0}`. Class 1
/// proposes the winning threshold `1.5 + sqrt(1/6)`; a tree trained on it
/// predicts class 1 for `1.8` and class 2 for `9.5`.
pub fn two_blob_example() -> RecordSet {
	let records = [(1, 1.0), (1, 1.5), (1, 2.0), (2, 8.0), (2, 9.0), (2, 10.0)]
		.into_iter()
		.enumerate()
		.map(|(i, (class, x))| Record::new(class, [x]).with_uid(format!("r{i}")))
		.collect();
	RecordSet::new(records, 2).expect("example records are valid")
}

/// Two records per class with identical features: nothing can separate them
/// and the majority vote ties.
pub fn majority_tie_example() -> RecordSet {
	let records = vec![
		Record::new(2, [3.0, 3.0]),
		Record::new(1, [3.0, 3.0]),
		Record::new(2, [3.0, 3.0]),
		Record::new(1, [3.0, 3.0]),
	];
	RecordSet::new(records, 2).expect("example records are valid")
}
