//! Deterministic synthetic datasets for tests and benchmarks.

mod data;

pub use data::{gaussian_blobs, majority_tie_example, two_blob_example};
